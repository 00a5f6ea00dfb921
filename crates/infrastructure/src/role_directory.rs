use rolekeep_application::RoleRegistry;
use rolekeep_core::{AppResult, Codec, JsonCodec};

use crate::DirectoryRoleSource;

/// Loads every role file in `folder` as JSON and replaces the registry.
pub fn load_role_directory(registry: &RoleRegistry, folder: &str) -> AppResult<()> {
    load_role_directory_with(registry, folder, &JsonCodec)
}

/// Loads every role file in `folder` with `codec` and replaces the registry.
///
/// The previous registry stays active when any file fails to load.
pub fn load_role_directory_with<C: Codec>(
    registry: &RoleRegistry,
    folder: &str,
    codec: &C,
) -> AppResult<()> {
    registry.load_from(&DirectoryRoleSource::new(folder), codec)
}
