use std::collections::HashMap;

use parking_lot::Mutex;
use rolekeep_core::{AppError, AppResult, Codec};
use rolekeep_domain::{Role, RoleDefinition, validate_inheritance};
use tracing::{debug, info, warn};

use crate::{RoleDefinitionFile, RoleDefinitionSource};

#[derive(Debug, Default)]
struct RegistryState {
    ordered: Vec<Role>,
    by_key: HashMap<String, Role>,
}

/// Validated, tier-ordered collection of every role known to the process.
///
/// One mutex guards both the ordered list and the name index, so readers
/// never observe a half-installed registry. Readers return owned copies that
/// outlive later loads.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    state: Mutex<RegistryState>,
}

impl RoleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every role from the source and replaces the registry on success.
    ///
    /// Candidates are decoded in source order, rejected on duplicate names or
    /// tiers, sorted by tier and validated for inheritance before anything is
    /// installed. On error the previous registry stays active.
    pub fn load_from<S, C>(&self, source: &S, codec: &C) -> AppResult<()>
    where
        S: RoleDefinitionSource + ?Sized,
        C: Codec,
    {
        let location = source.location();
        let staged = source
            .read_definitions()
            .and_then(|files| stage_roles(files, codec));

        match staged {
            Ok(state) => {
                let count = state.ordered.len();
                *self.state.lock() = state;
                info!(location = %location, count, "role registry installed");
                Ok(())
            }
            Err(error) => {
                warn!(
                    location = %location,
                    error = %error,
                    "role registry load rejected, keeping previous registry"
                );
                Err(error)
            }
        }
    }

    /// Returns a snapshot of all roles ordered by ascending tier.
    #[must_use]
    pub fn all(&self) -> Vec<Role> {
        self.state.lock().ordered.clone()
    }

    /// Looks a role up by name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Role> {
        self.state.lock().by_key.get(&name.to_lowercase()).cloned()
    }

    /// Looks a role up by name and reports a missing role as an error.
    pub fn require(&self, name: &str) -> AppResult<Role> {
        self.by_name(name)
            .ok_or_else(|| AppError::MissingRole(name.to_owned()))
    }

    /// Looks a role up by name.
    ///
    /// # Panics
    ///
    /// Panics when no role with that name is registered. Use this only for
    /// roles the deployment is known to ship.
    #[must_use]
    pub fn by_name_must(&self, name: &str) -> Role {
        match self.require(name) {
            Ok(role) => role,
            Err(error) => panic!("{error}"),
        }
    }

    /// Returns the number of registered roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().ordered.len()
    }

    /// Returns whether no role is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().ordered.is_empty()
    }
}

fn stage_roles<C: Codec>(files: Vec<RoleDefinitionFile>, codec: &C) -> AppResult<RegistryState> {
    let mut candidates: Vec<Role> = Vec::with_capacity(files.len());

    for file in files {
        let definition: RoleDefinition =
            codec
                .decode(&file.contents)
                .map_err(|error| AppError::FileUnreadable {
                    file: file.name.clone(),
                    reason: error.to_string(),
                })?;
        let role = Role::try_from(definition).map_err(|error| AppError::InvalidRole {
            file: file.name.clone(),
            reason: error.to_string(),
        })?;

        if candidates.iter().any(|candidate| candidate == &role) {
            return Err(AppError::DuplicateName {
                file: file.name,
                name: role.name().to_owned(),
            });
        }
        if candidates
            .iter()
            .any(|candidate| candidate.tier() == role.tier())
        {
            return Err(AppError::DuplicateTier {
                file: file.name,
                tier: role.tier(),
            });
        }

        debug!(file = %file.name, role = %role, tier = role.tier(), "decoded role definition");
        candidates.push(role);
    }

    candidates.sort_by_key(Role::tier);
    validate_inheritance(&candidates)?;

    let by_key = candidates
        .iter()
        .map(|role| (role.key(), role.clone()))
        .collect();

    Ok(RegistryState {
        ordered: candidates,
        by_key,
    })
}
