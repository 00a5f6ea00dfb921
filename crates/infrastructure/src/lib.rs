//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod directory_role_source;
mod role_directory;
mod yaml_codec;

pub use directory_role_source::DirectoryRoleSource;
pub use role_directory::{load_role_directory, load_role_directory_with};
pub use yaml_codec::YamlCodec;
