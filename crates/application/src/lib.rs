//! Application services and ports.

#![forbid(unsafe_code)]

mod role_registry;
mod role_source_ports;
mod subject_roles;

pub use role_registry::RoleRegistry;
pub use role_source_ports::{RoleDefinitionFile, RoleDefinitionSource};
pub use subject_roles::{SubjectRoles, decode_role, encode_role};
