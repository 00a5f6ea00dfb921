//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod inheritance;
mod role;

pub use inheritance::validate_inheritance;
pub use role::{Role, RoleDefinition};
