//! Role value object and its on-disk definition record.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use rolekeep_core::{AppResult, NonEmptyString, null_as_default};
use serde::{Deserialize, Serialize};

/// Role definition as stored in one role file.
///
/// Field names are part of the file format and must match across codecs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Display name of the role.
    pub name: String,
    /// Name of the parent role, empty for root roles.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub inherits: String,
    /// Formatting token applied when rendering the role.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub colour: String,
    /// Priority rank, lower is higher priority.
    pub tier: i64,
}

/// Named rank with a unique priority tier.
///
/// Roles compare and hash by their lowercased name, so `Owner` and `owner`
/// denote the same role.
#[derive(Debug, Clone)]
pub struct Role {
    name: NonEmptyString,
    inherits: String,
    colour: String,
    tier: i64,
}

impl Role {
    /// Creates a role after validating its name.
    pub fn new(
        name: impl Into<String>,
        inherits: impl Into<String>,
        colour: impl Into<String>,
        tier: i64,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            inherits: inherits.into(),
            colour: colour.into(),
            tier,
        })
    }

    /// Returns the case-preserving display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent role name, or an empty string for root roles.
    #[must_use]
    pub fn inherits(&self) -> &str {
        self.inherits.as_str()
    }

    /// Returns the parent role name when one is declared.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        (!self.inherits.is_empty()).then_some(self.inherits.as_str())
    }

    /// Returns the raw colour token.
    #[must_use]
    pub fn colour(&self) -> &str {
        self.colour.as_str()
    }

    /// Returns the priority tier.
    #[must_use]
    pub fn tier(&self) -> i64 {
        self.tier
    }

    /// Returns the lowercased name used for lookups and serialization.
    #[must_use]
    pub fn key(&self) -> String {
        self.name.as_str().to_lowercase()
    }

    /// Returns whether this role carries the given name, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.key() == name.to_lowercase()
    }

    /// Wraps text in this role's colour token.
    ///
    /// A markup tag such as `<red>` is closed after the text, any other token
    /// is prefixed, and an empty colour leaves the text untouched.
    #[must_use]
    pub fn coloured(&self, text: &str) -> String {
        let colour = self.colour.as_str();
        if colour.is_empty() {
            return text.to_owned();
        }

        match colour
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .filter(|tag| !tag.is_empty() && !tag.starts_with('/'))
        {
            Some(tag) => format!("<{tag}>{text}</{tag}>"),
            None => format!("{colour}{text}"),
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl TryFrom<RoleDefinition> for Role {
    type Error = rolekeep_core::AppError;

    fn try_from(value: RoleDefinition) -> Result<Self, Self::Error> {
        Self::new(value.name, value.inherits, value.colour, value.tier)
    }
}

impl From<&Role> for RoleDefinition {
    fn from(value: &Role) -> Self {
        Self {
            name: value.name().to_owned(),
            inherits: value.inherits.clone(),
            colour: value.colour.clone(),
            tier: value.tier,
        }
    }
}
