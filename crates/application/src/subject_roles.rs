use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rolekeep_core::{AppResult, Codec, null_as_default};
use rolekeep_domain::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RoleRegistry;

/// Serialized form of one subject's roles.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SubjectRolesData {
    #[serde(rename = "Roles", default, deserialize_with = "null_as_default")]
    roles: Vec<String>,
    #[serde(rename = "Expirations", default, deserialize_with = "null_as_default")]
    expirations: BTreeMap<String, DateTime<Utc>>,
}

/// Serialized form of a single role reference.
#[derive(Debug, Serialize, Deserialize)]
struct RoleReferenceData {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Clone)]
struct HeldRole {
    role: Role,
    expires_at: Option<DateTime<Utc>>,
}

impl HeldRole {
    fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Roles currently held by one subject, each with an optional expiry.
///
/// Expiry is evaluated lazily: observers treat a role whose expiry is not in
/// the future as absent and prune it while they hold the lock. Held roles
/// carry their own tier, so ordering never consults the registry.
#[derive(Debug, Default)]
pub struct SubjectRoles {
    held: Mutex<Vec<HeldRole>>,
}

impl SubjectRoles {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from serialized bytes.
    pub fn decoded<C: Codec>(bytes: &[u8], codec: &C, registry: &RoleRegistry) -> AppResult<Self> {
        let roles = Self::new();
        roles.decode(bytes, codec, registry)?;
        Ok(roles)
    }

    /// Adds a role without expiry. Adding a held role is a no-op.
    pub fn add(&self, role: Role) {
        let mut held = self.held.lock();
        if held.iter().any(|entry| entry.role == role) {
            return;
        }

        held.push(HeldRole {
            role,
            expires_at: None,
        });
    }

    /// Removes a role and its expiry. Removing an absent role is a no-op.
    pub fn remove(&self, role: &Role) {
        self.held.lock().retain(|entry| &entry.role != role);
    }

    /// Sets or replaces the expiry of a held role.
    ///
    /// Roles that are not held are left untouched.
    pub fn expire(&self, role: &Role, at: DateTime<Utc>) {
        if let Some(entry) = self
            .held
            .lock()
            .iter_mut()
            .find(|entry| &entry.role == role)
        {
            entry.expires_at = Some(at);
        }
    }

    /// Drops the expiry of a held role, keeping the role itself.
    pub fn clear_expiry(&self, role: &Role) {
        if let Some(entry) = self
            .held
            .lock()
            .iter_mut()
            .find(|entry| &entry.role == role)
        {
            entry.expires_at = None;
        }
    }

    /// Returns the expiry of a held role, or `None` when it never expires.
    #[must_use]
    pub fn expires_at(&self, role: &Role) -> Option<DateTime<Utc>> {
        self.held
            .lock()
            .iter()
            .find(|entry| &entry.role == role)
            .and_then(|entry| entry.expires_at)
    }

    /// Returns whether the role is held and has not lapsed.
    #[must_use]
    pub fn has(&self, role: &Role) -> bool {
        self.has_at(role, Utc::now())
    }

    /// Returns whether the role is held and has not lapsed at `now`.
    #[must_use]
    pub fn has_at(&self, role: &Role, now: DateTime<Utc>) -> bool {
        let mut held = self.held.lock();
        prune_lapsed(&mut held, now);
        held.iter().any(|entry| &entry.role == role)
    }

    /// Returns the unexpired role with the lowest tier.
    #[must_use]
    pub fn highest(&self) -> Option<Role> {
        self.highest_at(Utc::now())
    }

    /// Returns the role with the lowest tier among those unexpired at `now`.
    #[must_use]
    pub fn highest_at(&self, now: DateTime<Utc>) -> Option<Role> {
        let mut held = self.held.lock();
        prune_lapsed(&mut held, now);
        held.iter()
            .min_by_key(|entry| entry.role.tier())
            .map(|entry| entry.role.clone())
    }

    /// Returns a snapshot of the unexpired roles ordered by tier.
    #[must_use]
    pub fn all(&self) -> Vec<Role> {
        self.all_at(Utc::now())
    }

    /// Returns a snapshot of the roles unexpired at `now`, ordered by tier.
    #[must_use]
    pub fn all_at(&self, now: DateTime<Utc>) -> Vec<Role> {
        let mut held = self.held.lock();
        prune_lapsed(&mut held, now);
        let mut roles: Vec<Role> = held.iter().map(|entry| entry.role.clone()).collect();
        roles.sort_by_key(Role::tier);
        roles
    }

    /// Returns the number of stored roles, including lapsed ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.lock().len()
    }

    /// Returns whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.lock().is_empty()
    }

    /// Encodes the held roles by lowercased name, in insertion order.
    pub fn encode<C: Codec>(&self, codec: &C) -> AppResult<Vec<u8>> {
        let data = {
            let held = self.held.lock();
            let mut data = SubjectRolesData::default();
            for entry in held.iter() {
                let key = entry.role.key();
                if let Some(expires_at) = entry.expires_at {
                    data.expirations.insert(key.clone(), expires_at);
                }
                data.roles.push(key);
            }
            data
        };

        codec.encode(&data)
    }

    /// Replaces the contents with the roles encoded in `bytes`.
    ///
    /// Names are resolved through the registry before the container lock is
    /// taken. Names the registry no longer knows are dropped. Expiration keys
    /// match role names case-insensitively, and the zero instant
    /// `0001-01-01T00:00:00Z` reads as no expiry.
    pub fn decode<C: Codec>(
        &self,
        bytes: &[u8],
        codec: &C,
        registry: &RoleRegistry,
    ) -> AppResult<()> {
        let SubjectRolesData { roles, expirations } = codec.decode(bytes)?;
        let expirations: BTreeMap<String, DateTime<Utc>> = expirations
            .into_iter()
            .filter(|(_, expires_at)| !is_zero_instant(*expires_at))
            .map(|(name, expires_at)| (name.to_lowercase(), expires_at))
            .collect();

        let mut resolved: Vec<HeldRole> = Vec::with_capacity(roles.len());
        for name in &roles {
            let Some(role) = registry.by_name(name) else {
                debug!(role = %name, "dropping role unknown to the registry");
                continue;
            };
            if resolved.iter().any(|entry| entry.role == role) {
                continue;
            }

            let expires_at = expirations.get(&role.key()).copied();
            resolved.push(HeldRole { role, expires_at });
        }

        *self.held.lock() = resolved;
        Ok(())
    }
}

/// Seconds from the Unix epoch back to `0001-01-01T00:00:00Z`.
const ZERO_INSTANT_SECONDS: i64 = -62_135_596_800;

/// Returns whether `at` is the zero instant older writers used for "no expiry".
fn is_zero_instant(at: DateTime<Utc>) -> bool {
    at.timestamp() == ZERO_INSTANT_SECONDS && at.timestamp_subsec_nanos() == 0
}

fn prune_lapsed(held: &mut Vec<HeldRole>, now: DateTime<Utc>) {
    let before = held.len();
    held.retain(|entry| !entry.is_lapsed(now));
    if held.len() != before {
        debug!(pruned = before - held.len(), "pruned lapsed roles");
    }
}

/// Encodes a single role reference by name.
pub fn encode_role<C: Codec>(role: &Role, codec: &C) -> AppResult<Vec<u8>> {
    codec.encode(&RoleReferenceData {
        name: role.name().to_owned(),
    })
}

/// Decodes a single role reference, resolving it through the registry.
///
/// A name the registry does not know decodes to `None`.
pub fn decode_role<C: Codec>(
    bytes: &[u8],
    codec: &C,
    registry: &RoleRegistry,
) -> AppResult<Option<Role>> {
    let data: RoleReferenceData = codec.decode(bytes)?;
    Ok(registry.by_name(&data.name))
}
