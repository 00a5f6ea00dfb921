//! Validation of the by-name parent relation between roles.

use std::collections::{HashMap, HashSet};

use rolekeep_core::{AppError, AppResult};

use crate::Role;

/// Validates parent references across a complete candidate set.
///
/// Roles are checked in slice order. Every declared parent must resolve to a
/// role in the same set, and the parent relation must not loop: a role naming
/// itself, two roles naming each other, and longer chains that close back on
/// themselves are all rejected.
pub fn validate_inheritance(roles: &[Role]) -> AppResult<()> {
    let by_key: HashMap<String, &Role> = roles.iter().map(|role| (role.key(), role)).collect();

    for role in roles {
        let Some(parent_name) = role.parent() else {
            continue;
        };

        if role.is_named(parent_name) {
            return Err(AppError::SelfInheritance {
                role: role.name().to_owned(),
            });
        }

        let Some(parent) = by_key.get(&parent_name.to_lowercase()) else {
            return Err(AppError::UnknownParent {
                role: role.name().to_owned(),
                parent: parent_name.to_owned(),
            });
        };

        if parent.parent().is_some_and(|name| role.is_named(name)) {
            return Err(AppError::MutualInheritance {
                role: role.name().to_owned(),
                other: parent.name().to_owned(),
            });
        }
    }

    detect_cycles(roles, &by_key)
}

fn detect_cycles(roles: &[Role], by_key: &HashMap<String, &Role>) -> AppResult<()> {
    let mut acyclic: HashSet<String> = HashSet::new();

    for role in roles {
        let mut path: Vec<&Role> = Vec::new();
        let mut on_path: HashMap<String, usize> = HashMap::new();
        let mut current = Some(role);

        while let Some(step) = current {
            let key = step.key();
            if acyclic.contains(&key) {
                break;
            }
            if let Some(&start) = on_path.get(&key) {
                let mut chain: Vec<String> = path[start..]
                    .iter()
                    .map(|role| role.name().to_owned())
                    .collect();
                chain.push(step.name().to_owned());
                return Err(AppError::InheritanceCycle { chain });
            }

            on_path.insert(key, path.len());
            path.push(step);
            current = step
                .parent()
                .and_then(|name| by_key.get(&name.to_lowercase()).copied());
        }

        acyclic.extend(on_path.into_keys());
    }

    Ok(())
}
