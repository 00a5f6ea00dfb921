use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use rolekeep_application::{RoleDefinitionSource, RoleRegistry, SubjectRoles};
use rolekeep_core::{AppError, JsonCodec};
use rolekeep_domain::Role;
use tempfile::TempDir;

use crate::{YamlCodec, load_role_directory, load_role_directory_with};

use super::DirectoryRoleSource;

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(error) => panic!("failed to create temp dir: {error}"),
    }
}

fn write_role(dir: &Path, file_name: &str, contents: &str) {
    if let Err(error) = fs::write(dir.join(file_name), contents) {
        panic!("failed to write {file_name}: {error}");
    }
}

fn folder(dir: &TempDir) -> String {
    dir.path().display().to_string()
}

fn summary(roles: &[Role]) -> Vec<(String, i64)> {
    roles
        .iter()
        .map(|role| (role.name().to_owned(), role.tier()))
        .collect()
}

fn happy_directory() -> TempDir {
    let dir = temp_dir();
    write_role(dir.path(), "admin.json", r#"{"name":"admin","tier":2}"#);
    write_role(
        dir.path(),
        "owner.json",
        r#"{"name":"owner","inherits":"admin","colour":"<red>","tier":1}"#,
    );
    dir
}

#[test]
fn trailing_separators_are_stripped() {
    let source = DirectoryRoleSource::new("assets/roles//");
    assert_eq!(source.folder(), Path::new("assets/roles"));
    assert_eq!(DirectoryRoleSource::new("/").folder(), Path::new("/"));
}

#[test]
fn subdirectories_are_ignored() {
    let dir = happy_directory();
    if let Err(error) = fs::create_dir(dir.path().join("archive")) {
        panic!("failed to create subdirectory: {error}");
    }
    write_role(
        &dir.path().join("archive"),
        "old.json",
        r#"{"name":"old","tier":1}"#,
    );

    let files = DirectoryRoleSource::new(folder(&dir)).read_definitions();
    let names: Vec<String> = files
        .unwrap_or_default()
        .into_iter()
        .map(|file| file.name)
        .collect();
    assert_eq!(names, vec!["admin.json", "owner.json"]);
}

#[test]
fn missing_directory_is_unreadable() {
    let dir = temp_dir();
    let missing = dir.path().join("missing");
    let registry = RoleRegistry::new();

    let result = load_role_directory(&registry, &missing.display().to_string());

    assert!(matches!(result, Err(AppError::DirectoryUnreadable { .. })));
}

#[test]
fn empty_directory_loads_empty_registry() {
    let dir = temp_dir();
    let registry = RoleRegistry::new();

    assert!(load_role_directory(&registry, &folder(&dir)).is_ok());
    assert!(registry.is_empty());
}

#[test]
fn minimal_file_loads_root_role() {
    let dir = temp_dir();
    write_role(dir.path(), "x.json", r#"{"name":"x","tier":1}"#);
    let registry = RoleRegistry::new();

    assert!(load_role_directory(&registry, &folder(&dir)).is_ok());
    assert_eq!(registry.by_name("X").map(|role| role.inherits().to_owned()), Some(String::new()));
}

#[test]
fn happy_load_installs_tier_ordered_roles() {
    let dir = happy_directory();
    let registry = RoleRegistry::new();

    let result = load_role_directory(&registry, &format!("{}/", folder(&dir)));

    assert!(result.is_ok());
    assert_eq!(
        summary(&registry.all()),
        vec![("owner".to_owned(), 1), ("admin".to_owned(), 2)]
    );
    assert_eq!(registry.by_name_must("OWNER").inherits(), "admin");
}

#[test]
fn duplicate_tier_is_rejected_and_registry_unchanged() {
    let dir = happy_directory();
    let registry = RoleRegistry::new();
    assert!(load_role_directory(&registry, &folder(&dir)).is_ok());
    let before = summary(&registry.all());

    write_role(dir.path(), "mod.json", r#"{"name":"mod","tier":1}"#);
    let result = load_role_directory(&registry, &folder(&dir));

    assert!(matches!(result, Err(AppError::DuplicateTier { tier: 1, .. })));
    assert_eq!(summary(&registry.all()), before);
}

#[test]
fn self_inheritance_is_rejected() {
    let dir = temp_dir();
    write_role(
        dir.path(),
        "loop.json",
        r#"{"name":"loop","inherits":"loop","tier":9}"#,
    );
    let registry = RoleRegistry::new();

    let result = load_role_directory(&registry, &folder(&dir));

    assert!(matches!(result, Err(AppError::SelfInheritance { .. })));
}

#[test]
fn mutual_inheritance_is_rejected() {
    let dir = temp_dir();
    write_role(dir.path(), "a.json", r#"{"name":"a","inherits":"b","tier":1}"#);
    write_role(dir.path(), "b.json", r#"{"name":"b","inherits":"a","tier":2}"#);
    let registry = RoleRegistry::new();

    let result = load_role_directory(&registry, &folder(&dir));

    assert!(matches!(result, Err(AppError::MutualInheritance { .. })));
    assert!(registry.is_empty());
}

#[test]
fn missing_parent_is_rejected() {
    let dir = temp_dir();
    write_role(
        dir.path(),
        "owner.json",
        r#"{"name":"owner","inherits":"admin","tier":1}"#,
    );
    let registry = RoleRegistry::new();

    let result = load_role_directory(&registry, &folder(&dir));

    assert!(matches!(result, Err(AppError::UnknownParent { .. })));
}

#[test]
fn yaml_role_files_load_with_yaml_codec() {
    let dir = temp_dir();
    write_role(dir.path(), "admin.yaml", "name: admin\ntier: 2\n");
    write_role(
        dir.path(),
        "owner.yaml",
        "name: owner\ninherits: admin\ncolour: \"<red>\"\ntier: 1\n",
    );
    let registry = RoleRegistry::new();

    let result = load_role_directory_with(&registry, &folder(&dir), &YamlCodec);

    assert!(result.is_ok());
    assert_eq!(
        registry.by_name("owner").map(|role| role.coloured("owner")),
        Some("<red>owner</red>".to_owned())
    );
}

#[test]
fn subject_roles_survive_a_restart() {
    let dir = happy_directory();
    let registry = RoleRegistry::new();
    assert!(load_role_directory(&registry, &folder(&dir)).is_ok());

    let owner = registry.by_name_must("owner");
    let admin = registry.by_name_must("admin");
    let expiry = match Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single() {
        Some(expiry) => expiry,
        None => panic!("invalid expiry"),
    };
    let subject = SubjectRoles::new();
    subject.add(owner.clone());
    subject.add(admin.clone());
    subject.expire(&admin, expiry);

    let encoded = match subject.encode(&JsonCodec) {
        Ok(bytes) => bytes,
        Err(error) => panic!("failed to encode subject: {error}"),
    };

    let restarted = RoleRegistry::new();
    assert!(load_role_directory(&restarted, &folder(&dir)).is_ok());
    let restored = match SubjectRoles::decoded(&encoded, &JsonCodec, &restarted) {
        Ok(restored) => restored,
        Err(error) => panic!("failed to decode subject: {error}"),
    };

    let before_expiry = match Utc.with_ymd_and_hms(2029, 6, 1, 0, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("invalid instant"),
    };
    assert_eq!(restored.all_at(before_expiry), vec![owner.clone(), admin.clone()]);
    assert_eq!(restored.expires_at(&admin), Some(expiry));
    assert_eq!(restored.expires_at(&owner), None);
}
