//! Rolekeep command-line bootstrap: loads a role directory and renders a chat line.

#![forbid(unsafe_code)]

mod cli_config;

use std::fs;

use rolekeep_application::{RoleRegistry, SubjectRoles};
use rolekeep_core::{AppError, AppResult, Codec, JsonCodec};
use rolekeep_domain::Role;
use rolekeep_infrastructure::{YamlCodec, load_role_directory_with};
use tracing::{info, warn};

use crate::cli_config::{CliConfig, RoleFormat, init_tracing};

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = CliConfig::load()?;
    let registry = RoleRegistry::new();

    match config.format {
        RoleFormat::Json => run(&config, &registry, &JsonCodec),
        RoleFormat::Yaml => run(&config, &registry, &YamlCodec),
    }
}

fn run<C: Codec>(config: &CliConfig, registry: &RoleRegistry, codec: &C) -> AppResult<()> {
    load_role_directory_with(registry, config.roles_dir.as_str(), codec)?;

    for role in registry.all() {
        info!(
            role = %role,
            tier = role.tier(),
            inherits = %role.inherits(),
            colour = %role.colour(),
            "registered role"
        );
    }

    let subject = load_subject(config, registry, codec)?;
    match subject.highest() {
        Some(role) => println!(
            "{}",
            chat_line(&role, config.subject_name.as_str(), config.message.as_str())
        ),
        None => warn!(subject = %config.subject_name, "subject holds no active roles"),
    }

    Ok(())
}

fn load_subject<C: Codec>(
    config: &CliConfig,
    registry: &RoleRegistry,
    codec: &C,
) -> AppResult<SubjectRoles> {
    let Some(path) = config.subject_file.as_deref() else {
        let subject = SubjectRoles::new();
        if let Some(top) = registry.all().into_iter().next() {
            subject.add(top);
        }
        return Ok(subject);
    };

    let bytes = fs::read(path).map_err(|error| {
        AppError::Internal(format!("failed to read SUBJECT_FILE '{path}': {error}"))
    })?;
    let subject = SubjectRoles::decoded(&bytes, codec, registry)?;
    info!(path = %path, held = subject.len(), "decoded subject roles");

    Ok(subject)
}

fn chat_line(role: &Role, subject_name: &str, message: &str) -> String {
    format!(
        "<grey>[</grey>{}<grey>]</grey> {}<grey>:</grey> <white>{message}</white>",
        role.coloured(role.name()),
        role.coloured(subject_name)
    )
}
