use std::env;

use rolekeep_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Codec selected for role files and subject files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFormat {
    Json,
    Yaml,
}

impl RoleFormat {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(AppError::Validation(format!(
                "ROLES_FORMAT must be either 'json' or 'yaml', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub roles_dir: String,
    pub format: RoleFormat,
    pub subject_file: Option<String>,
    pub subject_name: String,
    pub message: String,
}

impl CliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(env::args().nth(1), |name| env::var(name).ok())
    }

    fn from_lookup(
        roles_dir_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let roles_dir = roles_dir_arg
            .or_else(|| lookup("ROLES_DIR"))
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "assets/roles".to_owned());

        let format = match lookup("ROLES_FORMAT") {
            Some(value) => RoleFormat::parse(value.as_str())?,
            None => RoleFormat::Json,
        };

        let subject_file = lookup("SUBJECT_FILE")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let subject_name = lookup("SUBJECT_NAME")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "Steve".to_owned());

        let message = lookup("CHAT_MESSAGE").unwrap_or_else(|| "Hello!".to_owned());

        Ok(Self {
            roles_dir,
            format,
            subject_file,
            subject_name,
            message,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
