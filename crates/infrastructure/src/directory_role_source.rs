use std::fs;
use std::path::{Path, PathBuf};

use rolekeep_application::{RoleDefinitionFile, RoleDefinitionSource};
use rolekeep_core::{AppError, AppResult};
use tracing::debug;

/// Filesystem adapter reading one role definition per regular file.
///
/// Subdirectories are skipped. Files are read in file-name order so that
/// duplicate reports are stable across platforms.
#[derive(Debug, Clone)]
pub struct DirectoryRoleSource {
    folder: PathBuf,
}

impl DirectoryRoleSource {
    /// Creates a source for the given directory, ignoring trailing separators.
    #[must_use]
    pub fn new(folder: impl AsRef<str>) -> Self {
        let folder = folder.as_ref();
        let trimmed = folder.trim_end_matches(['/', '\\']);
        let folder = if trimmed.is_empty() && !folder.is_empty() {
            &folder[..1]
        } else {
            trimmed
        };

        Self {
            folder: PathBuf::from(folder),
        }
    }

    /// Returns the directory this source reads.
    #[must_use]
    pub fn folder(&self) -> &Path {
        self.folder.as_path()
    }
}

impl RoleDefinitionSource for DirectoryRoleSource {
    fn location(&self) -> String {
        self.folder.display().to_string()
    }

    fn read_definitions(&self) -> AppResult<Vec<RoleDefinitionFile>> {
        let directory_error = |error: std::io::Error| AppError::DirectoryUnreadable {
            path: self.location(),
            reason: error.to_string(),
        };

        let mut entries = fs::read_dir(&self.folder)
            .map_err(directory_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(directory_error)?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_error = |error: std::io::Error| AppError::FileUnreadable {
                file: name.clone(),
                reason: error.to_string(),
            };

            if entry.file_type().map_err(file_error)?.is_dir() {
                debug!(folder = %self.location(), entry = %name, "skipping subdirectory");
                continue;
            }

            let contents = fs::read(entry.path()).map_err(file_error)?;
            files.push(RoleDefinitionFile { name, contents });
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests;
