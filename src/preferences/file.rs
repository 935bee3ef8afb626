//! File-based preference persistence.

use std::io::ErrorKind;
use std::path::PathBuf;

use super::{LoadResult, PreferenceError, PreferenceStore, Preferences};

/// Directory created under the user's config directory.
const APP_DIR: &str = "IP Configurator";

/// File name of the preference record.
const FILE_NAME: &str = "configuration.json";

/// Returns `<config dir>/IP Configurator/configuration.json`.
///
/// Falls back to the working directory when the platform reports no
/// config directory.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(APP_DIR)
        .join(FILE_NAME)
}

/// File-based implementation of [`PreferenceStore`].
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Creates a store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<Preferences>(&content) {
            Ok(preferences) => match preferences.identity() {
                Ok(_) => LoadResult::Loaded(preferences),
                Err(e) => LoadResult::Corrupted {
                    reason: format!("Out of range: {e}"),
                },
            },
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        let content =
            serde_json::to_string_pretty(preferences).map_err(PreferenceError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(PreferenceError::Write)?;
            }
        }

        // configuration.json -> configuration.json.tmp
        let temp_path = PathBuf::from(format!("{}.tmp", self.path.display()));

        std::fs::write(&temp_path, content).map_err(PreferenceError::Write)?;
        std::fs::rename(&temp_path, &self.path).map_err(PreferenceError::Write)?;

        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
