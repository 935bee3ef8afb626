//! Persistence of the last-used grade and laptop number.
//!
//! The record is a flat JSON object, `{"Grade": 1, "Number": 40}`, read
//! before a static assignment and rewritten after it.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::{FilePreferenceStore, default_path};

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{Identity, IdentityError};

/// Grade used on first run.
pub const DEFAULT_GRADE: u32 = 1;

/// Laptop number used on first run.
pub const DEFAULT_NUMBER: u32 = 1;

/// The persisted grade/number pair.
///
/// Values are stored as read. A record whose pair is not a valid
/// [`Identity`] is treated like an unreadable file when loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Last-used grade.
    #[serde(rename = "Grade")]
    pub grade: u32,

    /// Last-used laptop number.
    #[serde(rename = "Number")]
    pub number: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            grade: DEFAULT_GRADE,
            number: DEFAULT_NUMBER,
        }
    }
}

impl Preferences {
    /// Creates a preference record.
    #[must_use]
    pub const fn new(grade: u32, number: u32) -> Self {
        Self { grade, number }
    }

    /// Replaces each field that has an explicit value.
    #[must_use]
    pub fn with_overrides(self, grade: Option<u32>, number: Option<u32>) -> Self {
        Self {
            grade: grade.unwrap_or(self.grade),
            number: number.unwrap_or(self.number),
        }
    }

    /// Validates the pair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if either value is out of range.
    pub fn identity(self) -> Result<Identity, IdentityError> {
        Identity::new(self.grade, self.number)
    }
}

impl From<Identity> for Preferences {
    fn from(identity: Identity) -> Self {
        Self::new(u32::from(identity.grade()), u32::from(identity.number()))
    }
}

/// Result of loading preferences from persistent storage.
///
/// Explicitly models all valid states:
/// - Successfully loaded previous preferences
/// - No preference file exists (first run)
/// - File exists but is corrupted/unreadable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// Successfully loaded previously saved preferences.
    Loaded(Preferences),

    /// No preference file exists (first run or explicitly deleted).
    NotFound,

    /// File exists but could not be parsed.
    /// Defaults are used and the file is overwritten on next save.
    Corrupted {
        /// Reason for corruption (for logging).
        reason: String,
    },
}

/// Errors that can occur while saving preferences.
///
/// Only covers write-side errors; read-side issues are modeled
/// as [`LoadResult`] variants.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Failed to write the preference file.
    #[error("Failed to write preference file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize preferences to JSON.
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Abstraction for persisting preferences between runs.
///
/// Implementations should:
/// - Overwrite the whole record atomically
/// - Return `LoadResult::NotFound` for a missing file
/// - Return `LoadResult::Corrupted` on read or parse errors, or when the
///   stored grade/number is out of range
pub trait PreferenceStore {
    /// Loads previously saved preferences.
    fn load(&self) -> LoadResult;

    /// Saves preferences, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;

    /// Loads preferences, falling back to defaults when absent or unreadable.
    ///
    /// A corrupted file, or a record with an out-of-range grade or number,
    /// is logged as a warning.
    fn load_or_default(&self) -> Preferences {
        match self.load() {
            LoadResult::Loaded(preferences) => match preferences.identity() {
                Ok(_) => preferences,
                Err(e) => {
                    tracing::warn!("Ignoring saved preferences: {e}");
                    Preferences::default()
                }
            },
            LoadResult::NotFound => {
                tracing::debug!("No saved preferences, using defaults");
                Preferences::default()
            }
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Ignoring unreadable preferences: {reason}");
                Preferences::default()
            }
        }
    }
}
