//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value that must be a dotted-quad IPv4 address is not.
    #[error("Invalid {field} '{value}': expected a dotted-quad IPv4 address")]
    InvalidAddress {
        /// Name of the field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The network the derived octet is placed into is unusable.
    #[error("Invalid network '{value}': {reason}")]
    InvalidNetwork {
        /// The rejected value
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The subnet mask is unusable.
    #[error("Invalid subnet mask '{value}': {reason}")]
    InvalidMask {
        /// The rejected value
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid regex pattern for adapter filtering.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The invalid pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// Well-known field names for `InvalidAddress` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// Explicit static address.
    pub const ADDRESS: &str = "address";
    /// Network prefix.
    pub const NETWORK: &str = "network";
    /// Subnet mask.
    pub const MASK: &str = "mask";
    /// Default gateway.
    pub const GATEWAY: &str = "gateway";
}

impl ConfigError {
    /// Creates an `InvalidAddress` error for a field.
    #[must_use]
    pub fn invalid_address(field: &'static str, value: &str) -> Self {
        Self::InvalidAddress {
            field,
            value: value.to_string(),
        }
    }
}
