//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Static addressing configuration
    #[serde(default)]
    pub address: AddressSection,

    /// Saved grade/number location
    #[serde(default)]
    pub preferences: PreferencesSection,

    /// Network adapter filter configuration
    #[serde(default)]
    pub filter: FilterSection,
}

/// Static addressing section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressSection {
    /// Network the derived octet is placed into (last octet must be 0)
    pub network: Option<String>,

    /// Subnet mask
    pub mask: Option<String>,

    /// Default gateway (omitted = none)
    pub gateway: Option<String>,
}

/// Preference file section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesSection {
    /// Path of the saved grade/number file
    pub file: Option<PathBuf>,
}

/// Adapter filter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for adapters to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Exclude virtual adapters
    #[serde(default)]
    pub exclude_virtual: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# IP Configurator Configuration File

[address]
# Network the derived address is placed into; the last octet must be 0
# (default: 10.156.145.0). The host octet is 20 + 80 * (grade == 1) + number.
network = "10.156.145.0"

# Subnet mask for static assignments (default: 255.255.255.0, at most /24)
mask = "255.255.255.0"

# Default gateway for static assignments (default: none)
# gateway = "10.156.145.1"

[preferences]
# Where the last-used grade and number are saved
# (default: <config dir>/IP Configurator/configuration.json)
# file = "configuration.json"

[filter]
# Regex patterns for adapters shown by `list` (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^eth", "^Ethernet", "^Wi-Fi"]

# Regex patterns for adapters hidden by `list`
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^Docker", "^vEthernet"]

# Hide virtual adapters (VMware, VirtualBox, Hyper-V, bridges, etc.)
exclude_virtual = false
"#
    .to_string()
}
