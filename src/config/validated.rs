//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::network::address::{self, parse_ipv4};
use crate::network::filter::ListFilter;
use crate::preferences;

use super::cli::{Cli, Command, IdentityArgs, ListArgs, StaticArgs};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// The operation selected on the command line, with its arguments validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the filtered adapter listing.
    List,
    /// Print one adapter's description.
    Info {
        /// Adapter id or name
        adapter: String,
    },
    /// Switch an adapter to DHCP.
    Dynamic {
        /// Adapter id or name
        adapter: String,
    },
    /// Assign a static address.
    Static {
        /// Adapter id or name
        adapter: String,
        /// Grade override
        grade: Option<u32>,
        /// Number override
        number: Option<u32>,
        /// Explicit address, bypassing derivation
        address: Option<Ipv4Addr>,
    },
    /// Print the derived address.
    Derive {
        /// Grade override
        grade: Option<u32>,
        /// Number override
        number: Option<u32>,
    },
    /// Write the configuration template.
    Init {
        /// Output path
        output: PathBuf,
    },
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// What to do
    pub action: Action,

    /// Network the derived octet is placed into
    pub network: Ipv4Addr,

    /// Subnet mask for static assignments
    pub mask: Ipv4Addr,

    /// Gateway for static assignments, `None` clears it
    pub gateway: Option<Ipv4Addr>,

    /// Path of the saved grade/number file
    pub preferences_file: PathBuf,

    /// Adapter filter for the listing
    pub filter: ListFilter,

    /// Dry-run mode (log changes without applying them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gateway_str = self
            .gateway
            .map_or_else(|| "none".to_string(), |g| g.to_string());

        write!(
            f,
            "Config {{ network: {}, mask: {}, gateway: {}, preferences: {}, dry_run: {}, \
             list: {} }}",
            self.network,
            self.mask,
            gateway_str,
            self.preferences_file.display(),
            self.dry_run,
            self.filter,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An address, network, mask or gateway is not a dotted quad
    /// - The network's last octet is not 0
    /// - The mask is not contiguous or longer than /24
    /// - Regex patterns are invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let static_args = match &cli.command {
            Command::Static(args) => Some(args),
            _ => None,
        };

        let action = Self::resolve_action(&cli.command)?;
        let network = Self::resolve_network(toml)?;
        let mask = Self::resolve_mask(static_args, toml)?;
        let gateway = Self::resolve_gateway(static_args, toml)?;
        let preferences_file = Self::resolve_preferences_file(cli, toml);

        let default_list = ListArgs::default();
        let list_args = match &cli.command {
            Command::List(args) => args,
            _ => &default_list,
        };
        let filter = Self::build_filter(list_args, toml)?;

        Ok(Self {
            action,
            network,
            mask,
            gateway,
            preferences_file,
            filter,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_action(command: &Command) -> Result<Action, ConfigError> {
        let action = match command {
            Command::List(_) => Action::List,
            Command::Info { adapter } => Action::Info {
                adapter: adapter.clone(),
            },
            Command::Dynamic { adapter } => Action::Dynamic {
                adapter: adapter.clone(),
            },
            Command::Static(StaticArgs {
                adapter,
                identity: IdentityArgs { grade, number },
                address,
                ..
            }) => Action::Static {
                adapter: adapter.clone(),
                grade: *grade,
                number: *number,
                address: address
                    .as_deref()
                    .map(|value| parse_field(field::ADDRESS, value))
                    .transpose()?,
            },
            Command::Derive(IdentityArgs { grade, number }) => Action::Derive {
                grade: *grade,
                number: *number,
            },
            Command::Init { output } => Action::Init {
                output: output.clone(),
            },
        };
        Ok(action)
    }

    fn resolve_network(toml: Option<&TomlConfig>) -> Result<Ipv4Addr, ConfigError> {
        let Some(value) = toml.and_then(|t| t.address.network.as_deref()) else {
            return Ok(defaults::network());
        };

        let network = parse_field(field::NETWORK, value)?;
        if network.octets()[3] != 0 {
            return Err(ConfigError::InvalidNetwork {
                value: value.to_string(),
                reason: "last octet must be 0".to_string(),
            });
        }
        Ok(network)
    }

    fn resolve_mask(
        args: Option<&StaticArgs>,
        toml: Option<&TomlConfig>,
    ) -> Result<Ipv4Addr, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let Some(value) = args
            .and_then(|a| a.mask.as_deref())
            .or_else(|| toml.and_then(|t| t.address.mask.as_deref()))
        else {
            return Ok(defaults::mask());
        };

        let mask = parse_field(field::MASK, value)?;
        match address::prefix_len(mask) {
            Some(0) | None => Err(ConfigError::InvalidMask {
                value: value.to_string(),
                reason: "must be a contiguous, non-empty mask".to_string(),
            }),
            Some(len) if len > defaults::MAX_PREFIX_LEN => Err(ConfigError::InvalidMask {
                value: value.to_string(),
                reason: format!(
                    "prefix /{len} is longer than /{}",
                    defaults::MAX_PREFIX_LEN
                ),
            }),
            Some(_) => Ok(mask),
        }
    }

    fn resolve_gateway(
        args: Option<&StaticArgs>,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Ipv4Addr>, ConfigError> {
        args.and_then(|a| a.gateway.as_deref())
            .or_else(|| toml.and_then(|t| t.address.gateway.as_deref()))
            .map(|value| parse_field(field::GATEWAY, value))
            .transpose()
    }

    fn resolve_preferences_file(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        // CLI takes precedence
        if let Some(ref path) = cli.preferences {
            return path.clone();
        }

        // Fall back to TOML, then the per-user default
        toml.and_then(|t| t.preferences.file.clone())
            .unwrap_or_else(preferences::default_path)
    }

    fn build_filter(args: &ListArgs, toml: Option<&TomlConfig>) -> Result<ListFilter, ConfigError> {
        let section = toml.map(|t| &t.filter);
        let hide_virtual = args.exclude_virtual || section.is_some_and(|f| f.exclude_virtual);

        // CLI patterns replace TOML patterns, per direction
        let only = if args.include.is_empty() {
            section.map_or(&[][..], |f| f.include.as_slice())
        } else {
            args.include.as_slice()
        };
        let hide = if args.exclude.is_empty() {
            section.map_or(&[][..], |f| f.exclude.as_slice())
        } else {
            args.exclude.as_slice()
        };

        Ok(ListFilter::new()
            .show_loopback(args.all)
            .hide_virtual(hide_virtual)
            .only_names(compile_all(only)?)
            .hide_names(compile_all(hide)?))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_field(name: &'static str, value: &str) -> Result<Ipv4Addr, ConfigError> {
    parse_ipv4(value).map_err(|_| ConfigError::invalid_address(name, value))
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
                pattern: pattern.clone(),
                source: e,
            })
        })
        .collect()
}
