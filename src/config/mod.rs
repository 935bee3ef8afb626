//! Configuration layer for IP Configurator.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`Action`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! `--mask` and `--gateway` are only read by `static`; the network prefix is
//! TOML-only.
//!
//! For filter patterns (`include`, `exclude`), CLI patterns **replace**
//! TOML patterns entirely (not merged). Include and exclude are replaced
//! independently.
//!
//! # Boolean Flag Semantics
//!
//! `--exclude-virtual` uses OR semantics: if set `true` in either CLI or
//! TOML, the result is `true`.
//!
//! Grade and number are not part of this layer; they resolve against the
//! saved preferences at run time.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, IdentityArgs, ListArgs, StaticArgs};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{Action, ValidatedConfig, write_default_config};
