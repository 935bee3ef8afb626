//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// IP Configurator: switch a network adapter between DHCP and a static
/// address derived from a grade and laptop number.
#[derive(Debug, Parser)]
#[command(name = "ip-configurator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the saved grade/number file
    #[arg(long, global = true, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Log the changes that would be made without applying them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ip-configurator
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List network adapters
    List(ListArgs),

    /// Show the IPv4 configuration of one adapter
    Info {
        /// Adapter id or name
        adapter: String,
    },

    /// Switch an adapter to DHCP
    Dynamic {
        /// Adapter id or name
        adapter: String,
    },

    /// Assign the static address derived from grade and number
    Static(StaticArgs),

    /// Print the address `static` would assign, without touching any adapter
    Derive(IdentityArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Options for the `list` subcommand.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Include loopback adapters
    #[arg(long)]
    pub all: bool,

    /// Exclude virtual adapters (`VMware`, `VirtualBox`, `Hyper-V`, bridges, etc.)
    #[arg(long = "exclude-virtual")]
    pub exclude_virtual: bool,

    /// Regex pattern for adapter names to include (can be specified multiple times)
    #[arg(long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Regex pattern for adapter names to exclude (can be specified multiple times)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,
}

/// Grade and number overrides; missing values come from saved preferences.
#[derive(Debug, Default, Clone, Copy, Args)]
pub struct IdentityArgs {
    /// Grade (1 or 2)
    #[arg(long, short)]
    pub grade: Option<u32>,

    /// Laptop number (1 to 80)
    #[arg(long, short)]
    pub number: Option<u32>,
}

/// Options for the `static` subcommand.
#[derive(Debug, Args)]
pub struct StaticArgs {
    /// Adapter id or name
    pub adapter: String,

    #[command(flatten)]
    pub identity: IdentityArgs,

    /// Explicit address, bypassing grade/number derivation
    #[arg(long, value_name = "IP")]
    pub address: Option<String>,

    /// Subnet mask
    #[arg(long, value_name = "MASK")]
    pub mask: Option<String>,

    /// Default gateway
    #[arg(long, value_name = "IP")]
    pub gateway: Option<String>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
