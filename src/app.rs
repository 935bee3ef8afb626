//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use ip_configurator::config::ConfigError;
use ip_configurator::network::ConfigureError;
use ip_configurator::session::SessionError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    use crate::run::RunError;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, out-of-range grade, bad address, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - enumeration failure, rejected change, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }

    /// Maps a run failure to its exit code.
    pub fn for_error(error: &RunError) -> ExitCode {
        if error.is_usage_error() {
            CONFIG_ERROR
        } else {
            runtime_error()
        }
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            eprintln!("\nRun 'ip-configurator init' to generate a configuration template.");
        }
        ConfigError::InvalidMask { .. } | ConfigError::InvalidNetwork { .. } => {
            eprintln!("\nCheck the [address] section of the configuration file.");
        }
        _ => {}
    }
}

/// Prints helpful hints for common runtime errors.
pub fn print_run_hint(error: &RunError) {
    match error {
        RunError::Session(SessionError::NoSuchAdapter { .. }) => {
            eprintln!("\nRun 'ip-configurator list --all' to see adapter ids and names.");
        }
        RunError::Session(SessionError::Configure(ConfigureError::PermissionDenied { .. })) => {
            eprintln!("\nChanging adapter addressing requires an elevated (administrator/root) shell.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries command results.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
