//! Application execution logic.
//!
//! Dispatches the validated [`Action`] against a [`Session`] and writes
//! command results to stdout.

use std::io::{self, Write};

use thiserror::Error;

use ip_configurator::config::{Action, ConfigError, ValidatedConfig, write_default_config};
use ip_configurator::identity::{Identity, IdentityError};
use ip_configurator::network::filter::ListFilter;
use ip_configurator::network::platform::{PlatformConfigurator, PlatformDirectory};
use ip_configurator::network::{
    AdapterConfigurator, AdapterDirectory, AddressError, DryRunConfigurator, NetworkAdapter,
    StaticAddress, address,
};
use ip_configurator::preferences::{
    FilePreferenceStore, PreferenceError, PreferenceStore, Preferences,
};
use ip_configurator::session::{ModeRequest, Session, SessionError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Adapter enumeration or configuration failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Failed to save the grade/number after a successful change.
    #[error("Failed to save preferences: {0}")]
    PreferenceSave(#[source] PreferenceError),

    /// Failed to write the configuration template.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<IdentityError> for RunError {
    fn from(error: IdentityError) -> Self {
        Self::Session(error.into())
    }
}

impl From<AddressError> for RunError {
    fn from(error: AddressError) -> Self {
        Self::Session(error.into())
    }
}

impl RunError {
    /// Returns true for errors caused by user input rather than the OS.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        match self {
            Self::Session(e) => e.is_usage_error(),
            Self::Config(_) => true,
            Self::PreferenceSave(_) | Self::Output(_) => false,
        }
    }
}

/// Executes the configured action against the platform backend.
///
/// With `--dry-run`, changes are logged by [`DryRunConfigurator`] instead
/// of being applied, and preferences are left untouched.
///
/// # Errors
///
/// Returns the first failure; nothing is retried.
pub fn execute(config: &ValidatedConfig) -> Result<(), RunError> {
    let store = FilePreferenceStore::new(&config.preferences_file);
    let mut stdout = io::stdout().lock();

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - adapter changes will be logged but not applied");
        let mut session = Session::new(PlatformDirectory::default(), DryRunConfigurator);
        dispatch(config, &mut session, &store, &mut stdout)
    } else {
        let mut session = Session::new(
            PlatformDirectory::default(),
            PlatformConfigurator::default(),
        );
        dispatch(config, &mut session, &store, &mut stdout)
    }
}

/// Runs one action with explicit dependencies.
fn dispatch<D, C, S, W>(
    config: &ValidatedConfig,
    session: &mut Session<D, C>,
    store: &S,
    out: &mut W,
) -> Result<(), RunError>
where
    D: AdapterDirectory,
    C: AdapterConfigurator,
    S: PreferenceStore,
    W: Write,
{
    match &config.action {
        Action::List => {
            session.refresh()?;
            write_listing(out, &config.filter, session.adapters())?;
        }
        Action::Info { adapter } => {
            session.refresh()?;
            write!(out, "{}", session.select(adapter)?.info())?;
        }
        Action::Dynamic { adapter } => {
            session.refresh()?;
            let updated = session.apply(adapter, &ModeRequest::Dynamic)?;
            writeln!(out, "Configured.")?;
            writeln!(out, "{}", format_adapter_line(&updated))?;
        }
        Action::Static {
            adapter,
            grade,
            number,
            address,
        } => {
            let (target, identity) = match address {
                Some(explicit) => (StaticAddress::new(*explicit, config.mask)?, None),
                None => {
                    let identity = store
                        .load_or_default()
                        .with_overrides(*grade, *number)
                        .identity()?;
                    let target = StaticAddress::new(identity.address_in(config.network), config.mask)?;
                    (target, Some(identity))
                }
            };
            let target = match config.gateway {
                Some(gateway) => target.with_gateway(gateway)?,
                None => target,
            };

            session.refresh()?;
            let updated = session.apply(adapter, &ModeRequest::Static(target))?;

            if let Some(identity) = identity {
                remember(store, identity, config.dry_run)?;
            }

            writeln!(out, "Configured.")?;
            writeln!(out, "{}", target.address())?;
            writeln!(out, "{}", format_adapter_line(&updated))?;
        }
        Action::Derive { grade, number } => {
            let identity = store
                .load_or_default()
                .with_overrides(*grade, *number)
                .identity()?;
            writeln!(out, "{}", identity.address_in(config.network))?;
        }
        Action::Init { output } => {
            write_default_config(output)?;
            writeln!(out, "Configuration template written to: {}", output.display())?;
        }
    }

    Ok(())
}

/// Saves the grade/number that produced a successful assignment.
fn remember(store: &impl PreferenceStore, identity: Identity, dry_run: bool) -> Result<(), RunError> {
    if dry_run {
        tracing::debug!("Dry-run: not saving {identity}");
        return Ok(());
    }

    store
        .save(&Preferences::from(identity))
        .map_err(RunError::PreferenceSave)
}

/// Writes one line per adapter shown by `filter`.
fn write_listing(
    out: &mut impl Write,
    filter: &ListFilter,
    adapters: &[NetworkAdapter],
) -> io::Result<()> {
    let mut shown = 0usize;
    for adapter in filter.visible(adapters) {
        writeln!(out, "{}", format_adapter_line(adapter))?;
        shown += 1;
    }

    if shown == 0 {
        writeln!(out, "No network adapters found.")?;
    }
    tracing::debug!("Listed {shown} of {} adapter(s)", adapters.len());
    Ok(())
}

/// Formats an adapter as `id  name  mode  address/prefix`.
fn format_adapter_line(adapter: &NetworkAdapter) -> String {
    let address = match (adapter.ipv4, adapter.subnet_mask.and_then(address::prefix_len)) {
        (Some(ip), Some(len)) => format!("{ip}/{len}"),
        (Some(ip), None) => ip.to_string(),
        (None, _) => "-".to_string(),
    };

    format!(
        "{:<6} {:<28} {:<8} {}",
        adapter.id.as_str(),
        adapter.name,
        adapter.mode.to_string(),
        address
    )
}
