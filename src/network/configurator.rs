//! Adapter configuration trait and error types.

use super::{NetworkAdapter, StaticAddress};
use thiserror::Error;

/// Error type for rejected configuration changes.
///
/// The configurator never retries; every variant is surfaced to the caller.
#[derive(Debug, Error)]
pub enum ConfigureError {
    /// The change requires elevated privileges.
    #[error("Permission denied while configuring '{adapter}': run as administrator/root")]
    PermissionDenied {
        /// Adapter that was being configured.
        adapter: String,
    },

    /// The adapter is missing, disabled, or not managed by the OS tool.
    #[error("Adapter '{adapter}' is unavailable: {reason}")]
    AdapterUnavailable {
        /// Adapter that was being configured.
        adapter: String,
        /// Why it cannot be configured.
        reason: String,
    },

    /// The OS or driver refused the change.
    #[error("Configuration of '{adapter}' was rejected: {message}")]
    Rejected {
        /// Adapter that was being configured.
        adapter: String,
        /// Message reported by the OS.
        message: String,
    },

    /// The configuration tool could not be started.
    #[error("Failed to run '{program}': {source}")]
    Launch {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Mutates an adapter's OS-level IPv4 configuration.
///
/// Changes persist in the host network stack beyond the process lifetime
/// and usually require elevated privileges.
pub trait AdapterConfigurator {
    /// Switches the adapter to DHCP for address, mask, gateway and DNS.
    ///
    /// Switching an adapter that is already dynamic succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError`] if the OS rejects the change.
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError>;

    /// Assigns a fixed address and mask, replacing the gateway with the
    /// target's gateway (or none). DNS servers are not changed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError`] if the OS rejects the change.
    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        target: &StaticAddress,
    ) -> Result<(), ConfigureError>;
}

impl<T: AdapterConfigurator + ?Sized> AdapterConfigurator for &T {
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
        (**self).set_dynamic(adapter)
    }

    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        target: &StaticAddress,
    ) -> Result<(), ConfigureError> {
        (**self).set_static(adapter, target)
    }
}

/// Configurator that logs the requested change instead of applying it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunConfigurator;

impl AdapterConfigurator for DryRunConfigurator {
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
        tracing::info!("[dry-run] would switch '{}' to DHCP", adapter.name);
        Ok(())
    }

    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        target: &StaticAddress,
    ) -> Result<(), ConfigureError> {
        tracing::info!("[dry-run] would assign {target} to '{}'", adapter.name);
        Ok(())
    }
}
