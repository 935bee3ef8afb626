//! Fallback backend for targets without adapter configuration support.

use crate::network::{
    AdapterConfigurator, AdapterDirectory, ConfigureError, NetworkAdapter, QueryError,
    StaticAddress,
};

/// Backend that rejects every request with a platform error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl UnsupportedPlatform {
    /// Creates the fallback backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn message() -> String {
        format!(
            "adapter configuration is not supported on {}",
            std::env::consts::OS
        )
    }
}

impl AdapterDirectory for UnsupportedPlatform {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
        Err(QueryError::Platform {
            message: Self::message(),
        })
    }
}

impl AdapterConfigurator for UnsupportedPlatform {
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
        Err(ConfigureError::AdapterUnavailable {
            adapter: adapter.name.clone(),
            reason: Self::message(),
        })
    }

    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        _target: &StaticAddress,
    ) -> Result<(), ConfigureError> {
        Err(ConfigureError::AdapterUnavailable {
            adapter: adapter.name.clone(),
            reason: Self::message(),
        })
    }
}
