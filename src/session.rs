//! Orchestrates adapter enumeration and configuration.
//!
//! A [`Session`] owns the last adapter snapshot and applies mode changes
//! through its injected [`AdapterDirectory`] and [`AdapterConfigurator`].

use thiserror::Error;

use crate::identity::IdentityError;
use crate::network::{
    AdapterConfigurator, AdapterDirectory, AdapterMode, AddressError, ConfigureError,
    NetworkAdapter, QueryError, StaticAddress,
};

/// The addressing an adapter should be switched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeRequest {
    /// Hand the adapter back to DHCP.
    Dynamic,
    /// Assign a fixed address.
    Static(StaticAddress),
}

impl ModeRequest {
    /// The adapter mode this request should produce.
    #[must_use]
    pub const fn mode(&self) -> AdapterMode {
        match self {
            Self::Dynamic => AdapterMode::Dynamic,
            Self::Static(_) => AdapterMode::Static,
        }
    }
}

/// Errors surfaced by [`Session`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Enumerating adapters failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The OS rejected the configuration change.
    #[error(transparent)]
    Configure(#[from] ConfigureError),

    /// The requested static address is invalid.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The grade or number is out of range.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The selector matches nothing in the current snapshot.
    #[error("No network adapter named '{selector}'")]
    NoSuchAdapter {
        /// The id or name that was looked up.
        selector: String,
    },
}

impl SessionError {
    /// Returns true for errors caused by user input rather than the OS.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Address(_) | Self::Identity(_) | Self::NoSuchAdapter { .. }
        )
    }
}

/// Adapter controller with explicit dependencies.
#[derive(Debug)]
pub struct Session<D, C> {
    directory: D,
    configurator: C,
    adapters: Vec<NetworkAdapter>,
}

impl<D: AdapterDirectory, C: AdapterConfigurator> Session<D, C> {
    /// Creates a session with an empty snapshot. Call [`Self::refresh`]
    /// before selecting adapters.
    pub const fn new(directory: D, configurator: C) -> Self {
        Self {
            directory,
            configurator,
            adapters: Vec::new(),
        }
    }

    /// Re-enumerates adapters and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Query`] if enumeration fails. The previous
    /// snapshot is kept in that case.
    pub fn refresh(&mut self) -> Result<&[NetworkAdapter], SessionError> {
        self.adapters = self.directory.list_adapters()?;
        tracing::debug!("Enumerated {} adapter(s)", self.adapters.len());
        Ok(&self.adapters)
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn adapters(&self) -> &[NetworkAdapter] {
        &self.adapters
    }

    /// Looks up an adapter in the current snapshot, by id first and then
    /// by display name.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchAdapter`] if nothing matches.
    pub fn select(&self, selector: &str) -> Result<&NetworkAdapter, SessionError> {
        self.adapters
            .iter()
            .find(|adapter| adapter.id.as_str() == selector)
            .or_else(|| self.adapters.iter().find(|adapter| adapter.name == selector))
            .ok_or_else(|| SessionError::NoSuchAdapter {
                selector: selector.to_string(),
            })
    }

    /// Applies `request` to the selected adapter, refreshes, and returns the
    /// adapter's new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchAdapter`] if the selector is unknown
    /// before or after the change, [`SessionError::Configure`] if the OS
    /// rejects it, or [`SessionError::Query`] if the refresh fails.
    pub fn apply(
        &mut self,
        selector: &str,
        request: &ModeRequest,
    ) -> Result<NetworkAdapter, SessionError> {
        let adapter = self.select(selector)?.clone();

        match request {
            ModeRequest::Dynamic => {
                tracing::info!("Switching '{}' to DHCP", adapter.name);
                self.configurator.set_dynamic(&adapter)?;
            }
            ModeRequest::Static(target) => {
                tracing::info!("Assigning {target} to '{}'", adapter.name);
                self.configurator.set_static(&adapter, target)?;
            }
        }

        self.refresh()?;

        let updated = self
            .adapters
            .iter()
            .find(|candidate| candidate.id == adapter.id)
            .cloned()
            .ok_or_else(|| SessionError::NoSuchAdapter {
                selector: selector.to_string(),
            })?;

        if updated.mode != request.mode() {
            tracing::warn!(
                "'{}' still reports {} addressing after requesting {}",
                updated.name,
                updated.mode,
                request.mode()
            );
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::network::{AdapterId, AdapterKind, info_key};
    use std::cell::{Cell, RefCell};
    use std::net::Ipv4Addr;

    /// A fake host network that both reports and applies changes.
    struct InMemoryNetwork {
        adapters: RefCell<Vec<NetworkAdapter>>,
        reject: Cell<bool>,
        sticky: Cell<bool>,
        queries: Cell<usize>,
    }

    impl InMemoryNetwork {
        fn new(adapters: Vec<NetworkAdapter>) -> Self {
            Self {
                adapters: RefCell::new(adapters),
                reject: Cell::new(false),
                sticky: Cell::new(false),
                queries: Cell::new(0),
            }
        }

        fn update(&self, id: &AdapterId, change: impl FnOnce(&mut NetworkAdapter)) {
            if self.sticky.get() {
                return;
            }
            if let Some(adapter) = self.adapters.borrow_mut().iter_mut().find(|a| &a.id == id) {
                change(adapter);
            }
        }
    }

    impl AdapterDirectory for InMemoryNetwork {
        fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
            self.queries.set(self.queries.get() + 1);
            Ok(self.adapters.borrow().clone())
        }
    }

    impl AdapterConfigurator for InMemoryNetwork {
        fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
            if self.reject.get() {
                return Err(ConfigureError::PermissionDenied {
                    adapter: adapter.name.clone(),
                });
            }
            self.update(&adapter.id, |a| {
                a.mode = AdapterMode::Dynamic;
                a.ipv4 = Some(Ipv4Addr::new(10, 156, 145, 200));
                a.subnet_mask = Some(Ipv4Addr::new(255, 255, 255, 0));
                a.gateway = Some(Ipv4Addr::new(10, 156, 145, 1));
            });
            Ok(())
        }

        fn set_static(
            &self,
            adapter: &NetworkAdapter,
            target: &StaticAddress,
        ) -> Result<(), ConfigureError> {
            if self.reject.get() {
                return Err(ConfigureError::PermissionDenied {
                    adapter: adapter.name.clone(),
                });
            }
            self.update(&adapter.id, |a| {
                a.mode = AdapterMode::Static;
                a.ipv4 = Some(target.address());
                a.subnet_mask = Some(target.mask());
                a.gateway = target.gateway();
            });
            Ok(())
        }
    }

    fn adapter(id: &str, name: &str, mode: AdapterMode) -> NetworkAdapter {
        NetworkAdapter::new(AdapterId::new(id), name, AdapterKind::Ethernet, mode)
    }

    fn lab_network() -> InMemoryNetwork {
        InMemoryNetwork::new(vec![
            adapter("4", "Ethernet", AdapterMode::Dynamic),
            adapter("9", "Wi-Fi", AdapterMode::Static)
                .with_address(Ipv4Addr::new(192, 168, 1, 5), Ipv4Addr::new(255, 255, 255, 0)),
        ])
    }

    fn static_request(grade: u32, number: u32) -> ModeRequest {
        let identity = Identity::new(grade, number).unwrap();
        ModeRequest::Static(
            StaticAddress::new(identity.address(), Ipv4Addr::new(255, 255, 255, 0)).unwrap(),
        )
    }

    #[test]
    fn new_session_has_empty_snapshot() {
        let network = lab_network();
        let session = Session::new(&network, &network);

        assert!(session.adapters().is_empty());
        assert_eq!(network.queries.get(), 0);
    }

    #[test]
    fn refresh_stores_snapshot() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);

        assert_eq!(session.refresh().unwrap().len(), 2);
        assert_eq!(session.adapters()[1].name, "Wi-Fi");
    }

    #[test]
    fn select_prefers_id_over_name() {
        let network = InMemoryNetwork::new(vec![
            adapter("eth1", "eth0", AdapterMode::Dynamic),
            adapter("eth0", "uplink", AdapterMode::Dynamic),
        ]);
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        assert_eq!(session.select("eth0").unwrap().name, "uplink");
        assert_eq!(session.select("uplink").unwrap().id.as_str(), "eth0");
        assert_eq!(session.select("eth1").unwrap().name, "eth0");
    }

    #[test]
    fn select_unknown_adapter_fails() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        let error = session.select("Bluetooth").unwrap_err();
        assert!(matches!(error, SessionError::NoSuchAdapter { ref selector } if selector == "Bluetooth"));
        assert!(error.is_usage_error());
    }

    #[test]
    fn select_requires_refresh() {
        let network = lab_network();
        let session = Session::new(&network, &network);

        assert!(session.select("Ethernet").is_err());
    }

    #[test]
    fn static_then_dynamic_round_trip() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        let fixed = session.apply("Ethernet", &static_request(2, 5)).unwrap();
        assert_eq!(fixed.mode, AdapterMode::Static);
        assert_eq!(fixed.ipv4, Some(Ipv4Addr::new(10, 156, 145, 25)));
        let info = session.select("Ethernet").unwrap().info();
        assert_eq!(info.get(info_key::IPV4), Some("10.156.145.25"));
        assert_eq!(info.get(info_key::MODE), Some("Static"));
        assert!(!session.select("Ethernet").unwrap().is_dynamic());

        let dynamic = session.apply("Ethernet", &ModeRequest::Dynamic).unwrap();
        assert!(dynamic.is_dynamic());
        assert!(session.select("4").unwrap().is_dynamic());
    }

    #[test]
    fn dynamic_on_dynamic_adapter_is_idempotent() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        session.apply("Ethernet", &ModeRequest::Dynamic).unwrap();
        let again = session.apply("Ethernet", &ModeRequest::Dynamic).unwrap();

        assert!(again.is_dynamic());
    }

    #[test]
    fn static_leaves_other_adapters_alone() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        session.apply("Ethernet", &static_request(1, 1)).unwrap();

        let wifi = session.select("Wi-Fi").unwrap();
        assert_eq!(wifi.ipv4, Some(Ipv4Addr::new(192, 168, 1, 5)));
    }

    #[test]
    fn apply_refreshes_snapshot() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        session.apply("Wi-Fi", &ModeRequest::Dynamic).unwrap();

        assert_eq!(network.queries.get(), 2);
    }

    #[test]
    fn rejected_change_surfaces_configure_error() {
        let network = lab_network();
        network.reject.set(true);
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        let error = session.apply("Ethernet", &static_request(2, 5)).unwrap_err();

        assert!(matches!(error, SessionError::Configure(ConfigureError::PermissionDenied { .. })));
        assert!(!error.is_usage_error());
        assert!(session.select("Ethernet").unwrap().is_dynamic());
    }

    #[test]
    fn unchanged_mode_is_still_returned() {
        let network = lab_network();
        network.sticky.set(true);
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        let updated = session.apply("Ethernet", &static_request(2, 5)).unwrap();

        assert!(updated.is_dynamic());
    }

    #[test]
    fn apply_unknown_adapter_does_not_configure() {
        let network = lab_network();
        let mut session = Session::new(&network, &network);
        session.refresh().unwrap();

        let error = session.apply("eth7", &ModeRequest::Dynamic).unwrap_err();

        assert!(matches!(error, SessionError::NoSuchAdapter { .. }));
        assert_eq!(network.queries.get(), 1);
    }

    #[test]
    fn request_reports_target_mode() {
        assert_eq!(ModeRequest::Dynamic.mode(), AdapterMode::Dynamic);
        assert_eq!(static_request(2, 1).mode(), AdapterMode::Static);
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let error = SessionError::from(IdentityError::GradeOutOfRange { grade: 3 });
        assert_eq!(error.to_string(), "grade must be 1 or 2, got 3");
        assert!(error.is_usage_error());
    }
}
