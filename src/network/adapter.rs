//! Core network types for adapter representation.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// How an adapter obtains its IPv4 configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterMode {
    /// Address, mask, gateway and DNS are assigned by a DHCP server.
    Dynamic,
    /// Address and mask are fixed by hand.
    Static,
}

impl AdapterMode {
    /// Returns true for DHCP-assigned addressing.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

impl fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => write!(f, "Dynamic"),
            Self::Static => write!(f, "Static"),
        }
    }
}

/// Network adapter type classification.
///
/// Used for listing and filtering. Configuration logic does not depend on
/// specific values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterKind {
    /// Physical Ethernet adapter.
    Ethernet,
    /// Wireless (Wi-Fi) adapter.
    Wireless,
    /// Loopback adapter (localhost).
    Loopback,
    /// Virtual adapter (`VMware`, `VirtualBox`, `Hyper-V`, bridges, tunnels, etc.).
    Virtual,
    /// Unknown or other adapter type, preserving the original type code for debugging.
    Other(u32),
}

impl AdapterKind {
    /// Returns true if this is a virtual adapter.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual)
    }

    /// Returns true if this is a loopback adapter.
    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        matches!(self, Self::Loopback)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethernet => write!(f, "Ethernet"),
            Self::Wireless => write!(f, "Wireless"),
            Self::Loopback => write!(f, "Loopback"),
            Self::Virtual => write!(f, "Virtual"),
            Self::Other(code) => write!(f, "Other({code})"),
        }
    }
}

/// Stable OS identifier of an adapter.
///
/// The interface index on Windows, the kernel device name on Linux.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdapterId(String);

impl AdapterId {
    /// Wraps an OS-provided identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A snapshot of a single network adapter's IPv4 configuration.
///
/// Reflects the OS-reported state at the time of enumeration and is never
/// updated in place; refresh the directory to observe changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAdapter {
    /// Stable OS identifier.
    pub id: AdapterId,
    /// The friendly name of the adapter (e.g., "Ethernet", "Wi-Fi", "eth0").
    pub name: String,
    /// Driver or hardware description, when reported.
    pub description: Option<String>,
    /// The type of adapter.
    pub kind: AdapterKind,
    /// Whether the adapter currently uses DHCP.
    pub mode: AdapterMode,
    /// Primary IPv4 address, if one is assigned.
    pub ipv4: Option<Ipv4Addr>,
    /// Subnet mask belonging to [`Self::ipv4`].
    pub subnet_mask: Option<Ipv4Addr>,
    /// Default gateway.
    pub gateway: Option<Ipv4Addr>,
    /// DNS servers in resolver order.
    pub dns_servers: Vec<Ipv4Addr>,
    /// Hardware address formatted as `AA-BB-CC-DD-EE-FF`.
    pub mac: Option<String>,
    /// DHCP server that leased the current address.
    pub dhcp_server: Option<Ipv4Addr>,
}

impl NetworkAdapter {
    /// Creates a snapshot with only identity, kind and mode populated.
    ///
    /// Address fields start empty; use the `with_*` builders to fill them.
    #[must_use]
    pub fn new(id: AdapterId, name: impl Into<String>, kind: AdapterKind, mode: AdapterMode) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            kind,
            mode,
            ipv4: None,
            subnet_mask: None,
            gateway: None,
            dns_servers: Vec::new(),
            mac: None,
            dhcp_server: None,
        }
    }

    /// Sets the primary address and its mask.
    #[must_use]
    pub fn with_address(mut self, ipv4: Ipv4Addr, mask: Ipv4Addr) -> Self {
        self.ipv4 = Some(ipv4);
        self.subnet_mask = Some(mask);
        self
    }

    /// Sets the default gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Sets the DNS server list.
    #[must_use]
    pub fn with_dns_servers(mut self, servers: Vec<Ipv4Addr>) -> Self {
        self.dns_servers = servers;
        self
    }

    /// Returns true if the adapter obtains its address via DHCP.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.mode.is_dynamic()
    }

    /// Returns the descriptive key/value pairs shown to the user.
    ///
    /// Fields the OS did not report are omitted.
    #[must_use]
    pub fn info(&self) -> AdapterInfo {
        let mut info = AdapterInfo::default();
        info.push(info_key::NAME, &self.name);
        info.push(info_key::ID, &self.id);
        info.push_opt(info_key::DESCRIPTION, self.description.as_ref());
        info.push(info_key::KIND, self.kind);
        info.push(info_key::MODE, self.mode);
        info.push_opt(info_key::MAC, self.mac.as_ref());
        info.push_opt(info_key::IPV4, self.ipv4);
        info.push_opt(info_key::SUBNET_MASK, self.subnet_mask);
        info.push_opt(info_key::GATEWAY, self.gateway);
        if !self.dns_servers.is_empty() {
            let joined = self
                .dns_servers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            info.push(info_key::DNS, joined);
        }
        info.push_opt(info_key::DHCP_SERVER, self.dhcp_server);
        info
    }
}

/// Keys used by [`NetworkAdapter::info`].
pub mod info_key {
    /// Display name.
    pub const NAME: &str = "Name";
    /// OS identifier.
    pub const ID: &str = "Id";
    /// Driver description.
    pub const DESCRIPTION: &str = "Description";
    /// Adapter kind.
    pub const KIND: &str = "Kind";
    /// Dynamic or static.
    pub const MODE: &str = "Mode";
    /// Hardware address.
    pub const MAC: &str = "MAC";
    /// Primary IPv4 address.
    pub const IPV4: &str = "IPv4";
    /// Subnet mask.
    pub const SUBNET_MASK: &str = "Subnet Mask";
    /// Default gateway.
    pub const GATEWAY: &str = "Gateway";
    /// Comma-separated DNS servers.
    pub const DNS: &str = "DNS";
    /// Leasing DHCP server.
    pub const DHCP_SERVER: &str = "DHCP Server";
}

/// Ordered, flat description of an adapter for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterInfo {
    entries: Vec<(&'static str, String)>,
}

impl AdapterInfo {
    fn push(&mut self, key: &'static str, value: impl fmt::Display) {
        self.entries.push((key, value.to_string()));
    }

    fn push_opt<T: fmt::Display>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key} : {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethernet() -> NetworkAdapter {
        NetworkAdapter::new(
            AdapterId::new("12"),
            "Ethernet",
            AdapterKind::Ethernet,
            AdapterMode::Dynamic,
        )
    }

    mod adapter_mode {
        use super::*;

        #[test]
        fn dynamic_is_dynamic() {
            assert!(AdapterMode::Dynamic.is_dynamic());
            assert!(!AdapterMode::Static.is_dynamic());
        }

        #[test]
        fn display_formats_correctly() {
            assert_eq!(AdapterMode::Dynamic.to_string(), "Dynamic");
            assert_eq!(AdapterMode::Static.to_string(), "Static");
        }
    }

    mod adapter_kind {
        use super::*;

        #[test]
        fn virtual_is_virtual() {
            assert!(AdapterKind::Virtual.is_virtual());
            assert!(!AdapterKind::Ethernet.is_virtual());
            assert!(!AdapterKind::Other(999).is_virtual());
        }

        #[test]
        fn loopback_is_loopback() {
            assert!(AdapterKind::Loopback.is_loopback());
            assert!(!AdapterKind::Wireless.is_loopback());
        }

        #[test]
        fn other_displays_type_code() {
            assert_eq!(AdapterKind::Other(42).to_string(), "Other(42)");
        }
    }

    mod network_adapter {
        use super::*;

        #[test]
        fn new_starts_without_addresses() {
            let adapter = ethernet();

            assert_eq!(adapter.id.as_str(), "12");
            assert!(adapter.ipv4.is_none());
            assert!(adapter.dns_servers.is_empty());
            assert!(adapter.is_dynamic());
        }
    }

    mod adapter_info {
        use super::*;

        #[test]
        fn omits_missing_fields() {
            let info = ethernet().info();

            assert_eq!(info.get(info_key::NAME), Some("Ethernet"));
            assert_eq!(info.get(info_key::MODE), Some("Dynamic"));
            assert_eq!(info.get(info_key::IPV4), None);
            assert_eq!(info.get(info_key::GATEWAY), None);
            assert_eq!(info.get(info_key::DNS), None);
        }

        #[test]
        fn includes_address_fields_in_order() {
            let adapter = ethernet()
                .with_address(
                    Ipv4Addr::new(10, 156, 145, 25),
                    Ipv4Addr::new(255, 255, 255, 0),
                )
                .with_gateway(Ipv4Addr::new(10, 156, 145, 1))
                .with_dns_servers(vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(8, 8, 8, 8)]);

            let info = adapter.info();
            let keys: Vec<_> = info.iter().map(|(k, _)| k).collect();

            assert_eq!(info.get(info_key::IPV4), Some("10.156.145.25"));
            assert_eq!(info.get(info_key::SUBNET_MASK), Some("255.255.255.0"));
            assert_eq!(info.get(info_key::DNS), Some("1.1.1.1, 8.8.8.8"));
            assert_eq!(
                keys,
                ["Name", "Id", "Kind", "Mode", "IPv4", "Subnet Mask", "Gateway", "DNS"]
            );
        }

        #[test]
        fn display_renders_key_value_lines() {
            let info = ethernet().info();
            let rendered = info.to_string();

            assert!(rendered.starts_with("Name : Ethernet\n"));
            assert!(rendered.contains("Mode : Dynamic\n"));
            assert_eq!(rendered.lines().count(), info.len());
        }
    }
}
