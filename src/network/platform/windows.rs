//! Windows-specific adapter enumeration using `GetAdaptersAddresses`.

use crate::network::address::mask_from_prefix;
use crate::network::{
    AdapterDirectory, AdapterId, AdapterKind, AdapterMode, NetworkAdapter, QueryError,
};
use std::net::Ipv4Addr;
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_INCLUDE_GATEWAYS, GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_MULTICAST,
    GET_ADAPTERS_ADDRESSES_FLAGS, GetAdaptersAddresses, IF_TYPE_ETHERNET_CSMACD,
    IF_TYPE_IEEE80211, IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::Networking::WinSock::{AF_INET, SOCKADDR_IN, SOCKET_ADDRESS};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// `IP_ADAPTER_DHCP_ENABLED` bit of `IP_ADAPTER_ADDRESSES_LH::Flags`.
const IP_ADAPTER_DHCP_ENABLED: u32 = 0x0004;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`AdapterDirectory`] using `GetAdaptersAddresses`.
///
/// Reports each adapter's first IPv4 address, gateway, DNS servers and
/// DHCP state. The adapter id is the interface index.
///
/// # Example
///
/// ```no_run
/// use ip_configurator::network::{AdapterDirectory, platform::WindowsDirectory};
///
/// let directory = WindowsDirectory::new();
/// let adapters = directory.list_adapters().expect("Failed to list adapters");
///
/// for adapter in adapters {
///     println!("{} [{}]: {:?}", adapter.name, adapter.mode, adapter.ipv4);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsDirectory {
    _private: (),
}

impl WindowsDirectory {
    /// Creates a new Windows adapter directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AdapterDirectory for WindowsDirectory {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
        let adapters = fetch_adapters()?;
        tracing::debug!("Enumerated {} adapters via IP Helper", adapters.len());
        Ok(adapters)
    }
}

/// Fetches all IPv4-capable adapters using `GetAdaptersAddresses`.
fn fetch_adapters() -> Result<Vec<NetworkAdapter>, QueryError> {
    let raw_adapters = get_adapter_addresses()?;

    let mut adapters = Vec::new();
    let mut current = first_entry(&raw_adapters);

    // SAFETY: We iterate through a linked list returned by GetAdaptersAddresses.
    // The list is valid as long as the buffer (`raw_adapters`) is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };

        if let Some(parsed) = parse_adapter(adapter) {
            adapters.push(parsed);
        }

        current = adapter.Next;
    }

    Ok(adapters)
}

/// Returns the head of the adapter list in `buffer`, or null when the buffer
/// is too short to hold one entry (`ERROR_NO_DATA` leaves it empty).
#[allow(clippy::cast_ptr_alignment)]
fn first_entry(buffer: &[u8]) -> *const IP_ADAPTER_ADDRESSES_LH {
    if buffer.len() < std::mem::size_of::<IP_ADAPTER_ADDRESSES_LH>() {
        return std::ptr::null();
    }
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    buffer.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>()
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// Handles the two-call pattern: first with an estimated buffer size, then
/// with the exact size if the buffer was too small.
fn get_adapter_addresses() -> Result<Vec<u8>, QueryError> {
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_INCLUDE_GATEWAYS;
    let family = u32::from(AF_INET.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size. The function writes adapter
    // information to the buffer and updates `size` with the required length.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    handle_api_result(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Handles the result of `GetAdaptersAddresses`, retrying with a larger buffer
/// on overflow.
#[cfg(not(tarpaulin_include))]
fn handle_api_result(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), QueryError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_NO_DATA, NO_ERROR};

    if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        };

        if result != NO_ERROR.0 {
            return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
        }
    } else if result == ERROR_NO_DATA.0 {
        // No IPv4 adapters at all: an empty list, not a failure
        buffer.clear();
    } else if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Parses a single `IP_ADAPTER_ADDRESSES_LH` structure into a [`NetworkAdapter`].
///
/// Returns `None` if the adapter name cannot be read.
fn parse_adapter(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<NetworkAdapter> {
    let name = unsafe { adapter.FriendlyName.to_string().ok()? };
    let description = unsafe { adapter.Description.to_string().ok() }.filter(|d| !d.is_empty());

    // SAFETY: both union views of these fields are plain integers.
    let if_index = unsafe { adapter.Anonymous1.Anonymous.IfIndex };
    let flags = unsafe { adapter.Anonymous2.Flags };

    let mode = if flags & IP_ADAPTER_DHCP_ENABLED == 0 {
        AdapterMode::Static
    } else {
        AdapterMode::Dynamic
    };

    let mut parsed = NetworkAdapter::new(
        AdapterId::new(if_index.to_string()),
        name,
        map_adapter_type(adapter.IfType),
        mode,
    )
    .with_dns_servers(collect_dns_servers(adapter));

    if let Some((ip, prefix)) = first_unicast(adapter) {
        parsed = parsed.with_address(ip, mask_from_prefix(prefix));
    }
    if let Some(gateway) = first_gateway(adapter) {
        parsed = parsed.with_gateway(gateway);
    }
    parsed.description = description;
    parsed.mac = format_mac(&adapter.PhysicalAddress, adapter.PhysicalAddressLength);
    if mode.is_dynamic() {
        parsed.dhcp_server = sockaddr_v4(&adapter.Dhcpv4Server);
    }

    Some(parsed)
}

/// Maps Windows `IF_TYPE_*` constants to [`AdapterKind`].
const fn map_adapter_type(if_type: u32) -> AdapterKind {
    match if_type {
        IF_TYPE_ETHERNET_CSMACD => AdapterKind::Ethernet,
        IF_TYPE_IEEE80211 => AdapterKind::Wireless,
        IF_TYPE_SOFTWARE_LOOPBACK => AdapterKind::Loopback,
        IF_TYPE_TUNNEL | IF_TYPE_PPP => AdapterKind::Virtual,
        other => AdapterKind::Other(other),
    }
}

/// Formats a hardware address as `AA-BB-CC-DD-EE-FF`, or `None` if absent.
fn format_mac(bytes: &[u8; 8], len: u32) -> Option<String> {
    let len = (len as usize).min(bytes.len());
    if len == 0 {
        return None;
    }
    Some(
        bytes[..len]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join("-"),
    )
}

/// Reads an IPv4 address out of a `SOCKET_ADDRESS`, if it holds one.
#[allow(clippy::cast_ptr_alignment)]
fn sockaddr_v4(address: &SOCKET_ADDRESS) -> Option<Ipv4Addr> {
    // SAFETY: lpSockaddr is either null or points into the adapter buffer.
    let sockaddr = unsafe { address.lpSockaddr.as_ref()? };
    if sockaddr.sa_family != AF_INET {
        return None;
    }
    // SAFETY: We verified the family is AF_INET, so this is a valid cast.
    let sockaddr_in = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
    // SAFETY: sin_addr contains the IPv4 address bytes in network order.
    let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
    let ip = Ipv4Addr::new(octets.s_b1, octets.s_b2, octets.s_b3, octets.s_b4);
    (!ip.is_unspecified()).then_some(ip)
}

/// Returns the first IPv4 unicast address and its on-link prefix length.
fn first_unicast(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<(Ipv4Addr, u8)> {
    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: Each entry is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };
        if let Some(ip) = sockaddr_v4(&entry.Address) {
            return Some((ip, entry.OnLinkPrefixLength));
        }
        unicast = entry.Next;
    }
    None
}

/// Returns the first IPv4 default gateway.
fn first_gateway(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<Ipv4Addr> {
    let mut gateway = adapter.FirstGatewayAddress;

    // SAFETY: Each entry is valid as long as the parent adapter buffer is alive.
    while !gateway.is_null() {
        let entry = unsafe { &*gateway };
        if let Some(ip) = sockaddr_v4(&entry.Address) {
            return Some(ip);
        }
        gateway = entry.Next;
    }
    None
}

/// Collects IPv4 DNS servers in resolver order.
fn collect_dns_servers(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<Ipv4Addr> {
    let mut servers = Vec::new();
    let mut dns = adapter.FirstDnsServerAddress;

    // SAFETY: Each entry is valid as long as the parent adapter buffer is alive.
    while !dns.is_null() {
        let entry = unsafe { &*dns };
        servers.extend(sockaddr_v4(&entry.Address));
        dns = entry.Next;
    }
    servers
}
