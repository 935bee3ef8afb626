//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::net::Ipv4Addr;

use crate::identity;
use crate::network::address;

/// Default output path of `init`.
pub const CONFIG_FILE: &str = "ip-configurator.toml";

/// Longest mask prefix that still leaves the last octet to the host part.
pub const MAX_PREFIX_LEN: u8 = 24;

/// Network the derived octet is placed into.
#[must_use]
pub const fn network() -> Ipv4Addr {
    identity::DEFAULT_NETWORK
}

/// Subnet mask for static assignments.
#[must_use]
pub const fn mask() -> Ipv4Addr {
    address::DEFAULT_MASK
}
