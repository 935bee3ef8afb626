//! Validated static IPv4 targets.

use std::fmt;
use std::net::Ipv4Addr;

use thiserror::Error;

/// Default subnet mask for static assignments (`/24`).
pub const DEFAULT_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// Error type for rejected static address input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is not an IPv4 dotted quad.
    #[error("'{value}' is not a valid IPv4 address")]
    Malformed {
        /// The rejected input.
        value: String,
    },

    /// Address lies outside the RFC 1918 private ranges.
    #[error("{address} is not a private address (expected 10/8, 172.16/12 or 192.168/16)")]
    NotPrivate {
        /// The rejected address.
        address: Ipv4Addr,
    },

    /// Mask bits are not contiguous.
    #[error("{mask} is not a valid subnet mask")]
    InvalidMask {
        /// The rejected mask.
        mask: Ipv4Addr,
    },

    /// Address is the network or broadcast address of its subnet.
    #[error("{address} is not a usable host address in a /{prefix_len} subnet")]
    NotHostAddress {
        /// The rejected address.
        address: Ipv4Addr,
        /// Prefix length derived from the mask.
        prefix_len: u8,
    },

    /// Gateway is not reachable on the configured subnet.
    #[error("gateway {gateway} is outside subnet {network}/{prefix_len}")]
    GatewayOutsideSubnet {
        /// The rejected gateway.
        gateway: Ipv4Addr,
        /// Network address of the subnet.
        network: Ipv4Addr,
        /// Prefix length of the subnet.
        prefix_len: u8,
    },
}

/// Parses a dotted-quad IPv4 address.
///
/// # Errors
///
/// Returns [`AddressError::Malformed`] if `value` is not a dotted quad.
pub fn parse_ipv4(value: &str) -> Result<Ipv4Addr, AddressError> {
    value.trim().parse().map_err(|_| AddressError::Malformed {
        value: value.to_string(),
    })
}

/// Returns the prefix length of `mask`, or `None` if its bits are not contiguous.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // leading_ones is at most 32
pub const fn prefix_len(mask: Ipv4Addr) -> Option<u8> {
    let bits = mask.to_bits();
    let ones = bits.leading_ones();
    let rest = match bits.checked_shl(ones) {
        Some(rest) => rest,
        None => 0,
    };
    if rest == 0 { Some(ones as u8) } else { None }
}

/// Builds the subnet mask for a prefix length, saturating at `/32`.
#[must_use]
pub const fn mask_from_prefix(prefix_len: u8) -> Ipv4Addr {
    let len = if prefix_len > 32 { 32 } else { prefix_len as u32 };
    let bits = match u32::MAX.checked_shl(32 - len) {
        Some(bits) => bits,
        None => 0,
    };
    Ipv4Addr::from_bits(bits)
}

/// A static IPv4 assignment that has passed validation.
///
/// # Gateway policy
///
/// A static assignment without a gateway clears the adapter's default
/// gateway. DNS servers are never part of a static assignment and are left
/// as the OS has them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAddress {
    address: Ipv4Addr,
    mask: Ipv4Addr,
    prefix_len: u8,
    gateway: Option<Ipv4Addr>,
}

impl StaticAddress {
    /// Validates an address and mask.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not private, the mask is not
    /// contiguous, or the address is the network or broadcast address of
    /// the subnet.
    pub fn new(address: Ipv4Addr, mask: Ipv4Addr) -> Result<Self, AddressError> {
        if !address.is_private() {
            return Err(AddressError::NotPrivate { address });
        }

        let prefix_len = prefix_len(mask).ok_or(AddressError::InvalidMask { mask })?;
        if prefix_len == 0 {
            return Err(AddressError::InvalidMask { mask });
        }

        // /31 and /32 have no network/broadcast addresses to exclude
        if prefix_len < 31 {
            let host_bits = address.to_bits() & !mask.to_bits();
            if host_bits == 0 || host_bits == !mask.to_bits() {
                return Err(AddressError::NotHostAddress {
                    address,
                    prefix_len,
                });
            }
        }

        Ok(Self {
            address,
            mask,
            prefix_len,
            gateway: None,
        })
    }

    /// Parses and validates dotted-quad address and mask strings.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Malformed`] for unparsable input, otherwise
    /// the errors of [`StaticAddress::new`].
    pub fn parse(address: &str, mask: &str) -> Result<Self, AddressError> {
        Self::new(parse_ipv4(address)?, parse_ipv4(mask)?)
    }

    /// Attaches a default gateway, which must lie inside the subnet.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::GatewayOutsideSubnet`] if it does not.
    pub fn with_gateway(mut self, gateway: Ipv4Addr) -> Result<Self, AddressError> {
        if gateway == self.address || !self.contains(gateway) {
            return Err(AddressError::GatewayOutsideSubnet {
                gateway,
                network: self.network(),
                prefix_len: self.prefix_len,
            });
        }
        self.gateway = Some(gateway);
        Ok(self)
    }

    /// The host address.
    #[must_use]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// The subnet mask.
    #[must_use]
    pub const fn mask(&self) -> Ipv4Addr {
        self.mask
    }

    /// The subnet prefix length.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The default gateway, if any.
    #[must_use]
    pub const fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    /// The network address of the subnet.
    #[must_use]
    pub const fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.address.to_bits() & self.mask.to_bits())
    }

    fn contains(&self, other: Ipv4Addr) -> bool {
        other.to_bits() & self.mask.to_bits() == self.network().to_bits()
    }
}

impl fmt::Display for StaticAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)?;
        if let Some(gateway) = self.gateway {
            write!(f, " via {gateway}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod masks {
        use super::*;

        #[test]
        fn prefix_len_of_common_masks() {
            assert_eq!(prefix_len(Ipv4Addr::new(255, 255, 255, 0)), Some(24));
            assert_eq!(prefix_len(Ipv4Addr::new(255, 255, 0, 0)), Some(16));
            assert_eq!(prefix_len(Ipv4Addr::new(255, 255, 255, 255)), Some(32));
            assert_eq!(prefix_len(Ipv4Addr::UNSPECIFIED), Some(0));
        }

        #[test]
        fn prefix_len_rejects_holes() {
            assert_eq!(prefix_len(Ipv4Addr::new(255, 0, 255, 0)), None);
            assert_eq!(prefix_len(Ipv4Addr::new(0, 0, 0, 255)), None);
        }

        #[test]
        fn mask_from_prefix_builds_masks() {
            assert_eq!(mask_from_prefix(24), Ipv4Addr::new(255, 255, 255, 0));
            assert_eq!(mask_from_prefix(20), Ipv4Addr::new(255, 255, 240, 0));
            assert_eq!(mask_from_prefix(0), Ipv4Addr::UNSPECIFIED);
            assert_eq!(mask_from_prefix(40), Ipv4Addr::BROADCAST);
        }
    }

    mod static_address {
        use super::*;

        #[test]
        fn parse_accepts_lab_address() {
            let target = StaticAddress::parse("10.156.145.25", "255.255.255.0").unwrap();

            assert_eq!(target.address(), Ipv4Addr::new(10, 156, 145, 25));
            assert_eq!(target.prefix_len(), 24);
            assert_eq!(target.network(), Ipv4Addr::new(10, 156, 145, 0));
            assert_eq!(target.gateway(), None);
            assert_eq!(target.to_string(), "10.156.145.25/24");
        }

        #[test]
        fn parse_rejects_malformed_input() {
            for value in ["10.156.145", "10.156.145.256", "abc", "", "10.156.145.25/24"] {
                let err = StaticAddress::parse(value, "255.255.255.0").unwrap_err();
                assert!(
                    matches!(err, AddressError::Malformed { .. }),
                    "{value}: {err:?}"
                );
            }
        }

        #[test]
        fn rejects_public_address() {
            let err = StaticAddress::parse("8.8.8.8", "255.255.255.0").unwrap_err();
            assert!(matches!(err, AddressError::NotPrivate { .. }));
        }

        #[test]
        fn rejects_non_contiguous_mask() {
            let err = StaticAddress::parse("10.0.0.5", "255.0.255.0").unwrap_err();
            assert!(matches!(err, AddressError::InvalidMask { .. }));
        }

        #[test]
        fn rejects_zero_mask() {
            let err = StaticAddress::parse("10.0.0.5", "0.0.0.0").unwrap_err();
            assert!(matches!(err, AddressError::InvalidMask { .. }));
        }

        #[test]
        fn rejects_network_and_broadcast() {
            let network = StaticAddress::parse("10.156.145.0", "255.255.255.0").unwrap_err();
            let broadcast = StaticAddress::parse("10.156.145.255", "255.255.255.0").unwrap_err();

            assert!(matches!(network, AddressError::NotHostAddress { prefix_len: 24, .. }));
            assert!(matches!(broadcast, AddressError::NotHostAddress { .. }));
        }

        #[test]
        fn gateway_must_be_in_subnet() {
            let target = StaticAddress::parse("10.156.145.25", "255.255.255.0").unwrap();

            let ok = target.with_gateway(Ipv4Addr::new(10, 156, 145, 1)).unwrap();
            assert_eq!(ok.gateway(), Some(Ipv4Addr::new(10, 156, 145, 1)));
            assert_eq!(ok.to_string(), "10.156.145.25/24 via 10.156.145.1");

            let err = target
                .with_gateway(Ipv4Addr::new(10, 156, 146, 1))
                .unwrap_err();
            assert!(err.to_string().contains("outside subnet 10.156.145.0/24"));
        }

        #[test]
        fn gateway_cannot_equal_address() {
            let target = StaticAddress::parse("192.168.1.10", "255.255.255.0").unwrap();
            assert!(target.with_gateway(Ipv4Addr::new(192, 168, 1, 10)).is_err());
        }
    }
}
