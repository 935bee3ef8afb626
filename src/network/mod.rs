//! Network layer: adapter snapshots, enumeration and configuration.
//!
//! This module provides types and traits for:
//! - Representing network adapter snapshots ([`NetworkAdapter`])
//! - Validated static targets ([`StaticAddress`])
//! - Enumerating adapters ([`AdapterDirectory`])
//! - Changing adapter addressing ([`AdapterConfigurator`])
//! - Filtering adapter listings ([`filter`])
//! - Platform-specific implementations ([`platform`])

mod adapter;
pub mod address;
mod configurator;
mod directory;
pub mod filter;
pub mod platform;

#[cfg(test)]
mod filter_tests;

pub use adapter::{AdapterId, AdapterInfo, AdapterKind, AdapterMode, NetworkAdapter, info_key};
pub use address::{AddressError, StaticAddress};
pub use configurator::{AdapterConfigurator, ConfigureError, DryRunConfigurator};
pub use directory::{AdapterDirectory, QueryError};
