//! IP Configurator: DHCP/static switching for network adapters
//!
//! A library for enumerating network adapters and switching them between
//! DHCP and a static address derived from a grade and laptop number.

pub mod config;
pub mod identity;
pub mod network;
pub mod preferences;
pub mod session;
