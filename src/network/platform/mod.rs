//! Platform-specific adapter directory and configurator implementations.
//!
//! # Platform Support
//!
//! - **Windows**: enumeration via `GetAdaptersAddresses` (the `windows`
//!   crate), configuration via `netsh interface ipv4`.
//! - **Linux**: enumeration and configuration via NetworkManager's `nmcli`.
//! - **Other targets**: [`UnsupportedPlatform`], which fails every call.
//!
//! The tool-driven backends are compiled on every target so their parsing
//! and error mapping can be tested anywhere; only the aliases below are
//! platform-gated.

mod netsh;
mod nmcli;
pub mod runner;
mod unsupported;

#[cfg(windows)]
mod windows;

pub use netsh::NetshConfigurator;
pub use nmcli::Nmcli;
pub use runner::{SystemRunner, ToolOutput, ToolRunner};
pub use unsupported::UnsupportedPlatform;

#[cfg(windows)]
pub use windows::WindowsDirectory;

/// Adapter directory for the current platform.
#[cfg(windows)]
pub type PlatformDirectory = WindowsDirectory;

/// Adapter configurator for the current platform.
#[cfg(windows)]
pub type PlatformConfigurator = NetshConfigurator;

/// Adapter directory for the current platform.
#[cfg(target_os = "linux")]
pub type PlatformDirectory = Nmcli;

/// Adapter configurator for the current platform.
#[cfg(target_os = "linux")]
pub type PlatformConfigurator = Nmcli;

/// Adapter directory for the current platform.
#[cfg(not(any(windows, target_os = "linux")))]
pub type PlatformDirectory = UnsupportedPlatform;

/// Adapter configurator for the current platform.
#[cfg(not(any(windows, target_os = "linux")))]
pub type PlatformConfigurator = UnsupportedPlatform;
