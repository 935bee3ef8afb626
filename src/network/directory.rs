//! Adapter enumeration trait and error types.

use super::{AdapterInfo, NetworkAdapter};
use thiserror::Error;

/// Error type for adapter enumeration.
///
/// Describes what went wrong without dictating recovery strategy.
/// Callers decide how to handle each error variant.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// External query tool could not be run or exited with an error.
    #[error("'{program}' failed: {message}")]
    Tool {
        /// Program that was invoked.
        program: String,
        /// Captured error output or launch failure.
        message: String,
    },

    /// Query output could not be understood.
    #[error("Unexpected output from '{program}': {message}")]
    Parse {
        /// Program whose output was rejected.
        program: String,
        /// What was wrong with it.
        message: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Read-only view of the host's network adapters.
///
/// # Design
///
/// - Implementations query the OS on every call; nothing is cached here
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations provided in [`super::platform`]
pub trait AdapterDirectory {
    /// Enumerates all adapters visible to the OS.
    ///
    /// An empty list is a valid result (no interfaces present).
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the OS query fails.
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError>;

    /// Returns true if the snapshot reports DHCP addressing.
    fn is_dynamic(&self, adapter: &NetworkAdapter) -> bool {
        adapter.is_dynamic()
    }

    /// Returns the descriptive key/value pairs for a snapshot.
    fn info(&self, adapter: &NetworkAdapter) -> AdapterInfo {
        adapter.info()
    }
}

impl<T: AdapterDirectory + ?Sized> AdapterDirectory for &T {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
        (**self).list_adapters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{AdapterId, AdapterKind, AdapterMode};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// A directory returning predefined results, one per call.
    struct ScriptedDirectory {
        results: RefCell<VecDeque<Result<Vec<NetworkAdapter>, QueryError>>>,
    }

    impl ScriptedDirectory {
        fn new(results: Vec<Result<Vec<NetworkAdapter>, QueryError>>) -> Self {
            Self {
                results: RefCell::new(results.into()),
            }
        }
    }

    impl AdapterDirectory for ScriptedDirectory {
        fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }
    }

    fn adapter(id: &str, name: &str, mode: AdapterMode) -> NetworkAdapter {
        NetworkAdapter::new(AdapterId::new(id), name, AdapterKind::Ethernet, mode)
    }

    #[test]
    fn empty_enumeration_is_not_an_error() {
        let directory = ScriptedDirectory::new(vec![Ok(vec![])]);
        assert!(directory.list_adapters().unwrap().is_empty());
    }

    #[test]
    fn is_dynamic_and_info_read_the_snapshot() {
        let directory = ScriptedDirectory::new(vec![]);
        let dynamic = adapter("1", "eth0", AdapterMode::Dynamic);
        let fixed = adapter("2", "eth1", AdapterMode::Static);

        assert!(directory.is_dynamic(&dynamic));
        assert!(!directory.is_dynamic(&fixed));
        assert_eq!(directory.info(&fixed).get("Mode"), Some("Static"));
    }

    #[test]
    fn tool_error_displays_program() {
        let error = QueryError::Tool {
            program: "nmcli".to_string(),
            message: "NetworkManager is not running".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "'nmcli' failed: NetworkManager is not running"
        );
    }
}
