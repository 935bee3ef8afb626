//! Windows configurator driven through `netsh interface ipv4`.
//!
//! Adapters are addressed by interface index, which `netsh` accepts in
//! place of the friendly name and which never needs quoting.

use super::runner::{SystemRunner, ToolOutput, ToolRunner};
use crate::network::{AdapterConfigurator, ConfigureError, NetworkAdapter, StaticAddress};

const NETSH: &str = "netsh";

/// Reply when switching an adapter that already uses DHCP.
const ALREADY_DHCP: &str = "dhcp is already enabled";

/// Configurator that applies changes with `netsh`.
#[derive(Debug, Clone, Default)]
pub struct NetshConfigurator<R = SystemRunner> {
    runner: R,
}

impl NetshConfigurator {
    /// Creates a configurator that runs the system `netsh`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl<R: ToolRunner> NetshConfigurator<R> {
    /// Creates a configurator using a custom tool runner.
    #[must_use]
    pub const fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn execute(&self, adapter: &NetworkAdapter, args: &[String]) -> Result<(), ConfigureError> {
        let output = self
            .runner
            .run(NETSH, args)
            .map_err(|source| ConfigureError::Launch {
                program: NETSH.to_string(),
                source,
            })?;

        if output.success || is_already_dhcp(&output) {
            Ok(())
        } else {
            Err(classify_failure(&adapter.name, &output))
        }
    }
}

impl<R: ToolRunner> AdapterConfigurator for NetshConfigurator<R> {
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
        self.execute(adapter, &dhcp_address_args(adapter))?;
        self.execute(adapter, &dhcp_dns_args(adapter))
    }

    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        target: &StaticAddress,
    ) -> Result<(), ConfigureError> {
        self.execute(adapter, &static_address_args(adapter, target))
    }
}

fn ipv4_set(object: &str, adapter: &NetworkAdapter) -> Vec<String> {
    vec![
        "interface".to_string(),
        "ipv4".to_string(),
        "set".to_string(),
        object.to_string(),
        format!("name={}", adapter.id),
    ]
}

fn dhcp_address_args(adapter: &NetworkAdapter) -> Vec<String> {
    let mut args = ipv4_set("address", adapter);
    args.push("source=dhcp".to_string());
    args
}

fn dhcp_dns_args(adapter: &NetworkAdapter) -> Vec<String> {
    let mut args = ipv4_set("dnsservers", adapter);
    args.push("source=dhcp".to_string());
    args
}

fn static_address_args(adapter: &NetworkAdapter, target: &StaticAddress) -> Vec<String> {
    let gateway = target
        .gateway()
        .map_or_else(|| "none".to_string(), |g| g.to_string());

    let mut args = ipv4_set("address", adapter);
    args.extend([
        "source=static".to_string(),
        format!("address={}", target.address()),
        format!("mask={}", target.mask()),
        format!("gateway={gateway}"),
    ]);
    args
}

fn is_already_dhcp(output: &ToolOutput) -> bool {
    output.message().to_lowercase().contains(ALREADY_DHCP)
}

/// Maps a failed `netsh` invocation to a typed error.
fn classify_failure(adapter: &str, output: &ToolOutput) -> ConfigureError {
    let message = output.message().to_string();
    let lower = message.to_lowercase();

    if lower.contains("requires elevation") || lower.contains("access is denied") {
        ConfigureError::PermissionDenied {
            adapter: adapter.to_string(),
        }
    } else if lower.contains("element not found")
        || lower.contains("no such interface")
        || lower.contains("syntax is incorrect")
        || lower.contains("not present")
    {
        ConfigureError::AdapterUnavailable {
            adapter: adapter.to_string(),
            reason: message,
        }
    } else {
        ConfigureError::Rejected {
            adapter: adapter.to_string(),
            message,
        }
    }
}
