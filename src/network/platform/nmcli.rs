//! NetworkManager backend driven through `nmcli` terse output.
//!
//! Enumeration uses `nmcli device show` for live addresses and
//! `nmcli connection show` for each profile's `ipv4.method`. Configuration
//! modifies the device's active profile and re-activates it.
//!
//! Profiles are always addressed by UUID; profile names need not be unique.

use std::net::Ipv4Addr;

use super::runner::{SystemRunner, ToolOutput, ToolRunner};
use crate::network::address::mask_from_prefix;
use crate::network::{
    AdapterConfigurator, AdapterDirectory, AdapterId, AdapterKind, AdapterMode, ConfigureError,
    NetworkAdapter, QueryError, StaticAddress,
};

const NMCLI: &str = "nmcli";

/// Fields requested from `nmcli device show`.
const DEVICE_FIELDS: &str = "GENERAL.DEVICE,GENERAL.TYPE,GENERAL.HWADDR,GENERAL.CON-UUID,\
                             IP4.ADDRESS,IP4.GATEWAY,IP4.DNS,DHCP4.OPTION";

/// `nmcli` exit code for "connection, device, or access point does not exist".
const EXIT_NOT_FOUND: i32 = 10;

/// `ipv4.method` value meaning DHCP.
const METHOD_AUTO: &str = "auto";

/// Adapter directory and configurator backed by NetworkManager.
#[derive(Debug, Clone, Default)]
pub struct Nmcli<R = SystemRunner> {
    runner: R,
}

impl Nmcli {
    /// Creates a backend that runs the system `nmcli`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl<R: ToolRunner> Nmcli<R> {
    /// Creates a backend using a custom tool runner.
    #[must_use]
    pub const fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn query(&self, args: &[&str]) -> Result<String, QueryError> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let output = self
            .runner
            .run(NMCLI, &args)
            .map_err(|e| QueryError::Tool {
                program: NMCLI.to_string(),
                message: e.to_string(),
            })?;

        if output.success {
            Ok(output.stdout)
        } else {
            Err(QueryError::Tool {
                program: NMCLI.to_string(),
                message: output.message().to_string(),
            })
        }
    }

    fn profile_mode(&self, uuid: &str) -> Result<AdapterMode, QueryError> {
        let method = self.query(&["-g", "ipv4.method", "connection", "show", "uuid", uuid])?;
        Ok(mode_from_method(method.trim()))
    }

    fn active_profile(&self, adapter: &NetworkAdapter) -> Result<String, ConfigureError> {
        let args = [
            "-g".to_string(),
            "GENERAL.CON-UUID".to_string(),
            "device".to_string(),
            "show".to_string(),
            adapter.id.to_string(),
        ];
        let output = self.execute(adapter, &args)?;
        let profile = unescape(output.stdout.trim());

        if profile.is_empty() || profile == "--" {
            return Err(ConfigureError::AdapterUnavailable {
                adapter: adapter.name.clone(),
                reason: "no active NetworkManager connection profile".to_string(),
            });
        }
        Ok(profile)
    }

    fn execute(
        &self,
        adapter: &NetworkAdapter,
        args: &[String],
    ) -> Result<ToolOutput, ConfigureError> {
        let output = self
            .runner
            .run(NMCLI, args)
            .map_err(|source| ConfigureError::Launch {
                program: NMCLI.to_string(),
                source,
            })?;

        if output.success {
            Ok(output)
        } else {
            Err(classify_failure(&adapter.name, &output))
        }
    }

    fn reconfigure(
        &self,
        adapter: &NetworkAdapter,
        settings: &[(&str, String)],
    ) -> Result<(), ConfigureError> {
        let profile = self.active_profile(adapter)?;
        self.execute(adapter, &modify_args(&profile, settings))?;
        self.execute(adapter, &activate_args(&profile, adapter.id.as_str()))?;
        Ok(())
    }
}

impl<R: ToolRunner> AdapterDirectory for Nmcli<R> {
    fn list_adapters(&self) -> Result<Vec<NetworkAdapter>, QueryError> {
        let output = self.query(&["-t", "-f", DEVICE_FIELDS, "device", "show"])?;
        let records = parse_device_show(&output).map_err(|message| QueryError::Parse {
            program: NMCLI.to_string(),
            message,
        })?;

        let mut adapters = Vec::with_capacity(records.len());
        for record in records {
            let mode = match record.profile.as_deref() {
                Some(profile) => self.profile_mode(profile)?,
                None => AdapterMode::Static,
            };
            adapters.push(record.into_adapter(mode));
        }

        tracing::debug!("Enumerated {} adapters via nmcli", adapters.len());
        Ok(adapters)
    }
}

impl<R: ToolRunner> AdapterConfigurator for Nmcli<R> {
    fn set_dynamic(&self, adapter: &NetworkAdapter) -> Result<(), ConfigureError> {
        self.reconfigure(adapter, &dynamic_settings())
    }

    fn set_static(
        &self,
        adapter: &NetworkAdapter,
        target: &StaticAddress,
    ) -> Result<(), ConfigureError> {
        self.reconfigure(adapter, &static_settings(target))
    }
}

/// Profile settings that hand address, gateway and DNS back to DHCP.
fn dynamic_settings() -> Vec<(&'static str, String)> {
    vec![
        ("ipv4.method", METHOD_AUTO.to_string()),
        ("ipv4.addresses", String::new()),
        ("ipv4.gateway", String::new()),
        ("ipv4.dns", String::new()),
    ]
}

/// Profile settings for a static assignment. DNS settings are left alone.
fn static_settings(target: &StaticAddress) -> Vec<(&'static str, String)> {
    vec![
        ("ipv4.method", "manual".to_string()),
        (
            "ipv4.addresses",
            format!("{}/{}", target.address(), target.prefix_len()),
        ),
        (
            "ipv4.gateway",
            target.gateway().map(|g| g.to_string()).unwrap_or_default(),
        ),
    ]
}

fn modify_args(profile: &str, settings: &[(&str, String)]) -> Vec<String> {
    let mut args = vec![
        "connection".to_string(),
        "modify".to_string(),
        "uuid".to_string(),
        profile.to_string(),
    ];
    for (key, value) in settings {
        args.push((*key).to_string());
        args.push(value.clone());
    }
    args
}

fn activate_args(profile: &str, device: &str) -> Vec<String> {
    ["connection", "up", "uuid", profile, "ifname", device]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Maps a failed `nmcli` invocation to a typed error.
fn classify_failure(adapter: &str, output: &ToolOutput) -> ConfigureError {
    let message = output.message().to_string();
    let lower = message.to_lowercase();

    if lower.contains("insufficient privileges") || lower.contains("not authorized") {
        ConfigureError::PermissionDenied {
            adapter: adapter.to_string(),
        }
    } else if output.code == Some(EXIT_NOT_FOUND)
        || lower.contains("not found")
        || lower.contains("unmanaged")
        || lower.contains("not available")
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

fn mode_from_method(method: &str) -> AdapterMode {
    if method == METHOD_AUTO {
        AdapterMode::Dynamic
    } else {
        AdapterMode::Static
    }
}

/// One device block from `nmcli -t device show`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct DeviceRecord {
    device: String,
    kind: String,
    hwaddr: Option<String>,
    /// UUID of the active connection profile.
    profile: Option<String>,
    address: Option<(Ipv4Addr, u8)>,
    gateway: Option<Ipv4Addr>,
    dns: Vec<Ipv4Addr>,
    dhcp_server: Option<Ipv4Addr>,
}

impl DeviceRecord {
    fn into_adapter(self, mode: AdapterMode) -> NetworkAdapter {
        let mut adapter = NetworkAdapter::new(
            AdapterId::new(self.device.clone()),
            self.device,
            map_device_type(&self.kind),
            mode,
        )
        .with_dns_servers(self.dns);

        if let Some((ip, prefix)) = self.address {
            adapter = adapter.with_address(ip, mask_from_prefix(prefix));
        }
        if let Some(gateway) = self.gateway {
            adapter = adapter.with_gateway(gateway);
        }
        adapter.mac = self.hwaddr.map(|mac| mac.replace(':', "-"));
        adapter.dhcp_server = self.dhcp_server;
        adapter
    }

    fn apply(&mut self, key: &str, value: String) -> Result<(), String> {
        // Multi-valued fields carry an index suffix: IP4.ADDRESS[1]
        let field = key.split_once('[').map_or(key, |(field, _)| field);

        match field {
            "GENERAL.TYPE" => self.kind = value,
            "GENERAL.HWADDR" => self.hwaddr = Some(value),
            "GENERAL.CON-UUID" => self.profile = Some(value),
            "IP4.ADDRESS" if self.address.is_none() => {
                self.address = Some(parse_cidr(&value)?);
            }
            "IP4.GATEWAY" => self.gateway = Some(parse_ip(&value)?),
            "IP4.DNS" => self.dns.push(parse_ip(&value)?),
            "DHCP4.OPTION" => {
                if let Some(server) = value
                    .strip_prefix("dhcp_server_identifier")
                    .and_then(|rest| rest.trim_start().strip_prefix('='))
                {
                    self.dhcp_server = Some(parse_ip(server.trim())?);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parses `nmcli -t device show` output into one record per device.
fn parse_device_show(output: &str) -> Result<Vec<DeviceRecord>, String> {
    let mut records = Vec::new();
    let mut current: Option<DeviceRecord> = None;

    for line in output.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        let (key, raw) = line
            .split_once(':')
            .ok_or_else(|| format!("line without a field name: '{line}'"))?;
        let value = unescape(raw);

        if key == "GENERAL.DEVICE" {
            records.extend(current.take());
            current = Some(DeviceRecord {
                device: value,
                ..DeviceRecord::default()
            });
            continue;
        }

        // Empty values are printed as "" or "--" depending on the version
        if value.is_empty() || value == "--" {
            continue;
        }

        let record = current
            .as_mut()
            .ok_or_else(|| format!("field '{key}' before GENERAL.DEVICE"))?;
        record.apply(key, value)?;
    }

    records.extend(current);
    Ok(records)
}

/// Undoes terse-mode escaping of `:` and `\`.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_ip(value: &str) -> Result<Ipv4Addr, String> {
    value
        .parse()
        .map_err(|_| format!("invalid IPv4 address '{value}'"))
}

fn parse_cidr(value: &str) -> Result<(Ipv4Addr, u8), String> {
    let (ip, prefix) = value
        .split_once('/')
        .ok_or_else(|| format!("address without prefix '{value}'"))?;
    let prefix: u8 = prefix
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| format!("invalid prefix in '{value}'"))?;
    Ok((parse_ip(ip)?, prefix))
}

/// Maps NetworkManager device types to [`AdapterKind`].
fn map_device_type(kind: &str) -> AdapterKind {
    match kind {
        "ethernet" => AdapterKind::Ethernet,
        "wifi" => AdapterKind::Wireless,
        "loopback" => AdapterKind::Loopback,
        "bridge" | "bond" | "team" | "tun" | "veth" | "vlan" | "vxlan" | "macvlan" | "dummy"
        | "wireguard" | "ip-tunnel" => AdapterKind::Virtual,
        // nmcli reports no numeric type code
        _ => AdapterKind::Other(0),
    }
}

#[cfg(test)]
#[path = "nmcli_tests.rs"]
mod tests;
