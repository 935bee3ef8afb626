//! Tests for network, mask and gateway validation.

use std::net::Ipv4Addr;

use crate::config::field;

use super::*;

mod network {
    use super::*;

    #[test]
    fn defaults_to_lab_network() {
        let config = ValidatedConfig::from_raw(&cli(&["derive"]), None).unwrap();

        assert_eq!(config.network, Ipv4Addr::new(10, 156, 145, 0));
    }

    #[test]
    fn accepts_network_from_toml() {
        let toml = toml("[address]\nnetwork = \"192.168.7.0\"");
        let config = ValidatedConfig::from_raw(&cli(&["derive"]), Some(&toml)).unwrap();

        assert_eq!(config.network, Ipv4Addr::new(192, 168, 7, 0));
    }

    #[test]
    fn rejects_host_bits() {
        let toml = toml("[address]\nnetwork = \"192.168.7.1\"");
        let result = ValidatedConfig::from_raw(&cli(&["derive"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidNetwork { .. })));
    }

    #[test]
    fn rejects_non_address() {
        let toml = toml("[address]\nnetwork = \"10.156.145\"");
        let result = ValidatedConfig::from_raw(&cli(&["derive"]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidAddress {
                field: field::NETWORK,
                ..
            })
        ));
    }
}

mod mask {
    use super::*;

    #[test]
    fn defaults_to_slash_24() {
        let config = ValidatedConfig::from_raw(&cli(&["list"]), None).unwrap();

        assert_eq!(config.mask, Ipv4Addr::new(255, 255, 255, 0));
    }

    #[test]
    fn accepts_shorter_prefix() {
        let config =
            ValidatedConfig::from_raw(&cli(&["static", "eth0", "--mask", "255.255.0.0"]), None)
                .unwrap();

        assert_eq!(config.mask, Ipv4Addr::new(255, 255, 0, 0));
    }

    #[test]
    fn rejects_non_contiguous_mask() {
        let result =
            ValidatedConfig::from_raw(&cli(&["static", "eth0", "--mask", "255.0.255.0"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidMask { .. })));
    }

    #[test]
    fn rejects_prefix_longer_than_24() {
        let toml = toml("[address]\nmask = \"255.255.255.128\"");
        let result = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml));

        let error = result.unwrap_err();
        assert!(matches!(error, ConfigError::InvalidMask { .. }));
        assert!(error.to_string().contains("/25"));
    }

    #[test]
    fn rejects_empty_mask() {
        let toml = toml("[address]\nmask = \"0.0.0.0\"");
        let result = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidMask { .. })));
    }
}

mod gateway {
    use super::*;

    #[test]
    fn defaults_to_none() {
        let config = ValidatedConfig::from_raw(&cli(&["static", "eth0"]), None).unwrap();

        assert!(config.gateway.is_none());
    }

    #[test]
    fn parses_gateway() {
        let config = ValidatedConfig::from_raw(
            &cli(&["static", "eth0", "--gateway", "10.156.145.1"]),
            None,
        )
        .unwrap();

        assert_eq!(config.gateway, Some(Ipv4Addr::new(10, 156, 145, 1)));
    }

    #[test]
    fn rejects_malformed_gateway() {
        let toml = toml("[address]\ngateway = \"router\"");
        let error = ValidatedConfig::from_raw(&cli(&["list"]), Some(&toml)).unwrap_err();

        assert!(matches!(
            error,
            ConfigError::InvalidAddress {
                field: field::GATEWAY,
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "Invalid gateway 'router': expected a dotted-quad IPv4 address"
        );
    }
}

mod explicit_address {
    use super::*;

    #[test]
    fn parsed_into_action() {
        let config =
            ValidatedConfig::from_raw(&cli(&["static", "eth0", "--address", "10.0.0.7"]), None)
                .unwrap();

        assert_eq!(
            config.action,
            Action::Static {
                adapter: "eth0".to_string(),
                grade: None,
                number: None,
                address: Some(Ipv4Addr::new(10, 0, 0, 7)),
            }
        );
    }

    #[test]
    fn malformed_address_is_rejected() {
        let result =
            ValidatedConfig::from_raw(&cli(&["static", "eth0", "--address", "10.0.0.300"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidAddress {
                field: field::ADDRESS,
                ..
            })
        ));
    }
}
