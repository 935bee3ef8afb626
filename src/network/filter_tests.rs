//! Tests for the listing filter.

use regex::Regex;

use super::filter::ListFilter;
use super::{AdapterId, AdapterKind, AdapterMode, NetworkAdapter};

fn adapter(id: &str, name: &str, kind: AdapterKind) -> NetworkAdapter {
    NetworkAdapter::new(AdapterId::new(id), name, kind, AdapterMode::Dynamic)
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources.iter().map(|s| Regex::new(s).unwrap()).collect()
}

/// A typical lab laptop, in enumeration order.
fn laptop() -> Vec<NetworkAdapter> {
    vec![
        adapter("1", "Loopback Pseudo-Interface 1", AdapterKind::Loopback),
        adapter("12", "Wi-Fi", AdapterKind::Wireless),
        adapter("40", "Docker Network Adapter", AdapterKind::Virtual),
        adapter("11", "Ethernet", AdapterKind::Ethernet),
        adapter("31", "vEthernet (WSL)", AdapterKind::Virtual),
    ]
}

fn shown(filter: &ListFilter) -> Vec<String> {
    filter
        .visible(&laptop())
        .map(|a| a.name.clone())
        .collect()
}

mod kinds {
    use super::*;

    #[test]
    fn default_hides_only_loopback() {
        assert_eq!(
            shown(&ListFilter::new()),
            [
                "Wi-Fi",
                "Docker Network Adapter",
                "Ethernet",
                "vEthernet (WSL)"
            ]
        );
    }

    #[test]
    fn loopback_can_be_shown() {
        let filter = ListFilter::new().show_loopback(true);
        assert_eq!(shown(&filter).len(), 5);
    }

    #[test]
    fn virtual_can_be_hidden() {
        let filter = ListFilter::new().hide_virtual(true);
        assert_eq!(shown(&filter), ["Wi-Fi", "Ethernet"]);
    }

    #[test]
    fn other_kinds_are_never_hidden_by_kind() {
        let filter = ListFilter::new().hide_virtual(true);
        assert!(filter.shows(&adapter("7", "wwan0", AdapterKind::Other(243))));
    }
}

mod names {
    use super::*;

    #[test]
    fn only_patterns_use_any_match() {
        let filter = ListFilter::new().only_names(patterns(&["^Eth", "^Wi"]));
        assert_eq!(shown(&filter), ["Wi-Fi", "Ethernet"]);
    }

    #[test]
    fn hide_patterns_win_over_only_patterns() {
        let filter = ListFilter::new()
            .only_names(patterns(&["Ethernet"]))
            .hide_names(patterns(&["^vEth"]));
        assert_eq!(shown(&filter), ["Ethernet"]);
    }

    #[test]
    fn only_patterns_do_not_reveal_loopback() {
        let filter = ListFilter::new().only_names(patterns(&["Loopback"]));
        assert!(shown(&filter).is_empty());
    }

    #[test]
    fn empty_pattern_lists_restrict_nothing() {
        let filter = ListFilter::new().only_names(Vec::new()).hide_names(Vec::new());
        assert_eq!(shown(&filter).len(), 4);
    }

    #[test]
    fn case_insensitive_flag_is_honoured() {
        let filter = ListFilter::new().hide_names(patterns(&["(?i)docker"]));
        assert!(!shown(&filter).iter().any(|n| n.starts_with("Docker")));
    }
}

#[test]
fn display_summarizes_rules() {
    let filter = ListFilter::new()
        .hide_virtual(true)
        .hide_names(patterns(&["^Docker"]));

    assert_eq!(
        filter.to_string(),
        "loopback hidden, virtual hidden, 0 only / 1 hide pattern(s)"
    );
}
