//! Which adapters the `list` command shows.
//!
//! Selecting an adapter by id or name ignores this and always searches the
//! full enumeration.

use std::fmt;

use regex::Regex;

use super::{AdapterKind, NetworkAdapter};

/// Visibility rules for the adapter listing.
///
/// An adapter is shown when:
/// - it is not loopback, unless loopback is shown explicitly
/// - it is not virtual, when virtual adapters are hidden
/// - its name matches none of the `hide` patterns
/// - its name matches one of the `only` patterns, if any are set
///
/// # Examples
///
/// ```
/// use ip_configurator::network::filter::ListFilter;
/// use ip_configurator::network::{AdapterId, AdapterKind, AdapterMode, NetworkAdapter};
///
/// let filter = ListFilter::new();
///
/// let eth = NetworkAdapter::new(AdapterId::new("1"), "eth0", AdapterKind::Ethernet, AdapterMode::Dynamic);
/// let lo = NetworkAdapter::new(AdapterId::new("2"), "lo", AdapterKind::Loopback, AdapterMode::Static);
///
/// assert!(filter.shows(&eth));
/// assert!(!filter.shows(&lo));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    show_loopback: bool,
    hide_virtual: bool,
    only: Vec<Regex>,
    hide: Vec<Regex>,
}

impl ListFilter {
    /// Creates the default listing filter: everything except loopback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows or hides loopback adapters.
    #[must_use]
    pub const fn show_loopback(mut self, show: bool) -> Self {
        self.show_loopback = show;
        self
    }

    /// Hides or shows virtual adapters (tunnels, PPP, bridges).
    #[must_use]
    pub const fn hide_virtual(mut self, hide: bool) -> Self {
        self.hide_virtual = hide;
        self
    }

    /// Restricts the listing to names matching any of `patterns`.
    ///
    /// An empty list removes the restriction.
    #[must_use]
    pub fn only_names(mut self, patterns: Vec<Regex>) -> Self {
        self.only = patterns;
        self
    }

    /// Hides adapters whose name matches any of `patterns`.
    #[must_use]
    pub fn hide_names(mut self, patterns: Vec<Regex>) -> Self {
        self.hide = patterns;
        self
    }

    /// Returns true if `adapter` belongs in the listing.
    #[must_use]
    pub fn shows(&self, adapter: &NetworkAdapter) -> bool {
        match adapter.kind {
            AdapterKind::Loopback if !self.show_loopback => return false,
            AdapterKind::Virtual if self.hide_virtual => return false,
            _ => {}
        }

        let name = adapter.name.as_str();
        if self.hide.iter().any(|re| re.is_match(name)) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|re| re.is_match(name))
    }

    /// Keeps the adapters this filter shows, in enumeration order.
    pub fn visible<'a>(
        &'a self,
        adapters: &'a [NetworkAdapter],
    ) -> impl Iterator<Item = &'a NetworkAdapter> + 'a {
        adapters.iter().filter(|adapter| self.shows(adapter))
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = |yes: bool| if yes { "shown" } else { "hidden" };
        write!(
            f,
            "loopback {}, virtual {}, {} only / {} hide pattern(s)",
            shown(self.show_loopback),
            shown(!self.hide_virtual),
            self.only.len(),
            self.hide.len()
        )
    }
}
