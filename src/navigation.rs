//! View navigation backed by a session history stack.
//!
//! The active [`View`] is mirrored into a [`History`] adapter so that the
//! platform's back/forward controls restore the previous screen. The mapping
//! between a view and its history entry is kept in two pure functions,
//! [`history_entry`] and [`view_from_entry`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// One full-screen state of the storefront. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Landing,
    Shop,
    Checkout,
    Login,
    AdminDashboard,
    AdminInventory,
    AdminRevenue,
    About,
    Contact,
    Profile,
    CustomerOrders,
}

impl View {
    pub fn is_admin(self) -> bool { matches!(self, Self::AdminDashboard | Self::AdminInventory | Self::AdminRevenue) }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Landing => "landing",
            Self::Shop => "shop",
            Self::Checkout => "checkout",
            Self::Login => "login",
            Self::AdminDashboard => "admin_dashboard",
            Self::AdminInventory => "admin_inventory",
            Self::AdminRevenue => "admin_revenue",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Profile => "profile",
            Self::CustomerOrders => "customer_orders",
        };
        f.write_str(name)
    }
}

/// State object attached to a history entry. Entries the storefront did not
/// create (the page's initial entry) carry no view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub view: Option<View>,
}

pub fn history_entry(view: View) -> HistoryEntry { HistoryEntry { view: Some(view) } }

/// View to show for a restored entry; anything without a view means landing.
pub fn view_from_entry(entry: Option<&HistoryEntry>) -> View {
    entry.and_then(|e| e.view).unwrap_or(View::Landing)
}

/// Platform history facility.
pub trait History: Send {
    fn push_state(&mut self, entry: HistoryEntry);
    fn replace_state(&mut self, entry: HistoryEntry);
    /// Steps back one entry and returns its state, or `None` at the start.
    fn back(&mut self) -> Option<HistoryEntry>;
    /// Steps forward one entry and returns its state, or `None` at the end.
    fn forward(&mut self) -> Option<HistoryEntry>;
    fn scroll_to_top(&mut self) {}
}

/// In-process session history with browser semantics: pushing drops any
/// forward entries.
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    scroll_resets: u32,
}

impl Default for MemoryHistory {
    fn default() -> Self { Self { entries: vec![HistoryEntry::default()], cursor: 0, scroll_resets: 0 } }
}

impl MemoryHistory {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn current(&self) -> &HistoryEntry { &self.entries[self.cursor] }
    pub fn scroll_resets(&self) -> u32 { self.scroll_resets }
}

impl History for MemoryHistory {
    fn push_state(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    fn replace_state(&mut self, entry: HistoryEntry) { self.entries[self.cursor] = entry; }

    fn back(&mut self) -> Option<HistoryEntry> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.entries[self.cursor].clone())
    }

    fn forward(&mut self) -> Option<HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() { return None; }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    fn scroll_to_top(&mut self) { self.scroll_resets += 1; }
}

pub struct Navigator {
    current: View,
    history: Box<dyn History>,
}

impl Navigator {
    /// Takes over the current history entry for the landing view.
    pub fn new(history: impl History + 'static) -> Self {
        let mut history: Box<dyn History> = Box::new(history);
        history.replace_state(history_entry(View::Landing));
        Self { current: View::Landing, history }
    }

    pub fn current(&self) -> View { self.current }

    /// Pushes a history entry and activates `view`. Returns `false` when `view`
    /// is already active, in which case nothing is pushed.
    pub fn navigate_to(&mut self, view: View) -> bool {
        if view == self.current { return false; }
        debug!(from = %self.current, to = %view, "navigate");
        self.history.push_state(history_entry(view));
        self.current = view;
        self.history.scroll_to_top();
        true
    }

    /// Applies a platform back/forward event.
    pub fn on_pop_state(&mut self, state: Option<&HistoryEntry>) -> View {
        self.current = view_from_entry(state);
        debug!(view = %self.current, "history restored");
        self.current
    }

    pub fn back(&mut self) -> Option<View> {
        let state = self.history.back()?;
        Some(self.on_pop_state(Some(&state)))
    }

    pub fn forward(&mut self) -> Option<View> {
        let state = self.history.forward()?;
        Some(self.on_pop_state(Some(&state)))
    }
}

impl Default for Navigator {
    fn default() -> Self { Self::new(MemoryHistory::new()) }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator").field("current", &self.current).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_entry_mapping() {
        assert_eq!(view_from_entry(Some(&history_entry(View::Shop))), View::Shop);
        assert_eq!(view_from_entry(Some(&HistoryEntry::default())), View::Landing);
        assert_eq!(view_from_entry(None), View::Landing);
        let json = serde_json::to_string(&history_entry(View::AdminRevenue)).unwrap();
        assert_eq!(json, r#"{"view":"admin_revenue"}"#);
        let parsed: HistoryEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.view, None);
    }

    #[test]
    fn test_back_and_forward() {
        let mut nav = Navigator::default();
        assert!(nav.navigate_to(View::Shop));
        assert!(nav.navigate_to(View::Checkout));
        assert_eq!(nav.back(), Some(View::Shop));
        assert_eq!(nav.back(), Some(View::Landing));
        assert_eq!(nav.back(), None);
        assert_eq!(nav.current(), View::Landing);
        assert_eq!(nav.forward(), Some(View::Shop));
    }

    #[test]
    fn test_same_view_is_not_pushed() {
        let mut history = MemoryHistory::new();
        history.push_state(history_entry(View::About));
        let mut nav = Navigator::new(history);
        assert!(!nav.navigate_to(View::Landing));
        assert!(nav.navigate_to(View::Contact));
        assert!(!nav.navigate_to(View::Contact));
        assert_eq!(nav.back(), Some(View::Landing));
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = MemoryHistory::new();
        history.push_state(history_entry(View::Shop));
        history.push_state(history_entry(View::Checkout));
        history.back();
        history.push_state(history_entry(View::Profile));
        assert_eq!(history.len(), 3);
        assert_eq!(history.forward(), None);
        assert_eq!(history.current().view, Some(View::Profile));
    }

    /// Shares its stack with the test so it stays readable after the
    /// navigator takes ownership.
    #[derive(Clone, Default)]
    struct SharedHistory {
        inner: Arc<Mutex<MemoryHistory>>,
    }

    impl History for SharedHistory {
        fn push_state(&mut self, entry: HistoryEntry) { self.inner.lock().unwrap().push_state(entry) }
        fn replace_state(&mut self, entry: HistoryEntry) { self.inner.lock().unwrap().replace_state(entry) }
        fn back(&mut self) -> Option<HistoryEntry> { self.inner.lock().unwrap().back() }
        fn forward(&mut self) -> Option<HistoryEntry> { self.inner.lock().unwrap().forward() }
        fn scroll_to_top(&mut self) { self.inner.lock().unwrap().scroll_to_top() }
    }

    #[test]
    fn test_scroll_reset_only_on_push() {
        let history = SharedHistory::default();
        let mut nav = Navigator::new(history.clone());
        nav.navigate_to(View::Shop);
        nav.navigate_to(View::Shop);
        nav.back();
        assert_eq!(history.inner.lock().unwrap().scroll_resets(), 1);
    }

    #[test]
    fn test_initial_entry_replaced_with_landing() {
        let history = SharedHistory::default();
        history.inner.lock().unwrap().replace_state(history_entry(View::About));
        let nav = Navigator::new(history.clone());
        assert_eq!(nav.current(), View::Landing);
        let inner = history.inner.lock().unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.current().view, Some(View::Landing));
    }
}
