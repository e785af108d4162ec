//! Ordered registry of open editor tabs.

use relay_domain::generate_id;

/// One open editor tab.
///
/// `tab_id` is generated at open time and stable for the tab's lifetime.
/// `request_id` is `None` for a never-saved draft. `is_dirty` is the
/// externally visible projection of the tab's edit state, maintained by the
/// workbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Stable identity for the tab's lifetime.
    pub tab_id: String,
    /// The saved request this tab edits, if any.
    pub request_id: Option<String>,
    /// Whether the tab's fields differ from their saved (or blank) baseline.
    pub is_dirty: bool,
}

/// Ordered list of open tabs plus the active-tab id.
///
/// The registry is a pure ordered-list manager: `open_tab` always creates a
/// tab. The one-tab-per-request check lives in the workbench, which looks
/// up existing tabs before asking for a new one.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active_id: Option<String>,
}

impl TabRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All open tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Number of open tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if no tabs are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// The active tab, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Tab> {
        self.active_id
            .as_deref()
            .and_then(|tab_id| self.get(tab_id))
    }

    /// The active tab's id, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Looks up a tab by id.
    #[must_use]
    pub fn get(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.tab_id == tab_id)
    }

    /// Returns true if a tab with this id is open.
    #[must_use]
    pub fn contains(&self, tab_id: &str) -> bool {
        self.get(tab_id).is_some()
    }

    /// Finds the tab bound to a saved request, if one is open.
    #[must_use]
    pub fn find_by_request(&self, request_id: &str) -> Option<&Tab> {
        self.tabs
            .iter()
            .find(|tab| tab.request_id.as_deref() == Some(request_id))
    }

    /// Appends a new tab and returns a copy of it. Does not activate it.
    pub fn open_tab(&mut self, request_id: Option<&str>) -> Tab {
        let tab = Tab {
            tab_id: generate_id(),
            request_id: request_id.map(ToString::to_string),
            is_dirty: false,
        };
        self.tabs.push(tab.clone());
        tab
    }

    /// Removes a tab. If it was active, activation moves to the adjacent
    /// tab, preferring the next one, else the previous, else none. Returns
    /// the active tab id after removal.
    pub fn close_tab(&mut self, tab_id: &str) -> Option<String> {
        let Some(index) = self.tabs.iter().position(|tab| tab.tab_id == tab_id) else {
            return self.active_id.clone();
        };
        let was_active = self.active_id.as_deref() == Some(tab_id);
        self.tabs.remove(index);

        if was_active {
            let neighbor = if index < self.tabs.len() {
                Some(index)
            } else {
                index.checked_sub(1)
            };
            self.active_id = neighbor.map(|i| self.tabs[i].tab_id.clone());
        }
        self.active_id.clone()
    }

    /// Sets the active tab. Returns false for an unknown id.
    pub fn switch_to(&mut self, tab_id: &str) -> bool {
        if self.contains(tab_id) {
            self.active_id = Some(tab_id.to_string());
            true
        } else {
            false
        }
    }

    /// Cyclically activates the tab after the active one; returns its id.
    pub fn next_tab(&mut self) -> Option<String> {
        self.step(1)
    }

    /// Cyclically activates the tab before the active one; returns its id.
    pub fn prev_tab(&mut self) -> Option<String> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<String> {
        if self.tabs.is_empty() {
            return None;
        }
        let current = self
            .active_id
            .as_deref()
            .and_then(|id| self.tabs.iter().position(|tab| tab.tab_id == id))
            .unwrap_or(0);
        let len = self.tabs.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        let tab_id = self.tabs[next].tab_id.clone();
        self.active_id = Some(tab_id.clone());
        Some(tab_id)
    }

    /// Moves the tab `moved_id` to the position of `over_id`, shifting the
    /// tabs in between. Unknown ids leave the order unchanged.
    pub fn reorder(&mut self, moved_id: &str, over_id: &str) {
        let Some(from) = self.tabs.iter().position(|tab| tab.tab_id == moved_id) else {
            return;
        };
        let Some(to) = self.tabs.iter().position(|tab| tab.tab_id == over_id) else {
            return;
        };
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
    }

    /// Updates a tab's dirty flag.
    pub fn set_dirty(&mut self, tab_id: &str, dirty: bool) {
        if let Some(tab) = self.tabs.iter_mut().find(|tab| tab.tab_id == tab_id) {
            tab.is_dirty = dirty;
        }
    }

    /// Binds a previously blank tab to a saved request id, after a first
    /// save.
    pub fn bind_request(&mut self, tab_id: &str, request_id: &str) {
        if let Some(tab) = self.tabs.iter_mut().find(|tab| tab.tab_id == tab_id) {
            tab.request_id = Some(request_id.to_string());
        }
    }
}
