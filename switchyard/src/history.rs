//! The history collaborator.
//!
//! A [`Router`](crate::Router) does not own the browser location. It talks to a
//! [`History`] implementation that stores the current fragment and reports
//! whether a navigation changed it. [`MemoryHistory`] keeps everything in
//! memory and records each accepted navigation.

use crate::events::EventBus;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use switchyard_core::{EventSink, HistoryError};

/// Options for a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Dispatch the new fragment when it changed. Unset means "no", except for
    /// [`Router::go`](crate::Router::go), which defaults it to `true`.
    pub trigger: Option<bool>,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `trigger`.
    pub fn trigger(mut self, trigger: bool) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set `replace`.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Fill `trigger` when unset.
    pub fn or_trigger(mut self, trigger: bool) -> Self {
        self.trigger.get_or_insert(trigger);
        self
    }

    /// Whether the navigation dispatches.
    pub fn triggers(&self) -> bool {
        self.trigger.unwrap_or(false)
    }
}

/// Strip one leading `#` or `/` and trailing whitespace.
pub fn normalize_fragment(fragment: &str) -> &str {
    fragment
        .strip_prefix(['#', '/'])
        .unwrap_or(fragment)
        .trim_end()
}

/// Stores the current location for a router.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `History`",
    label = "missing `History` implementation"
)]
pub trait History: Send + Sync + 'static {
    /// Move to `fragment`. Returns whether the current fragment changed.
    fn navigate(&self, fragment: &str, options: &NavigateOptions) -> Result<bool, HistoryError>;

    /// The current fragment, possibly with its own query string.
    fn fragment(&self) -> String;

    /// The page query string, with its leading `?`, or empty.
    fn search(&self) -> String;

    /// A sink for process-wide `route` announcements.
    fn event_sink(&self) -> Option<Arc<dyn EventSink>> {
        None
    }
}

/// A recorded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The normalized fragment.
    pub fragment: String,
    /// The options it was requested with.
    pub options: NavigateOptions,
}

#[derive(Debug, Default)]
struct HistoryState {
    fragment: String,
    search: String,
    entries: Vec<String>,
    navigations: Vec<Navigation>,
    blocked: Option<String>,
}

/// An in-memory [`History`].
///
/// Clones share state, so a test can hand one clone to a router and inspect
/// another. Its [`EventBus`] receives every router's global `route`
/// announcement.
///
/// # Example
///
/// ```rust
/// use switchyard::{History, MemoryHistory, NavigateOptions};
///
/// let history = MemoryHistory::at("home").with_search("?lang=en");
/// assert!(history.navigate("#search", &NavigateOptions::new()).unwrap());
/// assert_eq!(history.fragment(), "search");
/// assert_eq!(history.entries(), vec!["home", "search"]);
/// ```
#[derive(Clone, Default)]
pub struct MemoryHistory {
    state: Arc<Mutex<HistoryState>>,
    events: Arc<EventBus>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("state", &*self.state())
            .field("events", &self.events)
            .finish()
    }
}

impl MemoryHistory {
    /// An empty history at the root fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A history whose first entry is `fragment`.
    pub fn at(fragment: &str) -> Self {
        let history = Self::new();
        {
            let fragment = normalize_fragment(fragment).to_string();
            let mut state = history.state();
            state.entries.push(fragment.clone());
            state.fragment = fragment;
        }
        history
    }

    /// Set the page query string.
    pub fn with_search(self, search: &str) -> Self {
        self.set_search(search);
        self
    }

    /// Replace the page query string. A missing leading `?` is added.
    pub fn set_search(&self, search: &str) {
        self.state().search = match search {
            "" => String::new(),
            s if s.starts_with('?') => s.to_string(),
            s => format!("?{s}"),
        };
    }

    /// Every history entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state().entries.clone()
    }

    /// Every accepted navigation, in order.
    pub fn navigations(&self) -> Vec<Navigation> {
        self.state().navigations.clone()
    }

    /// Reject every navigation with `reason` until [`unblock`](Self::unblock).
    pub fn block(&self, reason: impl Into<String>) {
        self.state().blocked = Some(reason.into());
    }

    /// Accept navigations again.
    pub fn unblock(&self) {
        self.state().blocked = None;
    }

    /// The bus receiving global `route` announcements.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    fn state(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl History for MemoryHistory {
    fn navigate(&self, fragment: &str, options: &NavigateOptions) -> Result<bool, HistoryError> {
        let mut state = self.state();
        if let Some(reason) = &state.blocked {
            return Err(HistoryError::Rejected(reason.clone()));
        }

        let fragment = normalize_fragment(fragment).to_string();
        state.navigations.push(Navigation {
            fragment: fragment.clone(),
            options: *options,
        });
        if state.fragment == fragment {
            return Ok(false);
        }

        match state.entries.len() {
            len if options.replace && len > 0 => state.entries[len - 1] = fragment.clone(),
            _ => state.entries.push(fragment.clone()),
        }
        state.fragment = fragment;
        Ok(true)
    }

    fn fragment(&self) -> String {
        self.state().fragment.clone()
    }

    fn search(&self) -> String {
        self.state().search.clone()
    }

    fn event_sink(&self) -> Option<Arc<dyn EventSink>> {
        Some(self.events.clone() as Arc<dyn EventSink>)
    }
}
