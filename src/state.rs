//! App-wide UI coordination: the active place popup and plan-day mode.
//!
//! Several screens share two pieces of UI state: which place card's popup is
//! open (at most one across the whole app) and whether plan-day mode is
//! active (which suppresses popups entirely). Both live in a single
//! [`UiCoordinator`]; consumers hold a cloned handle and go through its
//! methods, never through ambient globals. Mutation is atomic per call —
//! the UI event loop is single-threaded, the lock only makes that explicit.

use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct UiFlags {
    active_popup: Option<String>,
    plan_day: bool,
}

/// Cloneable handle to the shared popup/plan-day flags.
///
/// # Example
///
/// ```rust
/// use rollin_core::UiCoordinator;
///
/// let ui = UiCoordinator::new();
/// ui.toggle_popup("place-1");
/// assert_eq!(ui.active_popup().as_deref(), Some("place-1"));
///
/// ui.enter_plan_day();
/// assert_eq!(ui.active_popup(), None); // entering plan mode dismisses popups
/// ui.toggle_popup("place-2");
/// assert_eq!(ui.active_popup(), None); // and suppresses new ones
/// ```
#[derive(Debug, Clone, Default)]
pub struct UiCoordinator {
    inner: Arc<Mutex<UiFlags>>,
}

impl UiCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the place card whose popup is currently open, if any.
    pub fn active_popup(&self) -> Option<String> {
        self.lock().active_popup.clone()
    }

    /// Toggle the popup for a place card: opens it, or closes it if it is
    /// already the active one. Ignored while plan-day mode is on.
    pub fn toggle_popup(&self, place_id: &str) {
        let mut flags = self.lock();
        if flags.plan_day {
            return;
        }
        if flags.active_popup.as_deref() == Some(place_id) {
            flags.active_popup = None;
        } else {
            flags.active_popup = Some(place_id.to_string());
        }
    }

    /// Dismiss whatever popup is open.
    pub fn close_popup(&self) {
        self.lock().active_popup = None;
    }

    /// Whether plan-day mode is active.
    pub fn plan_day(&self) -> bool {
        self.lock().plan_day
    }

    /// Enter plan-day mode. Any open popup is dismissed so the checkbox
    /// overlay is the only interactive layer.
    pub fn enter_plan_day(&self) {
        let mut flags = self.lock();
        flags.plan_day = true;
        flags.active_popup = None;
    }

    /// Leave plan-day mode. Also dismisses popups — the screen re-renders
    /// from a clean slate.
    pub fn exit_plan_day(&self) {
        let mut flags = self.lock();
        flags.plan_day = false;
        flags.active_popup = None;
    }

    /// Flip plan-day mode; returns the new state.
    pub fn toggle_plan_day(&self) -> bool {
        let mut flags = self.lock();
        flags.plan_day = !flags.plan_day;
        flags.active_popup = None;
        flags.plan_day
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UiFlags> {
        // The flags are plain data, a poisoned lock cannot leave them
        // inconsistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
