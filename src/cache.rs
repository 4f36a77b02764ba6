//! Per-screen list cache with refresh triggers and a late-response guard.
//!
//! Every screen fetches its backing list in full and replaces the previous
//! one — no merging, no patching, no pagination. A refresh is triggered by
//! (a) the screen regaining focus or (b) the shared "favorite changed"
//! signal. Triggers are deliberately NOT coalesced: two fetches may be in
//! flight at once and the last response to be applied wins. With
//! human-timescale interaction and a one-round-trip staleness window this
//! race is acceptable.
//!
//! In-flight fetches are never aborted. Instead, a [`ScreenGuard`] scoped to
//! the screen's lifetime is checked before applying a result: once the
//! screen is retired, late responses are discarded as no-ops rather than
//! updating state that no longer exists.

use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Shared change counter, bumped whenever a favorite is added or removed.
///
/// Screens remember the last value they saw; a mismatch on focus means
/// their list is stale and must be refetched.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal {
    counter: Arc<AtomicU64>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that favorites changed; returns the new value.
    pub fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn value(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// The fetched list backing one screen, plus its identity generation.
///
/// `generation` changes on every full replace; selection state keyed to a
/// generation (see [`DayPlanSession::sync_places`](crate::planner::DayPlanSession::sync_places))
/// is invalidated when it moves.
#[derive(Debug)]
pub struct ScreenCache<T> {
    items: Vec<T>,
    generation: u64,
    seen_signal: u64,
}

impl<T> Default for ScreenCache<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            seen_signal: 0,
        }
    }
}

impl<T> ScreenCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Identity of the currently displayed list. Starts at 0 (nothing
    /// fetched yet) and bumps on every replace.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Full replace of the backing list; returns the new generation.
    pub fn replace(&mut self, items: Vec<T>) -> u64 {
        self.items = items;
        self.generation += 1;
        self.generation
    }

    /// Whether the favorite-changed signal moved since this screen last
    /// refreshed. Checked on focus.
    pub fn is_stale(&self, signal: &RefreshSignal) -> bool {
        self.seen_signal != signal.value()
    }

    /// Record that a refresh against the current signal value completed.
    pub fn mark_fresh(&mut self, signal: &RefreshSignal) {
        self.seen_signal = signal.value();
    }
}

/// Lifetime guard for one screen's in-flight fetches.
///
/// The screen holds the guard and calls [`retire`](ScreenGuard::retire) on
/// unmount; each fetch carries a [`GuardToken`] and applies its result
/// through it. A token whose screen is gone discards the result.
#[derive(Debug, Clone)]
pub struct ScreenGuard {
    alive: Arc<AtomicBool>,
}

impl Default for ScreenGuard {
    fn default() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl ScreenGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to hand to an in-flight fetch.
    pub fn token(&self) -> GuardToken {
        GuardToken {
            alive: Arc::clone(&self.alive),
        }
    }

    /// The screen is gone: all outstanding tokens turn into no-ops.
    pub fn retire(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }
}

/// Handed to a single fetch; checked before its response is applied.
#[derive(Debug, Clone)]
pub struct GuardToken {
    alive: Arc<AtomicBool>,
}

impl GuardToken {
    pub fn is_live(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Apply a fetched list to the cache, unless the screen was retired.
    ///
    /// Returns the new generation when applied, `None` when discarded.
    /// Responses are applied in arrival order — last write wins.
    pub fn apply<T>(&self, cache: &mut ScreenCache<T>, items: Vec<T>) -> Option<u64> {
        if !self.is_live() {
            debug!("[ScreenCache] screen retired, discarding late response");
            return None;
        }
        Some(cache.replace(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_bumps_generation() {
        let mut cache: ScreenCache<&str> = ScreenCache::new();
        assert_eq!(cache.generation(), 0);
        assert_eq!(cache.replace(vec!["a"]), 1);
        assert_eq!(cache.replace(vec!["b"]), 2);
        assert_eq!(cache.items(), &["b"]);
    }

    #[test]
    fn test_signal_staleness_cycle() {
        let signal = RefreshSignal::new();
        let mut cache: ScreenCache<&str> = ScreenCache::new();
        cache.mark_fresh(&signal);
        assert!(!cache.is_stale(&signal));

        // Another screen likes a place
        signal.clone().bump();
        assert!(cache.is_stale(&signal));

        cache.mark_fresh(&signal);
        assert!(!cache.is_stale(&signal));
    }

    #[test]
    fn test_late_response_discarded_after_retire() {
        let guard = ScreenGuard::new();
        let token = guard.token();
        let mut cache: ScreenCache<&str> = ScreenCache::new();

        guard.retire();
        assert_eq!(token.apply(&mut cache, vec!["late"]), None);
        assert!(cache.items().is_empty());
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn test_racing_fetches_last_write_wins() {
        let guard = ScreenGuard::new();
        let first = guard.token();
        let second = guard.token();
        let mut cache: ScreenCache<&str> = ScreenCache::new();

        // Two un-coalesced triggers; responses arrive out of order.
        second.apply(&mut cache, vec!["newer"]);
        first.apply(&mut cache, vec!["older"]);

        // Arrival order decides: the later arrival is displayed even if it
        // was dispatched first.
        assert_eq!(cache.items(), &["older"]);
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn test_tokens_outlive_guard_handle_clones() {
        let guard = ScreenGuard::new();
        let token = guard.token();
        let clone = guard.clone();
        clone.retire();
        assert!(!token.is_live());
        assert!(!guard.is_alive());
    }
}
