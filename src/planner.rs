//! # Day-Trip Planner
//!
//! Turns a set of checked favorites into an ordered route.
//!
//! The ordering is a **nearest-from-origin ascending sort**: stops are
//! ranked by their distance from the starting point, not by total route
//! length. This is deliberately not a travelling-salesman solution — the
//! shipped behaviour is a single-criterion sort and is preserved as such.
//! Ties keep their input order (the sort is stable, no secondary key).
//!
//! [`Selection`] tracks which favorites are checked, keyed by place id so it
//! cannot drift out of alignment when the list refreshes. [`DayPlanSession`]
//! couples the selection with the shared plan-day flag: entering plan mode
//! always starts from an empty selection, and a list refresh that changes
//! the list's identity wipes any in-flight selection.

use crate::geo::distance_km;
use crate::state::UiCoordinator;
use crate::{Coordinate, Error, Place};
use log::debug;
use std::collections::HashSet;

/// Order selected places by ascending distance from the origin.
///
/// The first element is the nearest stop, the last is the day's final
/// destination. A single-element selection is a valid route of length 1
/// (that stop is both first and last). An empty selection is an error —
/// callers must not build a maps link from it.
///
/// # Example
///
/// ```rust
/// use rollin_core::{planner, Coordinate, Place};
///
/// let origin = Coordinate::new(40.772087, -73.973159);
/// let far = Place::new("far", "Financial District", Coordinate::new(40.706, -74.009));
/// let near = Place::new("near", "Upper East Side", Coordinate::new(40.7736, -73.9566));
///
/// let route = planner::order_by_origin(origin, vec![far, near]).unwrap();
/// assert_eq!(route[0].id, "near");
/// assert_eq!(route[1].id, "far");
/// ```
pub fn order_by_origin(origin: Coordinate, mut selected: Vec<Place>) -> Result<Vec<Place>, Error> {
    if selected.is_empty() {
        return Err(Error::EmptySelection);
    }

    // Stable sort: equidistant stops keep their input order.
    selected.sort_by(|a, b| {
        let da = distance_km(origin, a.coords);
        let db = distance_km(origin, b.coords);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        "[Planner] ordered {} stops, nearest {:.2}km, farthest {:.2}km",
        selected.len(),
        distance_km(origin, selected[0].coords),
        distance_km(origin, selected[selected.len() - 1].coords),
    );

    Ok(selected)
}

/// Which favorites are checked for the day plan, keyed by place id.
///
/// Keying by id (instead of positions parallel to the displayed list) means
/// a refreshed list can never mis-align the checkboxes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    checked: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the checkbox for a place; returns the new state.
    pub fn toggle(&mut self, place_id: &str) -> bool {
        if self.checked.remove(place_id) {
            false
        } else {
            self.checked.insert(place_id.to_string());
            true
        }
    }

    pub fn is_selected(&self, place_id: &str) -> bool {
        self.checked.contains(place_id)
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Drop selections whose place no longer exists in the displayed list.
    pub fn retain_known(&mut self, places: &[Place]) {
        let known: HashSet<&str> = places.iter().map(|p| p.id.as_str()).collect();
        self.checked.retain(|id| known.contains(id.as_str()));
    }

    /// The checked subset of `places`, in display order.
    pub fn selected_places(&self, places: &[Place]) -> Vec<Place> {
        places
            .iter()
            .filter(|p| self.checked.contains(&p.id))
            .cloned()
            .collect()
    }
}

/// One favorites screen's plan-day session.
///
/// Owns the [`Selection`] and drives the shared plan-day flag on the
/// [`UiCoordinator`]. Invariants:
/// - entering plan mode clears the selection (no stale checks survive a
///   mode transition, in either direction);
/// - a list refresh with a new identity clears the selection too.
#[derive(Debug)]
pub struct DayPlanSession {
    ui: UiCoordinator,
    selection: Selection,
    list_generation: u64,
}

impl DayPlanSession {
    pub fn new(ui: UiCoordinator) -> Self {
        Self {
            ui,
            selection: Selection::new(),
            list_generation: 0,
        }
    }

    /// Whether plan-day mode is on (shared app-wide).
    pub fn active(&self) -> bool {
        self.ui.plan_day()
    }

    /// Enter plan mode: selection starts empty, open popups are dismissed.
    pub fn enter(&mut self) {
        self.selection.clear();
        self.ui.enter_plan_day();
    }

    /// Leave plan mode and drop the selection.
    pub fn exit(&mut self) {
        self.selection.clear();
        self.ui.exit_plan_day();
    }

    /// Toggle a place's checkbox. Ignored outside plan mode (the checkboxes
    /// are not even rendered then); returns the new checked state.
    pub fn toggle(&mut self, place_id: &str) -> bool {
        if !self.active() {
            return false;
        }
        self.selection.toggle(place_id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Tell the session the displayed list was replaced.
    ///
    /// Each full refresh carries a new generation (see
    /// [`ScreenCache::replace`](crate::cache::ScreenCache::replace)); when it
    /// changes, any in-flight selection is invalidated. Returns whether a
    /// reset happened.
    pub fn sync_places(&mut self, generation: u64, places: &[Place]) -> bool {
        if generation != self.list_generation {
            self.list_generation = generation;
            self.selection.clear();
            return true;
        }
        // Same list identity: keep checks, but drop ids that vanished.
        self.selection.retain_known(places);
        false
    }

    /// Build the ordered route for the current selection.
    ///
    /// Fails with [`Error::EmptySelection`] when nothing is checked; the
    /// screen surfaces that as a blocking alert and no link is built.
    pub fn build_route(&self, origin: Coordinate, places: &[Place]) -> Result<Vec<Place>, Error> {
        order_by_origin(origin, self.selection.selected_places(places))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str, lat: f64, lon: f64) -> Place {
        Place::new(id, id, Coordinate::new(lat, lon))
    }

    // Fixed origin and two places from the shipped app's geography:
    // P1 (Upper East Side) is closer to Central Park than P2 (Financial
    // District).
    const ORIGIN: Coordinate = Coordinate {
        latitude: 40.772087,
        longitude: -73.973159,
    };

    #[test]
    fn test_order_nearest_first() {
        let p1 = place("p1", 40.7736, -73.9566);
        let p2 = place("p2", 40.706, -74.009);

        let route = order_by_origin(ORIGIN, vec![p2, p1]).unwrap();
        assert_eq!(route[0].id, "p1");
        assert_eq!(route[1].id, "p2");
    }

    #[test]
    fn test_order_empty_selection_is_an_error() {
        let err = order_by_origin(ORIGIN, vec![]).unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
    }

    #[test]
    fn test_order_single_stop_route() {
        let only = place("only", 40.758, -73.9855);
        let route = order_by_origin(ORIGIN, vec![only.clone()]).unwrap();
        assert_eq!(route, vec![only]);
    }

    #[test]
    fn test_order_three_stops_by_distance() {
        // A ~5km, B ~1km, C ~3km from the origin (southward down Manhattan)
        let a = place("a", 40.727, -73.973);
        let b = place("b", 40.763, -73.973);
        let c = place("c", 40.745, -73.973);

        let route = order_by_origin(ORIGIN, vec![a, b, c]).unwrap();
        let ids: Vec<&str> = route.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_order_ties_keep_input_order() {
        let twin_a = place("twin_a", 40.75, -73.99);
        let twin_b = place("twin_b", 40.75, -73.99);

        let route = order_by_origin(ORIGIN, vec![twin_a, twin_b]).unwrap();
        assert_eq!(route[0].id, "twin_a");
        assert_eq!(route[1].id, "twin_b");
    }

    #[test]
    fn test_selection_toggle_and_clear() {
        let mut sel = Selection::new();
        assert!(sel.toggle("x"));
        assert!(sel.is_selected("x"));
        assert!(!sel.toggle("x"));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_selection_survives_reorder_but_not_removal() {
        let mut sel = Selection::new();
        sel.toggle("a");
        sel.toggle("c");

        // "c" disappeared from the refreshed list
        let refreshed = vec![place("b", 40.7, -74.0), place("a", 40.71, -74.0)];
        sel.retain_known(&refreshed);

        assert!(sel.is_selected("a"));
        assert!(!sel.is_selected("c"));
    }

    #[test]
    fn test_selected_places_in_display_order() {
        let places = vec![
            place("a", 40.7, -74.0),
            place("b", 40.71, -74.0),
            place("c", 40.72, -74.0),
        ];
        let mut sel = Selection::new();
        sel.toggle("c");
        sel.toggle("a");

        let picked = sel.selected_places(&places);
        let ids: Vec<&str> = picked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_session_mode_transition_resets_selection() {
        let mut session = DayPlanSession::new(UiCoordinator::new());

        session.enter();
        session.toggle("p0");
        session.toggle("p2");
        assert_eq!(session.selection().len(), 2);

        session.exit();
        session.enter();
        assert!(session.selection().is_empty(), "re-entering shows all-unchecked");
    }

    #[test]
    fn test_session_toggle_outside_plan_mode_is_ignored() {
        let mut session = DayPlanSession::new(UiCoordinator::new());
        assert!(!session.toggle("p0"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_session_list_identity_change_resets_selection() {
        let mut session = DayPlanSession::new(UiCoordinator::new());
        let places = vec![place("a", 40.7, -74.0)];

        session.enter();
        session.sync_places(1, &places);
        session.toggle("a");
        assert!(!session.selection().is_empty());

        // Full-replace refresh: new generation invalidates the selection.
        assert!(session.sync_places(2, &places));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_session_build_route_orders_selection() {
        let mut session = DayPlanSession::new(UiCoordinator::new());
        let places = vec![
            place("far", 40.706, -74.009),
            place("near", 40.7736, -73.9566),
        ];

        session.enter();
        session.sync_places(1, &places);
        session.toggle("far");
        session.toggle("near");

        let route = session.build_route(ORIGIN, &places).unwrap();
        assert_eq!(route[0].id, "near");
        assert_eq!(route[1].id, "far");
    }

    #[test]
    fn test_session_empty_selection_cannot_build() {
        let mut session = DayPlanSession::new(UiCoordinator::new());
        session.enter();
        let err = session.build_route(ORIGIN, &[]).unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
    }
}
