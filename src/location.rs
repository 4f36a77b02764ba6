//! Device-position tracking for the day-trip origin.
//!
//! The platform shell owns the actual location subscription; it forwards
//! raw fixes into an [`OriginTracker`], which applies the 10-meter
//! minimum-movement threshold and supplies the route origin. A denied
//! permission never fails the flow — the origin degrades to the Central
//! Park fallback and planning proceeds from there.

use crate::geo::distance_meters;
use crate::{Coordinate, CENTRAL_PARK};
use log::debug;

/// Minimum movement between accepted position updates, in meters.
pub const MIN_MOVE_METERS: f64 = 10.0;

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet; treated like denied until the answer arrives.
    Undetermined,
    Granted,
    Denied,
}

/// Tracks the device position while a screen is mounted.
///
/// # Example
///
/// ```rust
/// use rollin_core::{location::OriginTracker, Coordinate, CENTRAL_PARK};
///
/// let mut tracker = OriginTracker::new();
/// assert_eq!(tracker.origin(), CENTRAL_PARK); // fallback before any fix
///
/// tracker.grant();
/// tracker.push_fix(Coordinate::new(40.758, -73.9855));
/// assert_eq!(tracker.origin(), Coordinate::new(40.758, -73.9855));
/// ```
#[derive(Debug)]
pub struct OriginTracker {
    permission: Permission,
    fix: Option<Coordinate>,
}

impl Default for OriginTracker {
    fn default() -> Self {
        Self {
            permission: Permission::Undetermined,
            fix: None,
        }
    }
}

impl OriginTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// The platform granted location access; fixes are accepted from now on.
    pub fn grant(&mut self) {
        self.permission = Permission::Granted;
    }

    /// The platform denied location access. Any previous fix is kept frozen;
    /// new fixes are ignored.
    pub fn deny(&mut self) {
        debug!("[Origin] location permission denied, using fallback origin");
        self.permission = Permission::Denied;
    }

    /// Feed a raw position update from the platform subscription.
    ///
    /// Returns whether the fix was accepted. Rejected when permission is not
    /// granted, or when the device moved less than [`MIN_MOVE_METERS`] since
    /// the last accepted fix (GPS jitter, not movement).
    pub fn push_fix(&mut self, position: Coordinate) -> bool {
        if self.permission != Permission::Granted {
            return false;
        }
        if let Some(last) = self.fix {
            if distance_meters(last, position) < MIN_MOVE_METERS {
                return false;
            }
        }
        self.fix = Some(position);
        true
    }

    /// Whether a live fix has been accepted.
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// The origin for route planning: the live position if there is one,
    /// otherwise the Central Park fallback.
    pub fn origin(&self) -> Coordinate {
        self.fix.unwrap_or(CENTRAL_PARK)
    }
}
