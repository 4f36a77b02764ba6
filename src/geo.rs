//! # Geographic Utilities
//!
//! Distance math for day-trip planning and the origin tracker.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`distance_km`] | Great-circle distance between two coordinates, in kilometers |
//! | [`distance_meters`] | Same, in meters (movement-threshold checks) |
//! | [`path_length_km`] | Total length of an ordered route |
//!
//! ## Algorithm Notes
//!
//! Distances use the Haversine formula (spherical Earth, mean radius
//! ~6371 km), the standard for GPS-scale distance work and accurate to well
//! under 0.5% — far more than enough to rank a handful of stops around
//! Manhattan. All inputs are WGS84 degrees.
//!
//! Out-of-range coordinates are the caller's responsibility: the math
//! accepts them and produces a number, never a fault
//! ([`Coordinate::is_valid`](crate::Coordinate::is_valid) exists for callers
//! that want to check first).

use crate::Coordinate;
use geo::{Distance, Haversine, Point};

/// Calculate the great-circle distance between two coordinates in kilometers.
///
/// Pure and symmetric: `distance_km(a, b) == distance_km(b, a)`, and zero
/// iff `a == b` (within floating-point tolerance).
///
/// # Example
///
/// ```rust
/// use rollin_core::{geo, Coordinate};
///
/// let central_park = Coordinate::new(40.772087, -73.973159);
/// let battery_park = Coordinate::new(40.703, -74.017);
///
/// let km = geo::distance_km(central_park, battery_park);
/// assert!(km > 7.0 && km < 9.0);
/// ```
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    distance_meters(a, b) / 1000.0
}

/// Calculate the great-circle distance between two coordinates in meters.
#[inline]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let p1 = Point::new(a.longitude, a.latitude);
    let p2 = Point::new(b.longitude, b.latitude);
    Haversine::distance(p1, p2)
}

/// Total length of an ordered route in kilometers.
///
/// Sums the leg distances between consecutive stops. Empty or single-stop
/// routes return 0.0.
pub fn path_length_km(stops: &[Coordinate]) -> f64 {
    if stops.len() < 2 {
        return 0.0;
    }

    stops
        .windows(2)
        .map(|w| distance_km(w[0], w[1]))
        .sum()
}
