//! # Roll-In New York — client core
//!
//! Platform-agnostic core of the Roll-In New York mobile client: browse NYC
//! filming locations, mark favorites, plan a multi-stop day trip, and hand
//! the route off to an external maps app.
//!
//! This crate provides:
//! - Day-trip route ordering (nearest-from-origin) and maps deep links
//! - Screen-scoped client state: selection tracking, refresh signals,
//!   late-response guards
//! - A REST client for the Roll-In New York backend
//!
//! ## Features
//!
//! - **`http`** (default) - REST client for the backend (places, favorites,
//!   reviews, pictures, accounts)
//! - **`ffi`** - FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use rollin_core::{Coordinate, Place, planner, maplink, CENTRAL_PARK};
//!
//! let favorites = vec![
//!     Place::new("pl-1", "Times Square", Coordinate::new(40.758, -73.9855)),
//!     Place::new("pl-2", "Katz's Delicatessen", Coordinate::new(40.7223, -73.9874)),
//! ];
//!
//! // Order the day trip by distance from the origin.
//! let route = planner::order_by_origin(CENTRAL_PARK, favorites).unwrap();
//! assert_eq!(route[0].id, "pl-1"); // Times Square is closer to Central Park
//!
//! // Build the external-maps hand-off link.
//! let link = maplink::directions_link(CENTRAL_PARK, &route).unwrap();
//! assert!(link.web_url.starts_with("https://www.google.com/maps/dir/"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod cache;
pub mod geo;
pub mod location;
pub mod maplink;
pub mod planner;
pub mod state;

// HTTP module for the backend REST API
#[cfg(feature = "http")]
pub mod api;

#[cfg(feature = "http")]
pub use api::{BackendClient, LikeStatus, NewReview, UserSession};

pub use cache::{RefreshSignal, ScreenCache, ScreenGuard};
pub use location::OriginTracker;
pub use maplink::{DirectionsLink, PlaceLink, Platform};
pub use planner::{order_by_origin, DayPlanSession, Selection};
pub use state::UiCoordinator;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RollInCoreRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// Fallback origin when device location is unavailable: Central Park, NYC.
pub const CENTRAL_PARK: Coordinate = Coordinate {
    latitude: 40.772087,
    longitude: -73.973159,
};

/// A WGS84 coordinate with latitude and longitude in degrees.
///
/// Serializes as `{ "lat": .., "lon": .. }`, the shape the backend uses.
///
/// # Example
/// ```
/// use rollin_core::Coordinate;
/// let point = Coordinate::new(40.758, -73.9855); // Times Square
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the coordinate is inside the valid WGS84 range.
    ///
    /// The geo math accepts out-of-range values and still produces a number;
    /// this is a report for callers that want to validate input.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl fmt::Display for Coordinate {
    /// Format as `lat,lon` — the form maps URLs expect.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A filming location, as served by the backend.
///
/// Identity is `id` (the backend's `_id`); a place is immutable for the
/// duration of a screen session — refreshes replace the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Place {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub coords: Coordinate,
    /// TMDB ids of the movies shot at this location.
    #[serde(rename = "moviesList", default)]
    pub movies_list: Vec<i64>,
    #[serde(rename = "placePicture", default)]
    pub place_picture: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub address: String,
}

impl Place {
    /// Create a place with just identity and position (tests and demos).
    pub fn new(id: &str, title: &str, coords: Coordinate) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            coords,
            movies_list: Vec::new(),
            place_picture: String::new(),
            overview: String::new(),
            address: String::new(),
        }
    }
}

/// Movie metadata hydrated at app start from the places' `moviesList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub poster_path: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
}

/// A review left on a place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    pub created_at: String,
    /// Star rating, 0-5.
    pub note: u8,
    pub content: String,
}

/// A user-uploaded photo ("memory") tied to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub url: String,
    /// Cloud storage id, needed to delete the picture.
    pub public_id: String,
}

/// Search the hydrated movie list by title, case-insensitive substring match.
///
/// An empty query returns no results (the search popup only opens once the
/// user has typed something).
///
/// # Example
/// ```
/// use rollin_core::{search_movies, Movie};
///
/// let movies = vec![Movie {
///     id: 640,
///     title: "Catch Me If You Can".into(),
///     poster_path: "/ctmEq.jpg".into(),
///     overview: String::new(),
///     release_date: "2002-12-25".into(),
/// }];
///
/// assert_eq!(search_movies("catch", &movies).len(), 1);
/// assert!(search_movies("", &movies).is_empty());
/// ```
pub fn search_movies<'a>(query: &str, movies: &'a [Movie]) -> Vec<&'a Movie> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .collect()
}

// ============================================================================
// Errors
// ============================================================================

/// Crate-level error taxonomy.
///
/// Every failure is terminal for that attempt — there are no retries
/// anywhere; recovery is a new user-initiated action.
#[derive(Debug)]
pub enum Error {
    /// Day-trip planning was confirmed with zero selected places.
    /// Callers surface a blocking alert and must not build a link.
    EmptySelection,
    /// Transport-level failure (request rejected, connection lost).
    Network(String),
    /// The backend answered but with a non-OK status or a refusal
    /// (`result: false` on sign-in/up, missing `url` on upload).
    Api(String),
    /// A device permission (location, camera, media library) was denied.
    /// Location flows degrade to the Central Park fallback instead.
    PermissionDenied(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection => {
                write!(f, "No place selected: select at least one place to plan your day")
            }
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Api(msg) => write!(f, "Backend error: {}", msg),
            Self::PermissionDenied(what) => write!(f, "Permission denied: {}", what),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// FFI surface
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::info;

    /// Order selected favorites by distance from the origin.
    /// Returns an empty vector for an empty selection; the shell shows the
    /// "no place selected" alert in that case.
    #[uniffi::export]
    pub fn ffi_order_by_origin(origin: Coordinate, selected: Vec<Place>) -> Vec<Place> {
        init_logging();
        info!("[RollInCoreRust] order_by_origin: {} places", selected.len());
        planner::order_by_origin(origin, selected).unwrap_or_default()
    }

    /// Links for a multi-stop day trip: the shell probes the native scheme
    /// itself and picks `ios_url` or `web_url` accordingly.
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FfiDirectionsLink {
        pub web_url: String,
        pub ios_url: String,
        pub probe_scheme: String,
    }

    /// Build the external-maps link set for an ordered route.
    /// Returns `None` for an empty route.
    #[uniffi::export]
    pub fn ffi_directions_link(origin: Coordinate, route: Vec<Place>) -> Option<FfiDirectionsLink> {
        init_logging();
        let link = maplink::directions_link(origin, &route).ok()?;
        Some(FfiDirectionsLink {
            web_url: link.web_url,
            ios_url: link.ios_url,
            probe_scheme: maplink::GOOGLE_MAPS_SCHEME.to_string(),
        })
    }

    /// Haversine distance in kilometers, exposed for the map shells.
    #[uniffi::export]
    pub fn ffi_distance_km(a: Coordinate, b: Coordinate) -> f64 {
        geo::distance_km(a, b)
    }

    /// Blocking favorites fetch for shells without their own async runtime.
    /// Returns an empty list on failure; the shell shows its offline state.
    #[cfg(feature = "http")]
    #[uniffi::export]
    pub fn ffi_fetch_favorites(token: String) -> Vec<Place> {
        init_logging();
        match api::fetch_favorites_sync(&token) {
            Ok(places) => places,
            Err(e) => {
                log::warn!("[RollInCoreRust] fetch_favorites failed: {}", e);
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_valid_range() {
        assert!(Coordinate::new(40.772087, -73.973159).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coordinate_display_is_maps_form() {
        let c = Coordinate::new(40.772087, -73.973159);
        assert_eq!(c.to_string(), "40.772087,-73.973159");
    }

    #[test]
    fn test_place_deserializes_backend_shape() {
        let json = r#"{
            "_id": "6745f9ab2",
            "title": "Ghostbusters Firehouse",
            "coords": { "lat": 40.7195, "lon": -74.0067 },
            "moviesList": [620, 43074],
            "placePicture": "https://res.cloudinary.com/x.webp",
            "overview": "Hook & Ladder 8.",
            "address": "14 N Moore St"
        }"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(place.id, "6745f9ab2");
        assert_eq!(place.movies_list, vec![620, 43074]);
        assert!((place.coords.latitude - 40.7195).abs() < 1e-9);
    }

    #[test]
    fn test_place_tolerates_missing_optional_fields() {
        let json = r#"{
            "_id": "abc",
            "title": "Somewhere",
            "coords": { "lat": 40.7, "lon": -74.0 }
        }"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert!(place.movies_list.is_empty());
        assert!(place.overview.is_empty());
    }

    #[test]
    fn test_search_movies_case_insensitive() {
        let movies = vec![
            Movie {
                id: 640,
                title: "Catch Me If You Can".into(),
                poster_path: String::new(),
                overview: String::new(),
                release_date: String::new(),
            },
            Movie {
                id: 620,
                title: "Ghostbusters".into(),
                poster_path: String::new(),
                overview: String::new(),
                release_date: String::new(),
            },
        ];

        let hits = search_movies("GHOST", &movies);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 620);
    }

    #[test]
    fn test_search_movies_empty_query_has_no_results() {
        let movies = vec![Movie {
            id: 1,
            title: "Anything".into(),
            poster_path: String::new(),
            overview: String::new(),
            release_date: String::new(),
        }];
        assert!(search_movies("", &movies).is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = Error::EmptySelection;
        assert!(err.to_string().contains("No place selected"));
    }
}
