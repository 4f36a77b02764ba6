//! # External Maps Deep Links
//!
//! Builds the URIs that hand a place or a planned route off to the device's
//! maps app, with a web fallback when the native app is missing.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`directions_link`] | Multi-stop day-trip route (origin, waypoints, destination) |
//! | [`place_search_link`] | Pin a single place on the map |
//! | [`navigation_link`] | Turn-by-turn from origin to one destination |
//!
//! ## Capability probe
//!
//! Whether the native app can handle a URI scheme is only knowable by asking
//! the OS, and that answer arrives asynchronously. The shells pass an async
//! `can_open(uri) -> bool` hook into [`DirectionsLink::resolve`] /
//! [`PlaceLink::resolve`]; the resolved URL is then opened by the caller.
//! There is no timeout: if the probe never answers, the hand-off simply never
//! happens — the OS call is expected to be fast and nothing blocks on it.

use crate::{Coordinate, Error, Place};
use log::debug;
use std::future::Future;

/// URI scheme probed on iOS to detect the Google Maps app.
pub const GOOGLE_MAPS_SCHEME: &str = "comgooglemaps://";

/// Target platform for link selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    /// Web, or any platform without native maps. Always gets the web URL.
    Web,
}

/// Links for a multi-stop day-trip route.
///
/// The web URL always works; the iOS URL needs the Google Maps app. On
/// Android the app opens the web URL directly for multi-stop routes.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsLink {
    pub web_url: String,
    pub ios_url: String,
}

impl DirectionsLink {
    /// Pick the URL to open for `platform`.
    ///
    /// On iOS the native scheme is probed through `can_open`; a negative or
    /// unsupported probe falls back to the web URL. The web URL is never
    /// wrong, only less convenient.
    pub async fn resolve<F, Fut>(&self, platform: Platform, can_open: F) -> String
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = bool>,
    {
        match platform {
            Platform::Ios => {
                if can_open(GOOGLE_MAPS_SCHEME.to_string()).await {
                    self.ios_url.clone()
                } else {
                    debug!("[MapLink] native maps unavailable, using web URL");
                    self.web_url.clone()
                }
            }
            Platform::Android | Platform::Web => self.web_url.clone(),
        }
    }
}

/// Build the day-trip directions link for an ordered route.
///
/// The last stop is the destination; everything before it becomes a
/// waypoint, `|`-joined in route order. A single-stop route has no
/// waypoints. An empty route is an error — the planner refuses to produce
/// one, and this refuses to link one.
///
/// # Example
///
/// ```rust
/// use rollin_core::{maplink, Coordinate, Place};
///
/// let origin = Coordinate::new(40.772087, -73.973159);
/// let route = vec![Place::new("p", "Times Square", Coordinate::new(40.758, -73.9855))];
///
/// let link = maplink::directions_link(origin, &route).unwrap();
/// assert_eq!(
///     link.web_url,
///     "https://www.google.com/maps/dir/?api=1&origin=40.772087,-73.973159&destination=40.758,-73.9855",
/// );
/// ```
pub fn directions_link(origin: Coordinate, route: &[Place]) -> Result<DirectionsLink, Error> {
    let destination = route.last().ok_or(Error::EmptySelection)?;

    let mut query = format!("api=1&origin={}&destination={}", origin, destination.coords);

    if route.len() > 1 {
        let waypoints: Vec<String> = route[..route.len() - 1]
            .iter()
            .map(|p| p.coords.to_string())
            .collect();
        query.push_str("&waypoints=");
        query.push_str(&waypoints.join("|"));
    }

    Ok(DirectionsLink {
        web_url: format!("https://www.google.com/maps/dir/?{}", query),
        ios_url: format!("{}?{}", GOOGLE_MAPS_SCHEME, query),
    })
}

/// Links for a single place: a map pin or turn-by-turn navigation.
///
/// Unlike the multi-stop route, Android has a native URI here, probed the
/// same way as iOS.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceLink {
    pub web_url: String,
    pub ios_url: String,
    pub android_url: String,
}

impl PlaceLink {
    /// Pick the URL to open for `platform`, probing the native candidate.
    pub async fn resolve<F, Fut>(&self, platform: Platform, can_open: F) -> String
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = bool>,
    {
        match platform {
            Platform::Ios => {
                if can_open(GOOGLE_MAPS_SCHEME.to_string()).await {
                    self.ios_url.clone()
                } else {
                    self.web_url.clone()
                }
            }
            Platform::Android => {
                if can_open(self.android_url.clone()).await {
                    self.android_url.clone()
                } else {
                    self.web_url.clone()
                }
            }
            Platform::Web => self.web_url.clone(),
        }
    }
}

/// Link that drops a pin on one place (the search-screen "Go to maps!").
pub fn place_search_link(place: Coordinate) -> PlaceLink {
    PlaceLink {
        web_url: format!("https://www.google.com/maps/search/?api=1&query={}", place),
        ios_url: format!("{}?q={}&center={}", GOOGLE_MAPS_SCHEME, place, place),
        android_url: format!("geo:{}?q={}", place, place),
    }
}

/// Turn-by-turn navigation link from `origin` to `destination` (the
/// home-screen marker hand-off).
pub fn navigation_link(origin: Coordinate, destination: Coordinate) -> PlaceLink {
    PlaceLink {
        web_url: format!(
            "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
            origin, destination
        ),
        ios_url: format!("{}?saddr={}&daddr={}", GOOGLE_MAPS_SCHEME, origin, destination),
        android_url: format!("google.navigation:q={}", destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 40.772087,
        longitude: -73.973159,
    };

    fn place(id: &str, lat: f64, lon: f64) -> Place {
        Place::new(id, id, Coordinate::new(lat, lon))
    }

    #[test]
    fn test_empty_route_is_an_error() {
        assert!(matches!(
            directions_link(ORIGIN, &[]),
            Err(Error::EmptySelection)
        ));
    }

    #[test]
    fn test_single_stop_has_no_waypoints() {
        let route = vec![place("x", 40.758, -73.9855)];
        let link = directions_link(ORIGIN, &route).unwrap();

        assert!(link.web_url.contains("destination=40.758,-73.9855"));
        assert!(!link.web_url.contains("waypoints"));
        assert!(link.ios_url.starts_with("comgooglemaps://?api=1"));
    }

    #[test]
    fn test_multi_stop_last_is_destination_rest_are_waypoints() {
        // Already ordered: B (1km), C (3km), A (5km)
        let route = vec![
            place("b", 40.763, -73.973),
            place("c", 40.745, -73.973),
            place("a", 40.727, -73.973),
        ];
        let link = directions_link(ORIGIN, &route).unwrap();

        assert!(link.web_url.contains("destination=40.727,-73.973"));
        assert!(link.web_url.contains("waypoints=40.763,-73.973|40.745,-73.973"));
        // Native URI carries the identical query
        let query = link.web_url.split('?').nth(1).unwrap();
        assert_eq!(link.ios_url, format!("comgooglemaps://?{}", query));
    }

    #[test]
    fn test_origin_is_always_first_query_param_after_api() {
        let route = vec![place("x", 40.758, -73.9855)];
        let link = directions_link(ORIGIN, &route).unwrap();
        assert!(link
            .web_url
            .contains("api=1&origin=40.772087,-73.973159&destination="));
    }

    #[test]
    fn test_place_search_link_shapes() {
        let link = place_search_link(Coordinate::new(40.7195, -74.0067));
        assert_eq!(
            link.web_url,
            "https://www.google.com/maps/search/?api=1&query=40.7195,-74.0067"
        );
        assert_eq!(
            link.ios_url,
            "comgooglemaps://?q=40.7195,-74.0067&center=40.7195,-74.0067"
        );
        assert_eq!(link.android_url, "geo:40.7195,-74.0067?q=40.7195,-74.0067");
    }

    #[test]
    fn test_navigation_link_shapes() {
        let link = navigation_link(ORIGIN, Coordinate::new(40.7195, -74.0067));
        assert!(link.web_url.contains("origin=40.772087,-73.973159"));
        assert!(link.ios_url.contains("saddr=40.772087,-73.973159&daddr=40.7195,-74.0067"));
        assert_eq!(link.android_url, "google.navigation:q=40.7195,-74.0067");
    }

    #[tokio::test]
    async fn test_resolve_ios_probe_supported_uses_native() {
        let route = vec![place("x", 40.758, -73.9855)];
        let link = directions_link(ORIGIN, &route).unwrap();

        let opened = link.resolve(Platform::Ios, |uri| async move {
            assert_eq!(uri, GOOGLE_MAPS_SCHEME);
            true
        });
        assert_eq!(opened.await, link.ios_url);
    }

    #[tokio::test]
    async fn test_resolve_probe_false_never_returns_native() {
        let route = vec![place("x", 40.758, -73.9855)];
        let link = directions_link(ORIGIN, &route).unwrap();

        let opened = link.resolve(Platform::Ios, |_| async { false }).await;
        assert_eq!(opened, link.web_url);
    }

    #[tokio::test]
    async fn test_resolve_android_directions_skip_probe() {
        let route = vec![place("x", 40.758, -73.9855)];
        let link = directions_link(ORIGIN, &route).unwrap();

        // Multi-stop directions go straight to the web URL on Android.
        let opened = link
            .resolve(Platform::Android, |_| async {
                panic!("probe must not run on android directions")
            })
            .await;
        assert_eq!(opened, link.web_url);
    }

    #[tokio::test]
    async fn test_resolve_android_place_link_probes_geo_uri() {
        let link = place_search_link(Coordinate::new(40.7195, -74.0067));

        let opened = link
            .resolve(Platform::Android, |uri| async move { uri.starts_with("geo:") })
            .await;
        assert_eq!(opened, link.android_url);
    }

    #[tokio::test]
    async fn test_resolve_web_is_unconditional() {
        let link = place_search_link(Coordinate::new(40.7195, -74.0067));
        let opened = link
            .resolve(Platform::Web, |_| async { panic!("no probe on web") })
            .await;
        assert_eq!(opened, link.web_url);
    }
}
