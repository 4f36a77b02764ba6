//! End-to-end day-trip planning, offline: check favorites, order the route,
//! build the maps hand-off link.
//!
//! Run with: cargo run --example plan_day

use rollin_core::{maplink, Coordinate, DayPlanSession, Place, UiCoordinator, CENTRAL_PARK};

fn main() {
    // Favorites as the screen would display them
    let favorites = vec![
        Place::new("pl-1", "Ghostbusters Firehouse", Coordinate::new(40.7195, -74.0067)),
        Place::new("pl-2", "Times Square", Coordinate::new(40.758, -73.9855)),
        Place::new("pl-3", "Katz's Delicatessen", Coordinate::new(40.7223, -73.9874)),
    ];

    let ui = UiCoordinator::new();
    let mut session = DayPlanSession::new(ui);

    session.enter();
    session.sync_places(1, &favorites);
    session.toggle("pl-1");
    session.toggle("pl-2");
    session.toggle("pl-3");

    // No device fix in this demo, so the origin is the Central Park fallback
    let origin = CENTRAL_PARK;
    let route = session.build_route(origin, &favorites).expect("non-empty selection");

    println!("Day trip from {} ({} stops):\n", origin, route.len());
    for (i, stop) in route.iter().enumerate() {
        println!("  {}. {} @ {}", i + 1, stop.title, stop.coords);
    }

    let link = maplink::directions_link(origin, &route).expect("non-empty route");
    println!("\nWeb URL: {}", link.web_url);
    println!("iOS URL: {}", link.ios_url);
}
