//! Fetch a user's favorites from the backend and plan a route through them.
//!
//! Run with: ROLLIN_TOKEN=<user token> cargo run --example fetch_favorites

use rollin_core::{maplink, planner, BackendClient, CENTRAL_PARK};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = std::env::var("ROLLIN_TOKEN")
        .map_err(|_| "set ROLLIN_TOKEN to a signed-in user's token")?;

    let client = BackendClient::new()?;
    let favorites = client.fetch_favorites(&token).await?;
    println!("{} favorite places", favorites.len());

    if favorites.is_empty() {
        return Ok(());
    }

    let route = planner::order_by_origin(CENTRAL_PARK, favorites)?;
    for (i, stop) in route.iter().enumerate() {
        println!("  {}. {} @ {}", i + 1, stop.title, stop.coords);
    }

    let link = maplink::directions_link(CENTRAL_PARK, &route)?;
    println!("\nOpen in maps: {}", link.web_url);
    Ok(())
}
