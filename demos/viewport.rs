//! Lists the stations around Amsterdam with their wind speed markers.
//!
//! Needs `DTN_CLIENT_ID` and `DTN_CLIENT_SECRET`. Set `RUST_LOG=info` to see requests.

use oneobs::{
    BoundingBox, DashConfig, DisplayMode, LatLon, MapQuery, OneObs, OneObsError, ViewportUpdate,
};

#[tokio::main]
async fn main() -> Result<(), OneObsError> {
    env_logger::init();
    let dash = OneObs::new(DashConfig::from_env()?)?;

    let center = LatLon(52.37, 4.90);
    let query = MapQuery::builder()
        .bounds(BoundingBox::new(51.8, 52.9, 4.0, 5.8))
        .display_mode(DisplayMode::WindSpeed)
        .build();

    match dash.stations_in_view(query).await {
        ViewportUpdate::Current(markers) => {
            println!("{} stations near {:?}", markers.len(), center);
            for marker in markers {
                println!(
                    "{:<8} {:<30} {}",
                    marker.station_code,
                    marker.summary.title,
                    marker.marker.label().unwrap_or_else(|| "·".to_string())
                );
            }
        }
        ViewportUpdate::Superseded => println!("superseded"),
    }

    println!("Panning is limited to {:?}", BoundingBox::max_bounds_around(center));
    Ok(())
}
