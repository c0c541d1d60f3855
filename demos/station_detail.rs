//! Prints the detail table of one station for every parameter group.
//!
//! Usage: `cargo run --example station_detail -- EGLL`

use oneobs::{DashConfig, OneObs, ParameterGroup};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let code = env::args().nth(1).unwrap_or_else(|| "EGLL".to_string());
    let dash = OneObs::new(DashConfig::from_env()?)?;

    let detail = dash
        .station_detail(&code, &ParameterGroup::default())
        .await?;
    println!("{} ({})", detail.title(), detail.station_code);
    for (key, value) in detail.metadata() {
        println!("  {}: {}", key, value);
    }

    for group in ParameterGroup::all() {
        let view = detail.view(&group, dash.now());
        println!("\n== {} ==", group);
        if view.is_empty() {
            println!("No data available");
            continue;
        }
        let headers: Vec<String> = view
            .table
            .observation_headers
            .iter()
            .map(|h| format!("obs {} ({})", h.name, h.unit))
            .chain(
                view.table
                    .forecast_headers
                    .iter()
                    .map(|h| format!("fc {} ({})", h.name, h.unit)),
            )
            .collect();
        println!("{:<26} {}", "Time", headers.join(" | "));
        for row in &view.table.rows {
            let cells: Vec<&str> = row
                .observation_cells
                .iter()
                .chain(&row.forecast_cells)
                .map(String::as_str)
                .collect();
            println!("{:<26} {}", row.time, cells.join(" | "));
        }
    }
    Ok(())
}
