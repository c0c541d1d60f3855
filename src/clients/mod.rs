pub mod forecast_client;
pub mod observations_client;
