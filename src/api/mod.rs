pub mod error;
pub mod geojson;
pub(crate) mod request;
