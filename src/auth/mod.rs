pub mod endpoint;
pub mod error;
pub mod token_provider;
