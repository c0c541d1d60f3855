pub mod audience;
pub mod forecast;
pub mod geo;
pub mod parameter_group;
pub mod parameters;
pub mod records;
pub mod station;
pub mod window;
