pub mod chart;
pub mod marker;
pub mod merge;
pub mod table;
pub mod time_format;
