pub mod in_flight;
pub mod year_cache;
