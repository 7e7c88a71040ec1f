pub mod chart;
pub mod month;
pub mod month_data;
pub mod selection;
pub mod settings;
pub mod transaction;
