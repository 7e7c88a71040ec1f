use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::month::Month;

/// The (year, month) pair the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub year: i32,
    pub month: Month,
}

impl Selection {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The real-world current year and month, in local time.
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    /// The selection a given date falls into.
    pub fn containing(date: NaiveDate) -> Self {
        let month = Month::from_number(date.month()).unwrap_or(Month::January);
        Self::new(date.year(), month)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
