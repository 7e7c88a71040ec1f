use std::collections::HashMap;

use crate::models::month::Month;
use crate::models::month_data::MonthData;

/// Lifecycle of one year's cache entry.
///
/// `absent → Loading → {Loaded | Failed}`, and back to `Loading` only
/// through an explicit re-fetch. Nothing expires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// A fetch is outstanding. Months from an earlier fetch stay visible.
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed; the entry holds no months
    Failed,
}

/// Cached months of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearEntry {
    pub status: EntryStatus,
    pub months: Vec<MonthData>,
}

/// Read-through cache of month data, keyed by year.
///
/// Key presence is what matters: a year that failed to load is present
/// with no months, so it is not fetched again until someone asks for it
/// explicitly. Results replace the entry, they never merge into it.
#[derive(Debug, Clone, Default)]
pub struct YearCache {
    entries: HashMap<i32, YearEntry>,
}

impl YearCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a year has been requested, whatever the outcome.
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.entries.contains_key(&year)
    }

    #[must_use]
    pub fn status(&self, year: i32) -> Option<EntryStatus> {
        self.entries.get(&year).map(|e| e.status)
    }

    #[must_use]
    pub fn entry(&self, year: i32) -> Option<&YearEntry> {
        self.entries.get(&year)
    }

    /// Claim an absent year for loading. Returns `false` (and changes
    /// nothing) when the year is already present in any state.
    pub fn claim(&mut self, year: i32) -> bool {
        if self.contains(year) {
            return false;
        }
        self.mark_loading(year);
        true
    }

    /// Put a year into `Loading`, keeping any months already held.
    pub fn mark_loading(&mut self, year: i32) {
        self.entries
            .entry(year)
            .and_modify(|e| e.status = EntryStatus::Loading)
            .or_insert_with(|| YearEntry {
                status: EntryStatus::Loading,
                months: Vec::new(),
            });
    }

    /// Replace a year's months with a fresh fetch result.
    pub fn store(&mut self, year: i32, months: Vec<MonthData>) {
        self.entries.insert(
            year,
            YearEntry {
                status: EntryStatus::Loaded,
                months,
            },
        );
    }

    /// Record a failed fetch: the year becomes present and empty.
    pub fn store_failed(&mut self, year: i32) {
        self.entries.insert(
            year,
            YearEntry {
                status: EntryStatus::Failed,
                months: Vec::new(),
            },
        );
    }

    /// Months held for a year, `None` if the year was never requested.
    #[must_use]
    pub fn months(&self, year: i32) -> Option<&[MonthData]> {
        self.entries.get(&year).map(|e| e.months.as_slice())
    }

    #[must_use]
    pub fn month(&self, year: i32, month: Month) -> Option<&MonthData> {
        self.months(year)?.iter().find(|m| m.month == month)
    }

    /// Cached years, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries.keys().copied().collect();
        years.sort_unstable();
        years
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
