use serde::{Deserialize, Serialize};

/// Calendar month, serialized as its full English name ("January").
///
/// The backend keys month documents by this name, so the serde
/// representation must match it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month number, 1 = January.
    #[must_use]
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Month for a 1-based number, `None` outside 1..=12.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Month> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize).copied())
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Three-letter abbreviation used on chart axes ("Jan").
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

