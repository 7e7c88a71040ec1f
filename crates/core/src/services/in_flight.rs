use std::collections::HashMap;

/// The kinds of backend request the store issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    AvailableYears,
    ChartData,
    YearData,
    PrevMonthPaid,
    AddTransaction,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::AvailableYears => write!(f, "available-years"),
            OperationKind::ChartData => write!(f, "chart-data"),
            OperationKind::YearData => write!(f, "year-data"),
            OperationKind::PrevMonthPaid => write!(f, "prev-month-paid"),
            OperationKind::AddTransaction => write!(f, "add-transaction"),
        }
    }
}

/// Outstanding request counts, per operation kind.
///
/// Counting per kind means a fast request finishing cannot clear the
/// loading state of a slower, unrelated one.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    counts: HashMap<OperationKind, usize>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, kind: OperationKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Ending a kind with nothing outstanding is a no-op.
    pub fn end(&mut self, kind: OperationKind) {
        if let Some(count) = self.counts.get_mut(&kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&kind);
            }
        }
    }

    #[must_use]
    pub fn count(&self, kind: OperationKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_active(&self, kind: OperationKind) -> bool {
        self.count(kind) > 0
    }

    #[must_use]
    pub fn any(&self) -> bool {
        !self.counts.is_empty()
    }
}
