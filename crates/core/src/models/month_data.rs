use serde::{Deserialize, Serialize};

use super::month::Month;
use super::transaction::Transaction;

/// Everything the backend knows about one (year, month) pair.
///
/// `total_expense` and `balance` are computed by the backend and carried
/// through unchanged. The client never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub month: Month,

    /// Purchases in backend order
    pub purchases: Vec<Transaction>,

    /// Payments in backend order
    pub payments: Vec<Transaction>,

    /// Sum of purchases, as reported by the backend
    pub total_expense: f64,

    /// Amount owed at the end of the month, as reported by the backend
    pub balance: f64,
}

impl MonthData {
    /// An empty month with zero aggregates.
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            purchases: Vec::new(),
            payments: Vec::new(),
            total_expense: 0.0,
            balance: 0.0,
        }
    }

    /// Sum of the payment amounts in this month, for display.
    #[must_use]
    pub fn total_payments(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.purchases.len() + self.payments.len()
    }

    /// Purchases and payments merged, newest date first.
    /// Transactions on the same date keep purchases-then-payments order.
    #[must_use]
    pub fn transactions_newest_first(&self) -> Vec<&Transaction> {
        let mut all: Vec<&Transaction> = self.purchases.iter().chain(self.payments.iter()).collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all
    }
}

/// The four headline figures shown for the selected month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Backend balance for the month
    pub current_due: f64,
    /// Backend purchase total for the month
    pub total_spent: f64,
    /// Sum of the month's payments
    pub total_paid: f64,
    /// Payments made in the month before, as reported by the backend
    pub prev_month_paid: f64,
}

impl MonthSummary {
    pub fn new(month: Option<&MonthData>, prev_month_paid: f64) -> Self {
        match month {
            Some(m) => Self {
                current_due: m.balance,
                total_spent: m.total_expense,
                total_paid: m.total_payments(),
                prev_month_paid,
            },
            None => Self {
                prev_month_paid,
                ..Self::default()
            },
        }
    }

    /// True when something is still owed.
    #[must_use]
    pub fn has_amount_due(&self) -> bool {
        self.current_due > 0.0
    }
}
