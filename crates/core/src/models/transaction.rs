use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Kind of transaction against the tracked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// An expense, increases the amount owed
    Purchase,
    /// A credit toward the balance, decreases the amount owed
    Payment,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Purchase => write!(f, "purchase"),
            TransactionKind::Payment => write!(f, "payment"),
        }
    }
}

/// A single purchase or payment as returned by the backend.
///
/// Transactions are immutable: the client only ever appends new ones
/// through [`NewTransaction`] and re-reads the month afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within its month document (e.g. "65f0c1-exp-0")
    pub id: String,

    /// Calendar date, no time component
    pub date: NaiveDate,

    /// Always positive; the kind decides the direction
    pub amount: f64,

    #[serde(default)]
    pub description: Option<String>,

    pub kind: TransactionKind,
}

/// Input for a transaction that has not been submitted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            date,
            description: None,
        }
    }

    pub fn purchase(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Purchase, amount, date)
    }

    pub fn payment(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Payment, amount, date)
    }

    /// Attach a description. Blank text is treated as no description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// The amount must be a finite, positive number. Nothing else is checked.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a positive number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}
