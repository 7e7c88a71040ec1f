//! JSON shapes exchanged with the expense backend and their conversion
//! into the core models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::month::Month;
use crate::models::month_data::MonthData;
use crate::models::transaction::{NewTransaction, Transaction, TransactionKind};

/// Generic message when a rejected submission carries no `{error}`.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to add transaction";

/// Fallback confirmation when a successful submission carries no `{message}`.
pub const SUBMIT_OK_MESSAGE: &str = "Transaction added";

// ── Reads ───────────────────────────────────────────────────────────

/// One month document from `/api/monthly-data`.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthDocument {
    /// Plain string or a Mongo `{"$oid": "..."}` object
    #[serde(rename = "_id", default)]
    pub id: Value,

    pub month: Month,

    #[serde(default)]
    pub daily_expenses: Vec<EntryDocument>,

    #[serde(default)]
    pub credits: Vec<EntryDocument>,

    #[serde(default)]
    pub total_expense: f64,

    #[serde(default)]
    pub balance: f64,
}

/// A purchase or payment inside a month document. Entries carry no id.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDocument {
    pub amount: f64,

    #[serde(deserialize_with = "deserialize_entry_date")]
    pub date: NaiveDate,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrevMonthPaidResponse {
    #[serde(default)]
    pub prev_month_paid: Option<f64>,
}

impl PrevMonthPaidResponse {
    /// Missing or null totals count as nothing paid.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.prev_month_paid.unwrap_or(0.0)
    }
}

impl MonthDocument {
    /// The document id as a plain string.
    #[must_use]
    pub fn document_id(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("$oid")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| self.id.to_string()),
            Value::Null => self.month.name().to_lowercase(),
            other => other.to_string(),
        }
    }

    /// Convert into [`MonthData`], deriving transaction ids from the
    /// document id and each entry's position: `{id}-exp-{n}` for
    /// purchases, `{id}-pay-{n}` for payments.
    #[must_use]
    pub fn into_month_data(self) -> MonthData {
        let doc_id = self.document_id();

        let purchases = self
            .daily_expenses
            .into_iter()
            .enumerate()
            .map(|(idx, e)| e.into_transaction(format!("{doc_id}-exp-{idx}"), TransactionKind::Purchase))
            .collect();

        let payments = self
            .credits
            .into_iter()
            .enumerate()
            .map(|(idx, e)| e.into_transaction(format!("{doc_id}-pay-{idx}"), TransactionKind::Payment))
            .collect();

        MonthData {
            month: self.month,
            purchases,
            payments,
            total_expense: self.total_expense,
            balance: self.balance,
        }
    }
}

impl EntryDocument {
    fn into_transaction(self, id: String, kind: TransactionKind) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            description: self.description.filter(|d| !d.trim().is_empty()),
            kind,
        }
    }
}

/// Convert a whole `/api/monthly-data` response, keeping backend order.
#[must_use]
pub fn into_month_list(documents: Vec<MonthDocument>) -> Vec<MonthData> {
    documents.into_iter().map(MonthDocument::into_month_data).collect()
}

// ── Writes ──────────────────────────────────────────────────────────

/// Body of `POST /api/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPayload<'a> {
    /// Calendar date as "YYYY-MM-DD"
    pub date: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub amount: f64,

    /// Empty when the transaction has no description
    pub description: &'a str,
}

impl<'a> From<&'a NewTransaction> for TransactionPayload<'a> {
    fn from(t: &'a NewTransaction) -> Self {
        Self {
            date: t.date.format("%Y-%m-%d").to_string(),
            kind: t.kind,
            amount: t.amount,
            description: t.description.as_deref().unwrap_or(""),
        }
    }
}

/// Response of `POST /api/transactions`: `{message}` or `{error}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

// ── Dates ───────────────────────────────────────────────────────────

/// Parse an entry date as the backend may render it: plain
/// "YYYY-MM-DD", RFC 3339, a naive timestamp, or an RFC 2822 / HTTP date.
/// Only the calendar date is kept.
#[must_use]
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    None
}

fn deserialize_entry_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_entry_date(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized date '{raw}'")))
}
