use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::chart::ChartDataPoint;
use crate::models::month::Month;
use crate::models::month_data::MonthData;
use crate::models::transaction::NewTransaction;

/// Everything the store needs from the expense backend.
///
/// [`HttpBackend`](super::http::HttpBackend) talks to the REST API; tests
/// plug in in-memory implementations. The backend is the source of truth
/// for every aggregate: implementations return totals and balances as
/// computed remotely and never derive them.
#[async_trait]
pub trait ExpenseBackend: Send + Sync {
    /// Human-readable name of this backend (for logs).
    fn name(&self) -> &str;

    /// Years for which the backend holds data.
    async fn available_years(&self) -> Result<Vec<i32>, CoreError>;

    /// Rolling chart series covering the last `months` months.
    async fn chart_data(&self, months: u32) -> Result<Vec<ChartDataPoint>, CoreError>;

    /// Every month document of `year`, in backend order.
    async fn monthly_data(&self, year: i32) -> Result<Vec<MonthData>, CoreError>;

    /// Total payments made in the month before (`month`, `year`).
    async fn prev_month_paid(&self, month: Month, year: i32) -> Result<f64, CoreError>;

    /// Create one transaction. Returns the backend's confirmation message.
    async fn add_transaction(&self, transaction: &NewTransaction) -> Result<String, CoreError>;
}

/// Lets callers keep a handle on a backend they hand to the store.
#[async_trait]
impl<T: ExpenseBackend + ?Sized> ExpenseBackend for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn available_years(&self) -> Result<Vec<i32>, CoreError> {
        (**self).available_years().await
    }

    async fn chart_data(&self, months: u32) -> Result<Vec<ChartDataPoint>, CoreError> {
        (**self).chart_data(months).await
    }

    async fn monthly_data(&self, year: i32) -> Result<Vec<MonthData>, CoreError> {
        (**self).monthly_data(year).await
    }

    async fn prev_month_paid(&self, month: Month, year: i32) -> Result<f64, CoreError> {
        (**self).prev_month_paid(month, year).await
    }

    async fn add_transaction(&self, transaction: &NewTransaction) -> Result<String, CoreError> {
        (**self).add_transaction(transaction).await
    }
}
