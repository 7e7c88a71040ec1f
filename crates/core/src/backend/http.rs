use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::chart::ChartDataPoint;
use crate::models::month::Month;
use crate::models::month_data::MonthData;
use crate::models::settings::Settings;
use crate::models::transaction::NewTransaction;

use super::traits::ExpenseBackend;
use super::wire::{
    into_month_list, MonthDocument, PrevMonthPaidResponse, SubmitResponse, TransactionPayload,
    SUBMIT_FAILED_MESSAGE, SUBMIT_OK_MESSAGE,
};

/// REST client for the expense backend.
///
/// - `GET  /api/available-years`
/// - `GET  /api/chart-data?months=N`
/// - `GET  /api/monthly-data?year=Y`
/// - `GET  /api/prev-month-paid?month=M&year=Y`
/// - `POST /api/transactions`
///
/// All reads fail with [`CoreError::Api`] on a non-success status and
/// [`CoreError::Deserialization`] when the body has an unexpected shape.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let mut builder = Client::builder();
        if settings.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, CoreError> {
        let url = format!("{}{path_and_query}", self.base_url);
        debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                status: status.as_u16(),
                message: format!("Failed to fetch data: {}", reason(status)),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown status")
}

#[async_trait]
impl ExpenseBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn available_years(&self) -> Result<Vec<i32>, CoreError> {
        self.get_json("/api/available-years").await
    }

    async fn chart_data(&self, months: u32) -> Result<Vec<ChartDataPoint>, CoreError> {
        self.get_json(&format!("/api/chart-data?months={months}")).await
    }

    async fn monthly_data(&self, year: i32) -> Result<Vec<MonthData>, CoreError> {
        let documents: Vec<MonthDocument> = self
            .get_json(&format!("/api/monthly-data?year={year}"))
            .await?;
        Ok(into_month_list(documents))
    }

    async fn prev_month_paid(&self, month: Month, year: i32) -> Result<f64, CoreError> {
        let resp: PrevMonthPaidResponse = self
            .get_json(&format!("/api/prev-month-paid?month={month}&year={year}"))
            .await?;
        Ok(resp.amount())
    }

    async fn add_transaction(&self, transaction: &NewTransaction) -> Result<String, CoreError> {
        let url = format!("{}/api/transactions", self.base_url);
        let payload = TransactionPayload::from(transaction);
        debug!(%url, date = %payload.date, kind = %payload.kind, "POST");

        let resp = self.client.post(&url).json(&payload).send().await?;
        let status = resp.status();

        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            // Error bodies are not guaranteed to be JSON; fall back to the generic message.
            let parsed: SubmitResponse = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| SUBMIT_FAILED_MESSAGE.to_string());
            return Err(CoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SubmitResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .message
            .unwrap_or_else(|| SUBMIT_OK_MESSAGE.to_string()))
    }
}
