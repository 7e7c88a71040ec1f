pub mod backend;
pub mod errors;
pub mod models;
pub mod services;

use chrono::Datelike;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use backend::http::HttpBackend;
use backend::traits::ExpenseBackend;
use errors::CoreError;
use models::{
    chart::ChartDataPoint,
    month::Month,
    month_data::{MonthData, MonthSummary},
    selection::Selection,
    settings::Settings,
    transaction::{NewTransaction, Transaction},
};
use services::{
    in_flight::{InFlight, OperationKind},
    year_cache::{EntryStatus, YearCache},
};

/// Default length of the rolling chart window, in months.
const DEFAULT_CHART_MONTHS: u32 = 10;

/// Main entry point for the Expense Tracker core library.
///
/// Holds the selected year/month, a per-year cache of month data, the
/// rolling chart series and the list of available years, and keeps them
/// in sync with the backend. Every state change goes through one of the
/// named commands below; getters return snapshots and never touch the
/// network.
///
/// Commands take `&self`, so several can run at once (e.g. under
/// `tokio::join!`). Each one writes its own slice of state: a year's cache
/// entry, the chart series, or the previous-month figure. The internal
/// lock is never held across an `.await`.
#[must_use]
pub struct ExpenseStore {
    backend: Box<dyn ExpenseBackend>,
    chart_months: u32,
    state: Mutex<StoreState>,
}

#[derive(Debug)]
struct StoreState {
    cache: YearCache,
    chart: Vec<ChartDataPoint>,
    available_years: Vec<i32>,
    selection: Selection,
    prev_month_paid: f64,
    in_flight: InFlight,
    last_error: Option<String>,
    initialized: bool,
}

impl std::fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ExpenseStore")
            .field("backend", &self.backend.name())
            .field("selection", &state.selection)
            .field("cached_years", &state.cache.years())
            .field("chart_points", &state.chart.len())
            .field("loading", &state.in_flight.any())
            .field("last_error", &state.last_error)
            .finish()
    }
}

/// Marks one request of `kind` as outstanding for as long as it lives.
/// Dropping it (including when the owning future is dropped) ends it.
struct InFlightGuard<'a> {
    state: &'a Mutex<StoreState>,
    kind: OperationKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).in_flight.end(self.kind);
    }
}

fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    // No invariant spans a panic point, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ExpenseStore {
    /// Create a store selecting the real-world current year and month.
    pub fn new(backend: impl ExpenseBackend + 'static) -> Self {
        Self::with_selection(backend, Selection::current())
    }

    /// Create a store starting at a specific selection.
    pub fn with_selection(backend: impl ExpenseBackend + 'static, selection: Selection) -> Self {
        Self {
            backend: Box::new(backend),
            chart_months: DEFAULT_CHART_MONTHS,
            state: Mutex::new(StoreState {
                cache: YearCache::new(),
                chart: Vec::new(),
                available_years: vec![selection.year],
                selection,
                prev_month_paid: 0.0,
                in_flight: InFlight::new(),
                last_error: None,
                initialized: false,
            }),
        }
    }

    /// Create a store talking to the REST backend described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let backend = HttpBackend::new(settings)?;
        Ok(Self::new(backend).with_chart_months(settings.chart_months))
    }

    /// Override the rolling chart window (default 10 months).
    pub fn with_chart_months(mut self, months: u32) -> Self {
        self.chart_months = months;
        self
    }

    // ── Commands ────────────────────────────────────────────────────

    /// First activation: requests available years and the chart series
    /// concurrently, and loads the selected year and its previous-month
    /// figure. Every failure here is soft. Later calls do nothing; use
    /// [`reload_overview`](Self::reload_overview) to retry.
    pub async fn initialize(&self) {
        {
            let mut state = self.lock();
            if state.initialized {
                debug!("store already initialized");
                return;
            }
            state.initialized = true;
        }

        tokio::join!(self.reload_overview(), self.sync_selection());
    }

    /// Re-request available years and the chart series.
    ///
    /// Years fall back to the current and next calendar year, and the
    /// chart to an empty series, when the backend cannot be reached.
    pub async fn reload_overview(&self) {
        tokio::join!(self.load_available_years(), self.load_chart());
    }

    /// Change the selected year. Fetches the year if it was never
    /// requested before, and refreshes the previous-month figure.
    /// Re-selecting the current year only loads it if still uncached.
    pub async fn select_year(&self, year: i32) {
        let unchanged = {
            let mut state = self.lock();
            let unchanged = state.selection.year == year;
            state.selection.year = year;
            unchanged
        };
        if unchanged {
            self.ensure_year_loaded(year).await;
            return;
        }
        debug!(year, "year selected");

        tokio::join!(self.ensure_year_loaded(year), self.refresh_prev_month_paid());
    }

    /// Change the selected month. Only the previous-month figure is
    /// re-requested; month data comes from the year cache.
    pub async fn select_month(&self, month: Month) {
        {
            let mut state = self.lock();
            if state.selection.month == month {
                return;
            }
            state.selection.month = month;
        }
        debug!(%month, "month selected");

        self.refresh_prev_month_paid().await;
    }

    /// Fetch `year` unconditionally, replacing whatever the cache holds.
    ///
    /// On failure the error is recorded in [`last_error`](Self::last_error)
    /// and the year is cached as empty, so it is not fetched again until
    /// the next explicit re-fetch.
    pub async fn fetch_year_data(&self, year: i32) {
        self.lock().cache.mark_loading(year);
        self.load_year(year).await;
    }

    /// Public re-fetch trigger for a year, e.g. to retry after a failure.
    pub async fn refetch_year(&self, year: i32) {
        self.fetch_year_data(year).await;
    }

    /// Re-request the payments made in the month before the current
    /// selection. Failures reset the figure to zero. A response is only
    /// applied if the selection has not moved on since it was requested.
    pub async fn refresh_prev_month_paid(&self) {
        let requested = self.lock().selection;
        let _guard = self.track(OperationKind::PrevMonthPaid);

        let amount = match self
            .backend
            .prev_month_paid(requested.month, requested.year)
            .await
        {
            Ok(amount) => amount,
            Err(e) => {
                warn!(selection = %requested, error = %e, "failed to fetch previous month paid");
                0.0
            }
        };

        let mut state = self.lock();
        if state.selection == requested {
            state.prev_month_paid = amount;
        } else {
            debug!(selection = %requested, "discarding previous month paid for stale selection");
        }
    }

    /// Submit a new transaction.
    ///
    /// On success the transaction's year and the chart series are
    /// re-fetched (aggregates always come from the backend), and the
    /// selection switches to that year if it differs. Returns the
    /// backend's confirmation message.
    ///
    /// On failure the backend's error message is recorded and returned,
    /// and nothing else changes, so the caller can keep its input and retry.
    pub async fn add_transaction(&self, transaction: NewTransaction) -> Result<String, CoreError> {
        let _guard = self.track(OperationKind::AddTransaction);
        self.lock().last_error = None;

        let message = match self.submit(&transaction).await {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, date = %transaction.date, "failed to add transaction");
                self.lock().last_error = Some(e.to_string());
                return Err(e);
            }
        };
        info!(%message, date = %transaction.date, kind = %transaction.kind, "transaction added");

        let year = transaction.date.year();
        self.fetch_year_data(year).await;
        self.load_chart().await;

        let switched = {
            let mut state = self.lock();
            if state.selection.year == year {
                false
            } else {
                state.selection.year = year;
                true
            }
        };
        if switched {
            debug!(year, "switched selection to the transaction's year");
            self.refresh_prev_month_paid().await;
        }

        Ok(message)
    }

    /// Clear the recorded error, e.g. after the user dismissed it.
    pub fn dismiss_error(&self) {
        self.lock().last_error = None;
    }

    // ── Getters ─────────────────────────────────────────────────────

    pub fn selection(&self) -> Selection {
        self.lock().selection
    }

    pub fn selected_year(&self) -> i32 {
        self.lock().selection.year
    }

    pub fn selected_month(&self) -> Month {
        self.lock().selection.month
    }

    /// The twelve months in calendar order, for month pickers.
    pub fn months(&self) -> &'static [Month] {
        &Month::ALL
    }

    /// Data for the selected (year, month), if the cache holds it.
    pub fn current_month_data(&self) -> Option<MonthData> {
        let state = self.lock();
        state
            .cache
            .month(state.selection.year, state.selection.month)
            .cloned()
    }

    /// All cached months of the selected year; empty when not loaded.
    pub fn yearly_data(&self) -> Vec<MonthData> {
        let state = self.lock();
        state
            .cache
            .months(state.selection.year)
            .map(<[MonthData]>::to_vec)
            .unwrap_or_default()
    }

    /// All cached months of any year, `None` if it was never requested.
    pub fn year_data(&self, year: i32) -> Option<Vec<MonthData>> {
        self.lock().cache.months(year).map(<[MonthData]>::to_vec)
    }

    pub fn year_status(&self, year: i32) -> Option<EntryStatus> {
        self.lock().cache.status(year)
    }

    /// Years present in the cache, ascending.
    pub fn cached_years(&self) -> Vec<i32> {
        self.lock().cache.years()
    }

    pub fn chart_data(&self) -> Vec<ChartDataPoint> {
        self.lock().chart.clone()
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.lock().available_years.clone()
    }

    pub fn prev_month_paid(&self) -> f64 {
        self.lock().prev_month_paid
    }

    /// Headline figures for the selected month.
    pub fn summary(&self) -> MonthSummary {
        let state = self.lock();
        let month = state.cache.month(state.selection.year, state.selection.month);
        MonthSummary::new(month, state.prev_month_paid)
    }

    /// The selected month's purchases and payments, newest first.
    pub fn current_transactions(&self) -> Vec<Transaction> {
        let state = self.lock();
        state
            .cache
            .month(state.selection.year, state.selection.month)
            .map(|m| m.transactions_newest_first().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// True while any request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight.any()
    }

    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.lock().in_flight.is_active(kind)
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    // ── Internal ────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.state)
    }

    fn track(&self, kind: OperationKind) -> InFlightGuard<'_> {
        self.lock().in_flight.begin(kind);
        InFlightGuard {
            state: &self.state,
            kind,
        }
    }

    async fn submit(&self, transaction: &NewTransaction) -> Result<String, CoreError> {
        transaction.validate()?;
        self.backend.add_transaction(transaction).await
    }

    /// Load the selected year if it is absent, and refresh the
    /// previous-month figure.
    async fn sync_selection(&self) {
        let year = self.lock().selection.year;
        tokio::join!(self.ensure_year_loaded(year), self.refresh_prev_month_paid());
    }

    /// Fetch `year` only if it was never requested. Claiming happens under
    /// the lock, so concurrent callers issue at most one fetch.
    async fn ensure_year_loaded(&self, year: i32) {
        let claimed = self.lock().cache.claim(year);
        if claimed {
            self.load_year(year).await;
        } else {
            debug!(year, "year already cached");
        }
    }

    async fn load_year(&self, year: i32) {
        let _guard = self.track(OperationKind::YearData);
        self.lock().last_error = None;

        match self.backend.monthly_data(year).await {
            Ok(months) => {
                debug!(year, months = months.len(), "year data loaded");
                self.lock().cache.store(year, months);
            }
            Err(e) => {
                error!(year, error = %e, "failed to fetch year data");
                let mut state = self.lock();
                state.last_error = Some(e.to_string());
                state.cache.store_failed(year);
            }
        }
    }

    async fn load_available_years(&self) {
        let _guard = self.track(OperationKind::AvailableYears);

        let years = match self.backend.available_years().await {
            Ok(years) => years,
            Err(e) => {
                let current = chrono::Local::now().year();
                warn!(error = %e, "failed to fetch available years, falling back to {current} and {}", current + 1);
                vec![current, current + 1]
            }
        };

        self.lock().available_years = years;
    }

    async fn load_chart(&self) {
        let _guard = self.track(OperationKind::ChartData);

        let chart = match self.backend.chart_data(self.chart_months).await {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "failed to fetch chart data");
                Vec::new()
            }
        };

        self.lock().chart = chart;
    }
}
