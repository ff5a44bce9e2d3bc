use crate::error::{EarningsError, Result};
use crate::line_items::{
    bank_metrics, filter_line_items, filter_options, historical_data, parse_line_items,
    FilterOptions, HistoricalValue, LineItem, LineItemFilter,
};
use crate::source::{CsvSource, LoaderConfig};
use chrono::{DateTime, Utc};
use futures::lock::Mutex as AsyncMutex;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Snapshot of the store's lifecycle for a presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatus {
    pub is_loading: bool,
    pub is_loaded: bool,
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct StoreState {
    is_loading: bool,
    error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    /// Finished fetch attempts, successful or not.
    attempts: u64,
}

/// Memoizing line-item cache over a [`CsvSource`].
///
/// The cache lock is held for the whole fetch, so a caller arriving while a
/// load is in flight parks until it finishes and then observes its outcome
/// instead of fetching again. The cached list is swapped in whole, never
/// built up in place.
pub struct LineItemStore<S> {
    source: S,
    config: LoaderConfig,
    cache: AsyncMutex<Option<Arc<Vec<LineItem>>>>,
    state: Mutex<StoreState>,
}

impl<S: CsvSource> LineItemStore<S> {
    pub fn new(source: S, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            cache: AsyncMutex::new(None),
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Loads the line items, fetching at most once until the cache is
    /// cleared. A failed fetch yields an empty list and records its message,
    /// readable through [`error`](Self::error).
    pub async fn load(&self) -> Arc<Vec<LineItem>> {
        self.try_load()
            .await
            .unwrap_or_else(|_| Arc::new(Vec::new()))
    }

    pub async fn try_load(&self) -> Result<Arc<Vec<LineItem>>> {
        let attempts_seen = self.state().attempts;
        let mut cache = self.cache.lock().await;

        if let Some(items) = cache.as_ref() {
            return Ok(Arc::clone(items));
        }

        if let Some(message) = self.failure_since(attempts_seen) {
            return Err(EarningsError::FetchFailed(message));
        }

        {
            let mut state = self.state();
            state.is_loading = true;
            state.error = None;
        }

        info!("Fetching line items for {}", self.config.bank_code);
        let fetched = self.source.fetch_csv().await;

        let mut state = self.state();
        state.is_loading = false;
        state.attempts += 1;

        match fetched {
            Ok(text) => {
                let items = Arc::new(parse_line_items(&text, &self.config.bank_code));
                info!("Loaded {} line items", items.len());
                state.loaded_at = Some(Utc::now());
                *cache = Some(Arc::clone(&items));
                Ok(items)
            }
            Err(e) => {
                warn!("Line-item load failed: {}", e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Error left by a load that finished after `attempts_seen` was read.
    /// A successful load emptied by `clear_cache` leaves none, so the caller
    /// fetches again.
    fn failure_since(&self, attempts_seen: u64) -> Option<String> {
        let state = self.state();
        if state.attempts == attempts_seen {
            return None;
        }
        state.error.clone()
    }

    /// Message of the last failed load, cleared when a new load starts.
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub async fn status(&self) -> LoadStatus {
        let is_loaded = self.cache.lock().await.is_some();
        let state = self.state();
        LoadStatus {
            is_loading: state.is_loading,
            is_loaded,
            error: state.error.clone(),
            loaded_at: state.loaded_at,
        }
    }

    /// Forgets the cached items and any recorded error. Waits for an
    /// in-flight load to finish first.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
        let mut state = self.state();
        state.error = None;
        state.loaded_at = None;
        info!("Line-item cache cleared");
    }

    pub async fn filter(&self, filter: &LineItemFilter) -> Vec<LineItem> {
        let items = self.load().await;
        filter_line_items(&items, filter).into_iter().cloned().collect()
    }

    pub async fn historical_data<I: AsRef<str>>(
        &self,
        bank: &str,
        ids: &[I],
    ) -> BTreeMap<String, Vec<HistoricalValue>> {
        let items = self.load().await;
        historical_data(&items, bank, ids, self.config.reporting_year)
    }

    pub async fn filter_options(&self) -> FilterOptions {
        let items = self.load().await;
        filter_options(&items)
    }

    pub async fn bank_metrics<B: AsRef<str>, M: AsRef<str>>(
        &self,
        banks: &[B],
        metric_ids: &[M],
    ) -> BTreeMap<String, BTreeMap<String, f64>> {
        let items = self.load().await;
        bank_metrics(&items, banks, metric_ids)
    }
}
