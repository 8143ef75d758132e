//! Time-range point queries over the grid catalog.

use std::sync::Arc;

use futures::future::join_all;
use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::cache::HeaderCache;
use crate::catalog::FileCatalog;
use crate::config::ForecastConfig;
use crate::decoder::GridDecoder;
use crate::error::{GridError, Result};
use crate::gate::ConcurrencyGate;
use crate::types::{ForecastQuery, ResultMap};

/// Answers "value at (lat, lon) for every timestamp in `[from_ts, to_ts]`".
///
/// The engine holds no per-query state; the catalog and header cache are
/// shared collaborators and may be used by other engines or handlers.
#[derive(Clone)]
pub struct ForecastQueryEngine {
    catalog: Arc<FileCatalog>,
    headers: Arc<HeaderCache>,
}

impl ForecastQueryEngine {
    /// Create an engine over an existing catalog and header cache.
    pub fn new(catalog: Arc<FileCatalog>, headers: Arc<HeaderCache>) -> Self {
        Self { catalog, headers }
    }

    /// Scan the configured data directory and wire up the gate, decoder
    /// and header cache.
    ///
    /// Headers are not decoded here; call [`warm_headers`](Self::warm_headers)
    /// to preload them.
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate().map_err(GridError::Config)?;

        let catalog = FileCatalog::scan(&config.data_dir, config.file_extension.as_deref())?;
        let gate = ConcurrencyGate::new(config.max_open_files);
        let headers = HeaderCache::new(GridDecoder::new(gate));

        Ok(Self::new(Arc::new(catalog), Arc::new(headers)))
    }

    /// Decode the header of every cataloged file. Returns how many
    /// headers were loaded.
    pub async fn warm_headers(&self) -> usize {
        self.headers
            .warm(self.catalog.files().map(|file| file.path))
            .await
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn header_cache(&self) -> &HeaderCache {
        &self.headers
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        self.headers.decoder().gate()
    }

    /// Run a [`ForecastQuery`].
    pub async fn query_request(&self, request: &ForecastQuery) -> ResultMap {
        self.query(request.from_ts, request.to_ts, request.lat, request.lon)
            .await
    }

    /// Look up the value at `(lat, lon)` for every cataloged timestamp in
    /// `[from_ts, to_ts]`.
    ///
    /// Lookups for different timestamps run concurrently, bounded by the
    /// shared gate. A timestamp whose file fails to decode or read is
    /// logged and left out; the query itself never fails.
    #[instrument(skip(self))]
    pub async fn query(&self, from_ts: i64, to_ts: i64, lat: f64, lon: f64) -> ResultMap {
        counter!("forecast_queries_total").increment(1);

        let mut values = ResultMap::new();
        let Some(start) = self.catalog.first_at_or_after(from_ts) else {
            return values;
        };

        let lookups = self.catalog.timestamps()[start..]
            .iter()
            .copied()
            .take_while(|&ts| ts <= to_ts)
            .map(|ts| async move { (ts, self.lookup(ts, lat, lon).await) });

        let results = join_all(lookups).await;
        let candidates = results.len();

        for (ts, result) in results {
            match result {
                Ok(Some(value)) => {
                    values.insert(ts, value);
                }
                Ok(None) => {}
                Err(e) => {
                    counter!("forecast_lookup_failures_total").increment(1);
                    warn!(timestamp = ts, error = %e, "dropping timestamp from result");
                }
            }
        }

        counter!("forecast_values_returned_total").increment(values.len() as u64);
        debug!(candidates, returned = values.len(), "forecast query complete");
        values
    }

    async fn lookup(&self, ts: i64, lat: f64, lon: f64) -> Result<Option<f32>> {
        let Some(path) = self.catalog.path_of(ts) else {
            return Ok(None);
        };
        let header = self.headers.get_header(path).await?;
        self.headers
            .decoder()
            .lookup_value(path, &header, lat, lon)
            .await
    }
}
