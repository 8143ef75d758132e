//! Application state for the forecast API.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use forecast_grid::{ForecastConfig, ForecastQueryEngine};

/// Shared application state.
pub struct AppState {
    /// Query engine over the startup catalog.
    pub engine: ForecastQueryEngine,

    /// Configuration the engine was built from.
    pub config: ForecastConfig,

    /// Renders the Prometheus exposition for `/metrics`.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Scan the data directory and, if configured, preload all headers.
    pub async fn new(config: ForecastConfig) -> Result<Self> {
        let engine = ForecastQueryEngine::from_config(&config).with_context(|| {
            format!("failed to open data directory {}", config.data_dir.display())
        })?;

        info!(
            data_dir = %config.data_dir.display(),
            files = engine.catalog().len(),
            max_open_files = config.max_open_files,
            "catalog loaded"
        );

        if config.warm_headers {
            engine.warm_headers().await;
        }

        Ok(Self {
            engine,
            config,
            prometheus: None,
        })
    }

    /// Attach the handle of an installed Prometheus recorder.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_utils::{create_test_grid, forecast_dir, grid, time};

    #[tokio::test]
    async fn test_state_warms_headers() {
        let dir = forecast_dir(&grid::TINY_3X3, &time::HOURLY, |_| create_test_grid(3, 3)).unwrap();
        let config = ForecastConfig {
            data_dir: dir.path().to_path_buf(),
            ..ForecastConfig::default()
        };

        let state = AppState::new(config).await.unwrap();
        assert_eq!(state.engine.catalog().len(), time::HOURLY.len());
        assert_eq!(state.engine.header_cache().len().await, time::HOURLY.len());
        assert!(state.prometheus.is_none());
    }

    #[tokio::test]
    async fn test_state_skips_warming_when_disabled() {
        let dir = forecast_dir(&grid::TINY_3X3, &time::HOURLY, |_| create_test_grid(3, 3)).unwrap();
        let config = ForecastConfig {
            data_dir: dir.path().to_path_buf(),
            warm_headers: false,
            ..ForecastConfig::default()
        };

        let state = AppState::new(config).await.unwrap();
        assert!(state.engine.header_cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_state_fails_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = ForecastConfig {
            data_dir: dir.path().join("missing"),
            ..ForecastConfig::default()
        };

        let err = AppState::new(config).await.err().unwrap();
        assert!(err.to_string().contains("failed to open data directory"));
    }
}
