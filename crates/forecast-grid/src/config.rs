//! Configuration for the forecast lookup engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::gate::DEFAULT_MAX_OPEN_FILES;

/// Configuration for the forecast lookup engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Directory holding `<timestamp>.<ext>` grid files.
    pub data_dir: PathBuf,

    /// Only files with this extension are cataloged. `None` accepts any.
    pub file_extension: Option<String>,

    /// Maximum number of grid files open at the same time.
    pub max_open_files: usize,

    /// Decode every header at startup instead of on first query.
    pub warm_headers: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_extension: Some("wgf4".to_string()),
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            warm_headers: true,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FORECAST_DATA_DIR") {
            config.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("FORECAST_FILE_EXTENSION") {
            let val = val.trim().trim_start_matches('.');
            config.file_extension = match val {
                "" | "*" => None,
                ext => Some(ext.to_string()),
            };
        }

        if let Ok(val) = std::env::var("FORECAST_MAX_OPEN_FILES") {
            if let Ok(n) = val.parse() {
                config.max_open_files = n;
            }
        }

        if let Ok(val) = std::env::var("FORECAST_WARM_HEADERS") {
            config.warm_headers = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_open_files == 0 {
            return Err("max_open_files must be > 0".to_string());
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if let Some(ext) = &self.file_extension {
            if ext.is_empty() || ext.contains('.') {
                return Err(format!("invalid file_extension: {:?}", ext));
            }
        }

        Ok(())
    }
}
