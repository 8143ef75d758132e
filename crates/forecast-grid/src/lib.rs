//! WGF4 grid file decoding and time-indexed point lookups.
//!
//! A data directory holds one binary grid file per timestamp
//! (`<unix_timestamp>.wgf4`). This crate catalogs those files, decodes
//! their headers, and answers "what is the value at (lat, lon) for every
//! timestamp in `[from_ts, to_ts]`" queries.
//!
//! # Architecture
//!
//! ```text
//! ForecastQueryEngine::query(from_ts, to_ts, lat, lon)
//!      │
//!      ├─► FileCatalog::first_at_or_after(from_ts)   (binary search)
//!      │
//!      ├─► for each timestamp <= to_ts (concurrently)
//!      │         │
//!      │         ├─► HeaderCache::get_header(path)
//!      │         │         └─► miss: GridDecoder::decode_header
//!      │         │
//!      │         └─► GridDecoder::lookup_value(path, header, lat, lon)
//!      │                   └─► ConcurrencyGate permit held while reading
//!      │
//!      └─► merge into BTreeMap<timestamp, value>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use forecast_grid::{ForecastConfig, ForecastQueryEngine};
//!
//! let config = ForecastConfig::from_env();
//! let engine = ForecastQueryEngine::from_config(&config)?;
//!
//! let values = engine.query(1688400200, 1688504400, 52.52, 13.408).await;
//! for (ts, value) in &values {
//!     println!("{ts}: {value}");
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod gate;
pub mod header;
pub mod types;

// Re-export commonly used types at crate root
pub use cache::{HeaderCache, HeaderCacheStats};
pub use catalog::{parse_timestamp, FileCatalog};
pub use config::ForecastConfig;
pub use decoder::GridDecoder;
pub use engine::ForecastQueryEngine;
pub use error::{GridError, Result};
pub use gate::{ConcurrencyGate, GatePermit, DEFAULT_MAX_OPEN_FILES};
pub use header::{GridHeader, HEADER_SIZE, VALUE_SIZE};
pub use types::{ForecastQuery, GridFile, ResultMap};
