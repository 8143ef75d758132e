//! Core types for forecast lookups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Values keyed by timestamp, in ascending order.
///
/// Timestamps without a resolvable value are absent rather than null.
pub type ResultMap = BTreeMap<i64, f32>;

/// One grid file in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFile {
    /// Unix timestamp encoded in the file name.
    pub timestamp: i64,
    pub path: PathBuf,
}

/// A point query over a closed time range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub from_ts: i64,
    pub to_ts: i64,
    pub lat: f64,
    pub lon: f64,
}

impl ForecastQuery {
    /// Create a new query.
    pub fn new(from_ts: i64, to_ts: i64, lat: f64, lon: f64) -> Self {
        Self {
            from_ts,
            to_ts,
            lat,
            lon,
        }
    }

    /// True when the time range cannot contain any timestamp.
    pub fn is_empty_range(&self) -> bool {
        self.from_ts > self.to_ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_range() {
        assert!(!ForecastQuery::new(10, 10, 0.0, 0.0).is_empty_range());
        assert!(!ForecastQuery::new(10, 20, 0.0, 0.0).is_empty_range());
        assert!(ForecastQuery::new(20, 10, 0.0, 0.0).is_empty_range());
    }
}
