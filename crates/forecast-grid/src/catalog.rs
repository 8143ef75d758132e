//! Timestamp index over a directory of grid files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{GridError, Result};
use crate::types::GridFile;

/// Sorted, read-only index of timestamp → grid file path.
///
/// Built once at startup; there are no insert or remove operations.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    timestamps: Vec<i64>,
    paths: HashMap<i64, PathBuf>,
}

/// Extract the timestamp from a file name such as `1688400200.wgf4`.
///
/// The timestamp is the part of the name before the first `.`.
pub fn parse_timestamp(file_name: &str) -> Option<i64> {
    file_name.split('.').next()?.parse().ok()
}

impl FileCatalog {
    /// Scan `dir` and catalog every regular file whose name encodes a
    /// timestamp.
    ///
    /// When `extension` is set, only files with that extension are
    /// considered. Names that do not parse are skipped.
    pub fn scan(dir: impl AsRef<Path>, extension: Option<&str>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            GridError::catalog(format!("failed to read data directory {}: {}", dir.display(), e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                GridError::catalog(format!("failed to list {}: {}", dir.display(), e))
            })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }

        let catalog = Self::from_paths(paths, extension);
        info!(
            dir = %dir.display(),
            files = catalog.len(),
            first = ?catalog.first(),
            last = ?catalog.last(),
            "grid catalog built"
        );
        Ok(catalog)
    }

    /// Build a catalog from an explicit list of file paths.
    ///
    /// If two paths map to the same timestamp, the lexicographically first
    /// one is kept.
    pub fn from_paths<I>(paths: I, extension: Option<&str>) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().collect();
        paths.sort();

        let mut by_timestamp: HashMap<i64, PathBuf> = HashMap::new();
        for path in paths {
            if let Some(ext) = extension {
                if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                    continue;
                }
            }

            let Some(timestamp) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_timestamp)
            else {
                debug!(path = %path.display(), "skipping file without timestamp name");
                continue;
            };

            if let Some(existing) = by_timestamp.get(&timestamp) {
                warn!(
                    timestamp,
                    kept = %existing.display(),
                    skipped = %path.display(),
                    "duplicate timestamp in data directory"
                );
                continue;
            }
            by_timestamp.insert(timestamp, path);
        }

        let mut timestamps: Vec<i64> = by_timestamp.keys().copied().collect();
        timestamps.sort_unstable();

        Self {
            timestamps,
            paths: by_timestamp,
        }
    }

    /// All cataloged timestamps, ascending and distinct.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Path of the file for `timestamp`.
    pub fn path_of(&self, timestamp: i64) -> Option<&Path> {
        self.paths.get(&timestamp).map(PathBuf::as_path)
    }

    /// Index of the leftmost timestamp `>= from_ts`, or `None` if every
    /// timestamp is smaller.
    pub fn first_at_or_after(&self, from_ts: i64) -> Option<usize> {
        let idx = self.timestamps.partition_point(|&ts| ts < from_ts);
        (idx < self.timestamps.len()).then_some(idx)
    }

    /// Timestamps in the closed range `[from_ts, to_ts]`.
    pub fn range(&self, from_ts: i64, to_ts: i64) -> &[i64] {
        if from_ts > to_ts {
            return &[];
        }
        let Some(start) = self.first_at_or_after(from_ts) else {
            return &[];
        };
        let end = self.timestamps.partition_point(|&ts| ts <= to_ts);
        &self.timestamps[start..end.max(start)]
    }

    /// Iterate over the cataloged files in timestamp order.
    pub fn files(&self) -> impl Iterator<Item = GridFile> + '_ {
        self.timestamps.iter().filter_map(|&timestamp| {
            self.paths.get(&timestamp).map(|path| GridFile {
                timestamp,
                path: path.clone(),
            })
        })
    }

    /// Earliest timestamp.
    pub fn first(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    /// Latest timestamp.
    pub fn last(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    /// Number of cataloged files.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
