//! Memoized grid headers keyed by file path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use metrics::counter;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::decoder::GridDecoder;
use crate::error::Result;
use crate::header::GridHeader;

/// Statistics for the header cache.
#[derive(Debug, Clone, Default)]
pub struct HeaderCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl HeaderCacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Decoded headers, populated on first access and never evicted.
///
/// Two concurrent misses on the same path may both decode the file; the
/// lock is never held across file I/O and both produce the same header.
pub struct HeaderCache {
    decoder: GridDecoder,
    entries: RwLock<HashMap<PathBuf, GridHeader>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HeaderCache {
    /// Create an empty cache that decodes misses with `decoder`.
    pub fn new(decoder: GridDecoder) -> Self {
        Self {
            decoder,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The decoder used for cache misses.
    pub fn decoder(&self) -> &GridDecoder {
        &self.decoder
    }

    /// Get the header of `path`, decoding and storing it on a miss.
    ///
    /// Decode errors are returned as-is and nothing is cached, so a later
    /// call will try the file again.
    pub async fn get_header(&self, path: &Path) -> Result<GridHeader> {
        if let Some(header) = self.entries.read().await.get(path) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            counter!("header_cache_hits_total").increment(1);
            return Ok(*header);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("header_cache_misses_total").increment(1);

        let header = self.decoder.decode_header(path).await?;
        debug!(path = %path.display(), "cached grid header");

        self.entries
            .write()
            .await
            .insert(path.to_path_buf(), header);
        Ok(header)
    }

    /// Look up a header without decoding.
    pub async fn get_cached(&self, path: &Path) -> Option<GridHeader> {
        self.entries.read().await.get(path).copied()
    }

    /// Decode the headers of `paths` concurrently.
    ///
    /// Failures are logged and skipped. Returns the number of headers now
    /// cached for the given paths.
    pub async fn warm<I, P>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        let total = paths.len();

        let results = join_all(paths.iter().map(|path| async move {
            (path, self.get_header(path).await)
        }))
        .await;

        let mut loaded = 0;
        for (path, result) in results {
            match result {
                Ok(_) => loaded += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to warm grid header"),
            }
        }

        info!(loaded, total, "header cache warmed");
        loaded
    }

    /// Number of cached headers.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> HeaderCacheStats {
        HeaderCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len().await,
        }
    }
}
