//! Gated reads of grid file headers and single values.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::trace;

use crate::error::{GridError, Result};
use crate::gate::ConcurrencyGate;
use crate::header::{GridHeader, HEADER_SIZE, VALUE_SIZE};

/// Reads headers and point values from grid files.
///
/// Every file open goes through the shared [`ConcurrencyGate`]; the slot
/// is held only for the duration of the read.
#[derive(Clone, Debug)]
pub struct GridDecoder {
    gate: ConcurrencyGate,
}

impl GridDecoder {
    /// Create a decoder that opens files through `gate`.
    pub fn new(gate: ConcurrencyGate) -> Self {
        Self { gate }
    }

    /// The gate bounding this decoder's open files.
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Read and decode the 32-byte header of `path`.
    pub async fn decode_header(&self, path: &Path) -> Result<GridHeader> {
        let bytes = {
            let _permit = self.gate.acquire().await?;
            let file = File::open(path)
                .await
                .map_err(|e| GridError::decode(path, e))?;

            let mut buf = Vec::with_capacity(HEADER_SIZE);
            file.take(HEADER_SIZE as u64)
                .read_to_end(&mut buf)
                .await
                .map_err(|e| GridError::decode(path, e))?;
            buf
        };

        GridHeader::from_bytes(&bytes).map_err(|e| match e {
            GridError::Decode(msg) => GridError::decode(path, msg),
            GridError::InvalidHeader(msg) => {
                GridError::InvalidHeader(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Read the value of the cell containing `(lat, lon)`.
    ///
    /// Returns `Ok(None)` when the point is outside the grid, the file is
    /// too short to hold the cell, or the cell holds the sentinel or a
    /// non-finite value.
    pub async fn lookup_value(
        &self,
        path: &Path,
        header: &GridHeader,
        lat: f64,
        lon: f64,
    ) -> Result<Option<f32>> {
        let Some(offset) = header.locate(lat, lon) else {
            trace!(path = %path.display(), lat, lon, "point outside grid coverage");
            return Ok(None);
        };

        let bytes = {
            let _permit = self.gate.acquire().await?;
            let mut file = File::open(path).await.map_err(|e| GridError::io(path, e))?;
            file.seek(SeekFrom::Start(offset))
                .await
                .map_err(|e| GridError::io(path, e))?;

            let mut buf = Vec::with_capacity(VALUE_SIZE);
            file.take(VALUE_SIZE as u64)
                .read_to_end(&mut buf)
                .await
                .map_err(|e| GridError::io(path, e))?;
            buf
        };

        if bytes.len() < VALUE_SIZE {
            trace!(path = %path.display(), offset, "short read at value offset");
            return Ok(None);
        }

        let value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if header.is_empty_value(value) {
            return Ok(None);
        }
        if !value.is_finite() {
            trace!(path = %path.display(), offset, "non-finite cell value");
            return Ok(None);
        }

        Ok(Some(value))
    }
}

impl Default for GridDecoder {
    fn default() -> Self {
        Self::new(ConcurrencyGate::default())
    }
}
