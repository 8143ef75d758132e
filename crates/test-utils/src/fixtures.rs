//! Synthetic WGF4 grid files for tests.
//!
//! The encoder here is deliberately independent of `forecast-grid` so the
//! decoder is checked against a second implementation of the layout.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Header fields of a synthetic grid file, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFileSpec {
    pub lat_bottom: i32,
    pub lat_top: i32,
    pub lon_left: i32,
    pub lon_right: i32,
    pub dy: i32,
    pub dx: i32,
    pub multiplier: i32,
    pub empty_value: f32,
}

impl GridFileSpec {
    /// Number of columns in a row.
    pub fn width(&self) -> usize {
        ((self.lon_right - self.lon_left) / self.dx + 1) as usize
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        ((self.lat_top - self.lat_bottom) / self.dy + 1) as usize
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.width() * self.height()
    }
}

/// Common grid specifications for testing.
pub mod grid {
    use super::GridFileSpec;

    /// 50N..60N, 10E..20E at 1 degree, multiplier 10000.
    pub const CENTRAL_EUROPE: GridFileSpec = GridFileSpec {
        lat_bottom: 500_000,
        lat_top: 600_000,
        lon_left: 100_000,
        lon_right: 200_000,
        dy: 10_000,
        dx: 10_000,
        multiplier: 10_000,
        empty_value: -9999.0,
    };

    /// Southern/western hemisphere grid with negative coordinates.
    pub const SOUTH_AMERICA: GridFileSpec = GridFileSpec {
        lat_bottom: -400,
        lat_top: -100,
        lon_left: -800,
        lon_right: -400,
        dy: 50,
        dx: 50,
        multiplier: 10,
        empty_value: f32::MIN,
    };

    /// Tiny 3x3 grid in integer degrees.
    pub const TINY_3X3: GridFileSpec = GridFileSpec {
        lat_bottom: 0,
        lat_top: 2,
        lon_left: 0,
        lon_right: 2,
        dy: 1,
        dx: 1,
        multiplier: 1,
        empty_value: -1.0,
    };
}

/// Common timestamps for testing.
pub mod time {
    /// Hourly timestamps starting 2023-07-03T16:03:20Z.
    pub const HOURLY: [i64; 6] = [
        1688400200, 1688403800, 1688407400, 1688411000, 1688414600, 1688418200,
    ];
}

/// Encode a header and row-major values into WGF4 bytes.
pub fn encode_grid_file(layout: &GridFileSpec, values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32 + values.len() * 4);
    for field in [
        layout.lat_bottom,
        layout.lat_top,
        layout.lon_left,
        layout.lon_right,
        layout.dy,
        layout.dx,
        layout.multiplier,
    ] {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&layout.empty_value.to_le_bytes());
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Write `<timestamp>.wgf4` into `dir` and return its path.
pub fn write_grid_file(
    dir: &Path,
    timestamp: i64,
    layout: &GridFileSpec,
    values: &[f32],
) -> io::Result<PathBuf> {
    let path = dir.join(format!("{timestamp}.wgf4"));
    std::fs::write(&path, encode_grid_file(layout, values))?;
    Ok(path)
}

/// Create a temporary data directory with one grid file per timestamp.
///
/// `values_for` is called with each timestamp to produce that file's data.
pub fn forecast_dir<F>(layout: &GridFileSpec, timestamps: &[i64], mut values_for: F) -> io::Result<TempDir>
where
    F: FnMut(i64) -> Vec<f32>,
{
    let dir = TempDir::new()?;
    for &ts in timestamps {
        write_grid_file(dir.path(), ts, layout, &values_for(ts))?;
    }
    Ok(dir)
}
