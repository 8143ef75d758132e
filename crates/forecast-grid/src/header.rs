//! WGF4 file header and coordinate-to-offset arithmetic.
//!
//! Layout (little-endian):
//!
//! | Offset | Size | Field        |
//! |--------|------|--------------|
//! | 0      | 4    | lat_bottom   |
//! | 4      | 4    | lat_top      |
//! | 8      | 4    | lon_left     |
//! | 12     | 4    | lon_right    |
//! | 16     | 4    | dy           |
//! | 20     | 4    | dx           |
//! | 24     | 4    | multiplier   |
//! | 28     | 4    | empty_value  |
//! | 32+    | 4×N  | f32 values, row-major from the bottom-left cell |

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Size of the fixed header in bytes (7 × i32 + 1 × f32).
pub const HEADER_SIZE: usize = 32;

/// Size of one grid value in bytes.
pub const VALUE_SIZE: usize = 4;

/// Decoded header of a grid file.
///
/// Coordinates and steps are integers in the file's scaled space:
/// a decimal degree value `d` corresponds to `trunc(d * multiplier)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    pub lat_bottom: i32,
    pub lat_top: i32,
    pub lon_left: i32,
    pub lon_right: i32,
    /// Latitude step between rows.
    pub dy: i32,
    /// Longitude step between columns.
    pub dx: i32,
    /// Scale factor from decimal degrees to file coordinates.
    pub multiplier: i32,
    /// Sentinel marking a cell with no data.
    pub empty_value: f32,
}

impl GridHeader {
    /// Decode a header from the first [`HEADER_SIZE`] bytes of a file.
    ///
    /// Fails with [`GridError::Decode`] on short input and with
    /// [`GridError::InvalidHeader`] if the decoded fields are inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(GridError::Decode(format!(
                "header needs {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let int_at = |i: usize| {
            let o = i * 4;
            i32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
        };

        let header = Self {
            lat_bottom: int_at(0),
            lat_top: int_at(1),
            lon_left: int_at(2),
            lon_right: int_at(3),
            dy: int_at(4),
            dx: int_at(5),
            multiplier: int_at(6),
            empty_value: f32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
        };

        header.validate()?;
        Ok(header)
    }

    /// Encode the header into its on-disk representation.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let fields = [
            self.lat_bottom,
            self.lat_top,
            self.lon_left,
            self.lon_right,
            self.dy,
            self.dx,
            self.multiplier,
        ];
        for (i, field) in fields.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&field.to_le_bytes());
        }
        out[28..32].copy_from_slice(&self.empty_value.to_le_bytes());
        out
    }

    /// Check the structural invariants of the header.
    pub fn validate(&self) -> Result<()> {
        if self.lat_bottom > self.lat_top {
            return Err(GridError::invalid_header(format!(
                "lat_bottom {} > lat_top {}",
                self.lat_bottom, self.lat_top
            )));
        }
        if self.lon_left > self.lon_right {
            return Err(GridError::invalid_header(format!(
                "lon_left {} > lon_right {}",
                self.lon_left, self.lon_right
            )));
        }
        if self.dy <= 0 || self.dx <= 0 {
            return Err(GridError::invalid_header(format!(
                "grid steps must be positive (dy={}, dx={})",
                self.dy, self.dx
            )));
        }
        if self.multiplier <= 0 {
            return Err(GridError::invalid_header(format!(
                "multiplier must be positive, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }

    /// Number of columns in one grid row.
    pub fn grid_width(&self) -> u64 {
        ((i64::from(self.lon_right) - i64::from(self.lon_left)) / i64::from(self.dx) + 1) as u64
    }

    /// Number of rows in the grid.
    pub fn grid_height(&self) -> u64 {
        ((i64::from(self.lat_top) - i64::from(self.lat_bottom)) / i64::from(self.dy) + 1) as u64
    }

    /// Total number of cells the data block is expected to hold.
    ///
    /// Saturates at `u64::MAX` for grids spanning the full i32 range.
    pub fn cell_count(&self) -> u64 {
        self.grid_width().saturating_mul(self.grid_height())
    }

    /// Convert decimal degrees into the file's integer coordinate space.
    ///
    /// Truncates toward zero, the same rule the files are produced with.
    /// Returns `None` for non-finite input.
    pub fn scale(&self, lat: f64, lon: f64) -> Option<(i64, i64)> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        let m = f64::from(self.multiplier);
        Some(((lat * m).trunc() as i64, (lon * m).trunc() as i64))
    }

    /// Flat row-major cell index for scaled coordinates, or `None` when
    /// the point lies outside the grid (bounds are inclusive) or the index
    /// does not fit in a `u64`.
    pub fn cell_index(&self, target_lat: i64, target_lon: i64) -> Option<u64> {
        let (bottom, top) = (i64::from(self.lat_bottom), i64::from(self.lat_top));
        let (left, right) = (i64::from(self.lon_left), i64::from(self.lon_right));

        if target_lat < bottom || target_lat > top || target_lon < left || target_lon > right {
            return None;
        }

        let lat_index = ((target_lat - bottom) / i64::from(self.dy)) as u64;
        let lon_index = ((target_lon - left) / i64::from(self.dx)) as u64;

        lat_index
            .checked_mul(self.grid_width())?
            .checked_add(lon_index)
    }

    /// Byte offset of a cell's value within the file, or `None` if it
    /// cannot be represented.
    pub fn value_offset(data_index: u64) -> Option<u64> {
        data_index
            .checked_mul(VALUE_SIZE as u64)?
            .checked_add(HEADER_SIZE as u64)
    }

    /// Byte offset of the value nearest to `(lat, lon)`, or `None` when
    /// the point is outside the grid's coverage.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<u64> {
        let (target_lat, target_lon) = self.scale(lat, lon)?;
        self.cell_index(target_lat, target_lon)
            .and_then(Self::value_offset)
    }

    /// True if `value` is the "no data" sentinel.
    ///
    /// Matches on numeric equality or identical bits, so a NaN sentinel
    /// is recognised. There is no tolerance.
    pub fn is_empty_value(&self, value: f32) -> bool {
        value == self.empty_value || value.to_bits() == self.empty_value.to_bits()
    }
}
