//! Test data generators for synthetic grid values.
//!
//! These generators create predictable, verifiable value patterns laid
//! out row-major from the bottom-left cell, matching the WGF4 data block.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that a lookup landed on the right cell
/// by checking that the returned value equals `col * 1000 + row`.
///
/// # Arguments
///
/// * `width` - Number of columns
/// * `height` - Number of rows
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a test grid with air-temperature-like values in Celsius.
///
/// Values run from -10C in the bottom-left corner to about 30C in the
/// top-right corner, with `offset` added to every cell so that grids for
/// different timestamps are distinguishable.
pub fn create_temperature_grid(width: usize, height: usize, offset: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f32 / width.max(1) as f32;
            let y_factor = row as f32 / height.max(1) as f32;
            data.push(-10.0 + x_factor * 20.0 + y_factor * 20.0 + offset);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a grid with the sentinel value at specified positions.
///
/// Useful for testing missing data handling.
///
/// # Arguments
///
/// * `width` - Number of columns
/// * `height` - Number of rows
/// * `sentinel` - The "no data" value written at each position
/// * `positions` - List of (col, row) positions that hold the sentinel
///
/// # Returns
///
/// A [`create_test_grid`] pattern with the sentinel at the given cells.
pub fn create_grid_with_sentinels(
    width: usize,
    height: usize,
    sentinel: f32,
    positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_test_grid(width, height);
    for &(col, row) in positions {
        if col < width && row < height {
            data[row * width + col] = sentinel;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(3, 2);
        assert_eq!(grid, vec![0.0, 1000.0, 2000.0, 1.0, 1001.0, 2001.0]);
    }

    #[test]
    fn test_create_temperature_grid_range() {
        let grid = create_temperature_grid(10, 10, 0.0);
        assert_eq!(grid[0], -10.0);
        assert!(grid.iter().all(|&t| (-10.0..=30.0).contains(&t)));

        let shifted = create_temperature_grid(10, 10, 1.5);
        assert_eq!(shifted[0], -8.5);
    }

    #[test]
    fn test_create_constant_grid() {
        let grid = create_constant_grid(4, 4, 7.0);
        assert_eq!(grid.len(), 16);
        assert!(grid.iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_create_grid_with_sentinels() {
        let grid = create_grid_with_sentinels(3, 3, -9999.0, &[(1, 1), (5, 5)]);
        assert_eq!(grid[4], -9999.0);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid.iter().filter(|&&v| v == -9999.0).count(), 1);
    }
}
