//! Test fixtures for the forecast workspace.
//!
//! Tests build a throwaway data directory with [`forecast_dir`], filling
//! each `<timestamp>.wgf4` file from one of the value generators, and
//! query it through the real catalog and decoder. The named layouts in
//! [`grid`] cover a northern/eastern grid, a grid with negative
//! coordinates, and a tiny integer grid for hand-checked indices.

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert that two numbers differ by at most `tolerance`.
///
/// Operands are compared as `f64`, so `f32` grid values can be checked
/// against literal expectations.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) =
            ($actual as f64, $expected as f64, $tolerance as f64);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} is not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }};
}
