//! Distance heuristics for A* routing.
//!
//! Physical qubits are assumed to sit on a rectangular grid in
//! row-major order; the column count is derived from the device size.

/// Distance metric over the implicit 2D grid embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    /// |Δrow| + |Δcol|.
    Manhattan,
    /// Straight-line distance.
    Euclidean,
    /// max(|Δrow|, |Δcol|).
    Chebyshev,
}

/// Distance between two qubit indices laid out on a grid with
/// `num_columns` columns.
pub(crate) fn grid_distance(
    a: usize,
    b: usize,
    num_columns: usize,
    metric: DistanceMetric,
) -> f64 {
    let columns = num_columns.max(1);
    let (row_a, col_a) = (a / columns, a % columns);
    let (row_b, col_b) = (b / columns, b % columns);
    let d_row = row_a.abs_diff(row_b) as f64;
    let d_col = col_a.abs_diff(col_b) as f64;
    match metric {
        DistanceMetric::Manhattan => d_row + d_col,
        DistanceMetric::Euclidean => (d_row * d_row + d_col * d_col).sqrt(),
        DistanceMetric::Chebyshev => d_row.max(d_col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_on_grid() {
        // 3-column grid: index 0 at (0,0), index 5 at (1,2).
        assert_eq!(grid_distance(0, 5, 3, DistanceMetric::Manhattan), 3.0);
        assert!((grid_distance(0, 5, 3, DistanceMetric::Euclidean) - 5f64.sqrt()).abs() < 1e-12);
        assert_eq!(grid_distance(0, 5, 3, DistanceMetric::Chebyshev), 2.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for metric in [
            DistanceMetric::Manhattan,
            DistanceMetric::Euclidean,
            DistanceMetric::Chebyshev,
        ] {
            assert_eq!(grid_distance(4, 4, 3, metric), 0.0);
        }
    }
}
