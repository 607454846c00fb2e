//! Ordinary least squares on a dense design matrix

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};

const RANK_TOLERANCE: f64 = 1e-10;

/// Result of a least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Estimated coefficients, one per design column
    pub coefficients: Vec<f64>,
    /// Response minus fitted values, one per design row
    pub residuals: Vec<f64>,
    /// Residual sum of squares
    pub rss: f64,
}

/// Solve `min ‖X·b − y‖²` where `design` holds the rows of `X`.
///
/// A design without columns is valid and leaves the response as residuals.
/// Rank-deficient designs are rejected with [`MathError::Singular`].
pub fn least_squares(design: &[Vec<f64>], response: &[f64]) -> Result<LeastSquaresFit> {
    let rows = design.len();
    if rows != response.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but response has {} values",
            rows,
            response.len()
        )));
    }

    let cols = design.first().map_or(0, Vec::len);
    if cols == 0 {
        let rss = response.iter().map(|v| v * v).sum();
        return Ok(LeastSquaresFit {
            coefficients: Vec::new(),
            residuals: response.to_vec(),
            rss,
        });
    }
    if design.iter().any(|row| row.len() != cols) {
        return Err(MathError::InvalidInput(
            "Design rows must all have the same length".to_string(),
        ));
    }
    if rows < cols {
        return Err(MathError::InsufficientData(format!(
            "Least squares with {} coefficients needs at least {} rows, have {}.",
            cols, cols, rows
        )));
    }

    let x = DMatrix::from_fn(rows, cols, |i, j| design[i][j]);
    let y = DVector::from_column_slice(response);

    let svd = x.clone().svd(true, true);
    let largest = svd
        .singular_values
        .iter()
        .fold(0.0_f64, |acc, value| acc.max(*value));
    let tolerance = largest * RANK_TOLERANCE;
    if largest == 0.0 || svd.rank(tolerance) < cols {
        return Err(MathError::Singular(format!(
            "Design matrix with {} columns is rank deficient",
            cols
        )));
    }

    let beta = svd
        .solve(&y, tolerance)
        .map_err(|e| MathError::Singular(e.to_string()))?;
    let fitted = &x * &beta;

    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(y, f)| y - f).collect();
    let rss = residuals.iter().map(|r| r * r).sum();

    Ok(LeastSquaresFit {
        coefficients: beta.iter().copied().collect(),
        residuals,
        rss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_line() {
        let design: Vec<Vec<f64>> = (0..10).map(|x| vec![1.0, x as f64]).collect();
        let response: Vec<f64> = (0..10).map(|x| 3.0 + 2.0 * x as f64).collect();

        let fit = least_squares(&design, &response).unwrap();
        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-9);
        assert!(fit.rss < 1e-12);
        assert_eq!(fit.residuals.len(), 10);
    }

    #[test]
    fn test_empty_design() {
        let design = vec![Vec::new(); 3];
        let fit = least_squares(&design, &[1.0, -2.0, 2.0]).unwrap();
        assert!(fit.coefficients.is_empty());
        assert_relative_eq!(fit.rss, 9.0);
    }

    #[test]
    fn test_rank_deficient_design() {
        let design: Vec<Vec<f64>> = (0..6).map(|_| vec![1.0, 1.0]).collect();
        let result = least_squares(&design, &[1.0; 6]);
        assert!(matches!(result, Err(MathError::Singular(_))));
    }

    #[test]
    fn test_shape_checks() {
        let result = least_squares(&[vec![1.0]], &[1.0, 2.0]);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));

        let result = least_squares(&[vec![1.0, 2.0]], &[1.0]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }
}
