//! Parameter sweeps built on the optimizer.
//!
//! Computes the `a1 -> (a2*, U1)` curve for fixed productivities and costs,
//! one full optimization per grid point, in parallel. Results are plain
//! structured values; any CSV or plotting belongs to the caller.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::OptimizerConfig;
use crate::error::SolverError;
use crate::optimizer;
use crate::params::FixedParameters;

/// One point of the `a1` sweep.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SweepPoint {
    pub a1: f64,
    /// Maximizing `a2` found by the optimizer.
    pub a2_star: f64,
    /// Player 1's utility at `a2_star`.
    pub utility: f64,
    /// Carried over from the optimizer's midpoint fallback.
    pub low_confidence: bool,
}

/// Build a uniform grid of `a1` values strictly inside `(min_a1, max_a1)`
/// endpoints included.
///
/// # Errors
///
/// Returns an error unless `0 < min_a1 < max_a1 < 1` and `n >= 2`.
pub fn a1_grid(min_a1: f64, max_a1: f64, n: usize) -> Result<Vec<f64>, SolverError> {
    if !(0.0 < min_a1 && min_a1 < max_a1 && max_a1 < 1.0) {
        return Err(SolverError::InvalidBounds {
            lo: min_a1,
            hi: max_a1,
        });
    }
    if n < 2 {
        return Err(SolverError::InvalidBounds {
            lo: min_a1,
            hi: min_a1,
        });
    }
    #[allow(clippy::cast_precision_loss)]
    let step = (max_a1 - min_a1) / (n - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    Ok((0..n).map(|i| min_a1 + i as f64 * step).collect())
}

/// Run the optimizer at every `a1` in the grid, holding the productivities
/// and costs of `template` fixed. Values outside `(0,1)` and grid points
/// where the optimizer itself errors are skipped.
#[must_use]
pub fn sweep_a1(
    template: &FixedParameters,
    a1_values: &[f64],
    config: &OptimizerConfig,
) -> Vec<SweepPoint> {
    a1_values
        .par_iter()
        .filter(|a1| **a1 > 0.0 && **a1 < 1.0)
        .filter_map(|&a1| {
            let fixed = FixedParameters { a1, ..*template };
            let result = optimizer::optimize_a2(&fixed, config).ok()?;
            Some(SweepPoint {
                a1,
                a2_star: result.best_a2,
                utility: result.utility,
                low_confidence: result.low_confidence,
            })
        })
        .collect()
}

/// Analytic interior benchmark for the optimal `a2`:
/// `a2 = r2*a1 / (r2*a1 + r1*(1 - a1))`, where `r_i = pix/piy`.
///
/// Useful as a diagnostic baseline against the searched `a2*`.
#[must_use]
pub fn interior_benchmark_a2(a1: f64, r1: f64, r2: f64) -> f64 {
    let num = r2 * a1;
    num / (num + r1 * (1.0 - a1))
}
