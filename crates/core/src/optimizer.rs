//! Scalar best-response optimizer.
//!
//! Maximizes player 1's utility over player 2's taste exponent `a2` by
//! re-solving the equilibrium at every trial value. The oracle's output can
//! jump discontinuously when a trial crosses a regime boundary, so a naive
//! unimodal search is unsound; the strategy here is a dense coarse scan over
//! the whole interval (parallelized — every grid point is an independent
//! oracle call) followed by golden-section refinement inside a one-grid-step
//! bracket around the coarse best. The coarse best, both bracket boundaries
//! and both interval endpoints all survive to the final selection.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::OptimizerConfig;
use crate::engine::{self, EngineResult, Regime, Solution};
use crate::error::SolverError;
use crate::params::{FixedParameters, ParameterVector, Player};
use crate::utility;

/// `(sqrt(5) - 1) / 2`.
const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_894_9;

/// What one oracle trial produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrialTag {
    /// The regime attaining the trial's utility (under a tie, the envelope
    /// maximizer).
    Regime(Regime),
    /// The engine found no feasible regime, or the solution fell outside
    /// the payoff domain.
    Infeasible,
    /// Building the trial vector or calling the oracle failed.
    Error,
}

/// One entry of the optimizer's evaluation trace.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrialSample {
    pub a2: f64,
    /// Player 1's utility, `-inf` for failed trials.
    pub utility: f64,
    pub tag: TrialTag,
}

/// Outcome of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub best_a2: f64,
    /// Player 1's utility at `best_a2`.
    pub utility: f64,
    /// Regime attained at the best point, if the trial there succeeded.
    pub regime: Option<Regime>,
    /// Full equilibrium at the best point, if the trial there succeeded.
    pub solution: Option<Solution>,
    /// Every trial evaluated, in evaluation order, for reproducibility.
    pub samples: Vec<TrialSample>,
    /// Set when the whole coarse scan was infeasible and the result is the
    /// midpoint fallback rather than a genuine optimum.
    pub low_confidence: bool,
}

/// One evaluated trial, with the winning solution kept for the final report.
#[derive(Debug, Clone)]
struct Trial {
    a2: f64,
    utility: f64,
    tag: TrialTag,
    solution: Option<Solution>,
}

impl Trial {
    fn failed(a2: f64, tag: TrialTag) -> Self {
        Self {
            a2,
            utility: f64::NEG_INFINITY,
            tag,
            solution: None,
        }
    }

    const fn sample(&self) -> TrialSample {
        TrialSample {
            a2: self.a2,
            utility: self.utility,
            tag: self.tag,
        }
    }

    const fn regime(&self) -> Option<Regime> {
        match self.tag {
            TrialTag::Regime(regime) => Some(regime),
            TrialTag::Infeasible | TrialTag::Error => None,
        }
    }
}

/// Maximize player 1's utility over `a2`, using the equilibrium engine as
/// the oracle.
///
/// # Errors
///
/// Returns an error only for invalid search bounds; per-trial failures are
/// folded into the trace as `-inf` utilities and never abort the run.
pub fn optimize_a2(
    fixed: &FixedParameters,
    config: &OptimizerConfig,
) -> Result<OptimizationResult, SolverError> {
    optimize_a2_with(engine::solve, fixed, config)
}

/// [`optimize_a2`] with an injected oracle, for callers that wrap or stub
/// the engine.
///
/// # Errors
///
/// Returns an error only for invalid search bounds.
pub fn optimize_a2_with<F>(
    oracle: F,
    fixed: &FixedParameters,
    config: &OptimizerConfig,
) -> Result<OptimizationResult, SolverError>
where
    F: Fn(&ParameterVector, f64) -> Result<EngineResult, SolverError> + Sync,
{
    if !(0.0 < config.lower_bound
        && config.lower_bound < config.upper_bound
        && config.upper_bound < 1.0)
    {
        return Err(SolverError::InvalidBounds {
            lo: config.lower_bound,
            hi: config.upper_bound,
        });
    }
    // The bounds describe an open interval; nudge both edges inward.
    let lo = config.lower_bound + config.edge_epsilon;
    let hi = config.upper_bound - config.edge_epsilon;
    if lo >= hi {
        return Err(SolverError::InvalidBounds { lo, hi });
    }

    let n = config.coarse_points.max(2);
    #[allow(clippy::cast_precision_loss)]
    let grid_step = (hi - lo) / (n - 1) as f64;

    // Phase 1: coarse global scan. The true maximum may sit at a
    // regime-switch discontinuity invisible to any local search started
    // elsewhere, so the whole interval is sampled before refining.
    let coarse: Vec<Trial> = (0..n)
        .into_par_iter()
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let a2 = if i == n - 1 { hi } else { lo + i as f64 * grid_step };
            evaluate(&oracle, fixed, a2, config.solver_tolerance)
        })
        .collect();

    let mut samples: Vec<TrialSample> = coarse.iter().map(Trial::sample).collect();

    let mut seed_idx = 0;
    for (i, trial) in coarse.iter().enumerate() {
        if trial.utility > coarse[seed_idx].utility {
            seed_idx = i;
        }
    }
    let seed = coarse[seed_idx].clone();

    if seed.utility == f64::NEG_INFINITY {
        // Degenerate feasible region: every coarse trial failed. Surface the
        // midpoint as a flagged low-confidence answer instead of erroring.
        let midpoint = evaluate(&oracle, fixed, (lo + hi) / 2.0, config.solver_tolerance);
        samples.push(midpoint.sample());
        return Ok(OptimizationResult {
            best_a2: midpoint.a2,
            utility: midpoint.utility,
            regime: midpoint.regime(),
            solution: midpoint.solution,
            samples,
            low_confidence: true,
        });
    }

    // Phase 2: golden-section refinement in a one-grid-step bracket around
    // the coarse best; fall back to the full interval if that degenerates.
    let mut a = (seed.a2 - grid_step).max(lo);
    let mut b = (seed.a2 + grid_step).min(hi);
    if b - a <= 0.0 {
        a = lo;
        b = hi;
    }

    let mut c = b - INV_GOLDEN_RATIO * (b - a);
    let mut d = a + INV_GOLDEN_RATIO * (b - a);
    let mut trial_c = evaluate(&oracle, fixed, c, config.solver_tolerance);
    let mut trial_d = evaluate(&oracle, fixed, d, config.solver_tolerance);
    samples.push(trial_c.sample());
    samples.push(trial_d.sample());

    let mut iterations = 0;
    while b - a > config.tolerance && iterations < config.max_iterations {
        iterations += 1;
        if trial_c.utility < trial_d.utility {
            a = c;
            c = d;
            trial_c = trial_d;
            d = a + INV_GOLDEN_RATIO * (b - a);
            trial_d = evaluate(&oracle, fixed, d, config.solver_tolerance);
            samples.push(trial_d.sample());
        } else {
            b = d;
            d = c;
            trial_d = trial_c.clone();
            c = b - INV_GOLDEN_RATIO * (b - a);
            trial_c = evaluate(&oracle, fixed, c, config.solver_tolerance);
            samples.push(trial_c.sample());
        }
    }

    // Phase 3: final selection over every retained candidate — the two
    // probes, the bracket boundaries, the global endpoints, and the coarse
    // seed. Nothing is discarded before this max.
    let trial_a = evaluate(&oracle, fixed, a, config.solver_tolerance);
    let trial_b = evaluate(&oracle, fixed, b, config.solver_tolerance);
    let trial_lo = evaluate(&oracle, fixed, lo, config.solver_tolerance);
    let trial_hi = evaluate(&oracle, fixed, hi, config.solver_tolerance);
    samples.push(trial_a.sample());
    samples.push(trial_b.sample());
    samples.push(trial_lo.sample());
    samples.push(trial_hi.sample());

    let mut best = seed;
    for trial in [trial_c, trial_d, trial_a, trial_b, trial_lo, trial_hi] {
        if trial.utility > best.utility {
            best = trial;
        }
    }

    Ok(OptimizationResult {
        best_a2: best.a2,
        utility: best.utility,
        regime: best.regime(),
        solution: best.solution,
        samples,
        low_confidence: false,
    })
}

/// Evaluate one trial `a2`: solve the equilibrium and score player 1.
///
/// Any failure — domain violation, oracle error, infeasibility, solution
/// outside the payoff domain — becomes a `-inf` trial; it never aborts the
/// surrounding search. A tied result scores as the utility envelope across
/// the tied regimes.
fn evaluate<F>(oracle: &F, fixed: &FixedParameters, a2: f64, solver_tolerance: f64) -> Trial
where
    F: Fn(&ParameterVector, f64) -> Result<EngineResult, SolverError>,
{
    let Ok(params) = fixed.with_a2(a2) else {
        return Trial::failed(a2, TrialTag::Error);
    };

    match oracle(&params, solver_tolerance) {
        Err(_) => Trial::failed(a2, TrialTag::Error),
        Ok(EngineResult::Infeasible { .. }) => Trial::failed(a2, TrialTag::Infeasible),
        Ok(EngineResult::Unique { solution, .. }) => {
            match utility::utility_from_solution(&solution, Player::Player1, &params) {
                Some(u) => Trial {
                    a2,
                    utility: u,
                    tag: TrialTag::Regime(solution.regime),
                    solution: Some(solution),
                },
                None => Trial::failed(a2, TrialTag::Infeasible),
            }
        }
        Ok(EngineResult::Tied { solutions, .. }) => {
            let mut best: Option<(f64, Regime, Solution)> = None;
            for (regime, solution) in solutions {
                let Some(u) = utility::utility_from_solution(&solution, Player::Player1, &params)
                else {
                    continue;
                };
                if best.as_ref().map_or(true, |(b, _, _)| u > *b) {
                    best = Some((u, regime, solution));
                }
            }
            match best {
                Some((u, regime, solution)) => Trial {
                    a2,
                    utility: u,
                    tag: TrialTag::Regime(regime),
                    solution: Some(solution),
                },
                None => Trial::failed(a2, TrialTag::Infeasible),
            }
        }
    }
}
