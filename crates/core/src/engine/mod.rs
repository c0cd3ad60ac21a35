//! Combinatorial equilibrium engine.
//!
//! [`solve`] classifies which of the seven corner/interior regimes holds for
//! a parameter vector and returns the closed-form equilibrium for that
//! regime. The seven feasibility tests are parameter-only inequalities; the
//! engine evaluates all of them on every call and keeps the signed margins,
//! so failing regimes can be diagnosed. Ties are returned as such — regime
//! selection at a knife edge is caller policy, not engine policy.

mod regime;
mod solution;

use serde::Serialize;

use crate::error::SolverError;
use crate::params::ParameterVector;

pub use regime::{CandidateCase, Margin, Regime};
pub use solution::{Diagnostics, EffortVar, Solution};

/// Parameter-only primitives shared by the feasibility tests and the
/// closed forms.
///
/// `r1`, `r2` are the players' autarky output ratios (the `Y/X` ratio each
/// player would steer toward alone). `kxy`/`kyx` are cross-player capacity
/// constants; their roots `r*` solve the full-specialization fixed points.
/// The defining exponents `2 + a1 - a2` and `2 + a2 - a1` lie strictly in
/// `(1,3)` for taste exponents in `(0,1)`, so the positive roots exist and
/// are unique.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Primitives {
    pub r1: f64,
    pub r2: f64,
    pub kxy: f64,
    pub kyx: f64,
    pub exp_xy: f64,
    pub exp_yx: f64,
    pub r_star_xy: f64,
    pub r_star_yx: f64,
}

impl Primitives {
    pub(crate) fn compute(p: &ParameterVector) -> Self {
        let r1 = p.a1 * p.p1y / ((1.0 - p.a1) * p.p1x);
        let r2 = p.a2 * p.p2y / ((1.0 - p.a2) * p.p2x);
        let kxy = p.a2 * p.c1 * p.p2y.powi(2) / ((1.0 - p.a1) * p.c2 * p.p1x.powi(2));
        let kyx = p.a1 * p.c2 * p.p1y.powi(2) / ((1.0 - p.a2) * p.c1 * p.p2x.powi(2));
        let exp_xy = 2.0 + p.a1 - p.a2;
        let exp_yx = 2.0 + p.a2 - p.a1;
        Self {
            r1,
            r2,
            kxy,
            kyx,
            exp_xy,
            exp_yx,
            r_star_xy: kxy.powf(1.0 / exp_xy),
            r_star_yx: kyx.powf(1.0 / exp_yx),
        }
    }
}

/// Outcome of one engine call.
///
/// Callers must handle all three variants; there is no default numeric
/// answer for tied or infeasible inputs. Every variant carries the seven
/// candidate cases evaluated on the call.
#[derive(Debug, Clone, Serialize)]
pub enum EngineResult {
    /// Exactly one regime's inequalities hold.
    Unique {
        solution: Solution,
        candidates: Vec<CandidateCase>,
    },
    /// Several regimes hold simultaneously (measure-zero knife edge). Each
    /// passing regime is solved independently; no winner is picked.
    Tied {
        solutions: Vec<(Regime, Solution)>,
        candidates: Vec<CandidateCase>,
    },
    /// No regime's inequalities hold under the given tolerance.
    Infeasible { candidates: Vec<CandidateCase> },
}

impl EngineResult {
    /// The seven per-regime feasibility records for this call.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateCase] {
        match self {
            Self::Unique { candidates, .. }
            | Self::Tied { candidates, .. }
            | Self::Infeasible { candidates } => candidates,
        }
    }

    /// Labels of the regimes that passed feasibility.
    #[must_use]
    pub fn passing_regimes(&self) -> Vec<Regime> {
        match self {
            Self::Unique { solution, .. } => vec![solution.regime],
            Self::Tied { solutions, .. } => solutions.iter().map(|(m, _)| *m).collect(),
            Self::Infeasible { .. } => Vec::new(),
        }
    }
}

/// Solve the two-task Cobb-Douglas effort game.
///
/// Pure arithmetic: deterministic, no side effects. Inequalities are
/// tolerance-banded, so `tolerance` controls how close to a regime boundary
/// a parameter vector may sit before neighbouring regimes tie.
///
/// # Errors
///
/// Returns a domain-violation error if any parameter is outside its
/// required range. Regime infeasibility and ties are *not* errors; they are
/// [`EngineResult`] variants.
pub fn solve(params: &ParameterVector, tolerance: f64) -> Result<EngineResult, SolverError> {
    params.validate()?;

    let prim = Primitives::compute(params);
    let candidates = candidate_cases(params, &prim, tolerance);

    let passing: Vec<Regime> = candidates
        .iter()
        .filter(|c| c.passed)
        .map(|c| c.regime)
        .collect();

    Ok(match passing.as_slice() {
        [] => EngineResult::Infeasible { candidates },
        [only] => EngineResult::Unique {
            solution: solution::solve_regime(params, &prim, *only, tolerance),
            candidates,
        },
        many => EngineResult::Tied {
            solutions: many
                .iter()
                .map(|&m| (m, solution::solve_regime(params, &prim, m, tolerance)))
                .collect(),
            candidates,
        },
    })
}

/// Evaluate all seven regime-feasibility inequalities.
///
/// Margin sign conventions: `*_minus_*` margins compare the named
/// quantities, with the required sign noted per regime below; `equation_*`
/// margins are residuals of the defining fixed-point equation and should be
/// near zero for the specialization regimes.
#[allow(clippy::similar_names)]
fn candidate_cases(p: &ParameterVector, prim: &Primitives, tol: f64) -> Vec<CandidateCase> {
    let geq = |a: f64, b: f64| a >= b - tol;
    let leq = |a: f64, b: f64| a <= b + tol;

    let mut cases = Vec::with_capacity(7);

    // (B,X): player 1 steers the ratio (r = r1, needs r1 >= r2) and player 2
    // has the capacity to absorb all of task X.
    let bx_lhs = prim.r1.powf(1.0 + p.a2 - p.a1);
    let bx_rhs = (1.0 - p.a1) * p.p1y * p.p1x * p.c2 / ((1.0 - p.a2) * p.p2x.powi(2) * p.c1);
    cases.push(CandidateCase {
        regime: Regime::BX,
        passed: geq(prim.r1, prim.r2) && leq(bx_lhs, bx_rhs),
        margins: vec![
            Margin::new("r1_minus_r2", prim.r1 - prim.r2), // >= 0
            Margin::new("capacity_lhs_minus_rhs", bx_lhs - bx_rhs), // <= 0
        ],
    });

    // (X,B): mirror of (B,X) with the players swapped.
    let xb_lhs = prim.r2.powf(1.0 + p.a1 - p.a2);
    let xb_rhs = (1.0 - p.a2) * p.p2y * p.p2x * p.c1 / ((1.0 - p.a1) * p.p1x.powi(2) * p.c2);
    cases.push(CandidateCase {
        regime: Regime::XB,
        passed: geq(prim.r2, prim.r1) && leq(xb_lhs, xb_rhs),
        margins: vec![
            Margin::new("r2_minus_r1", prim.r2 - prim.r1), // >= 0
            Margin::new("capacity_lhs_minus_rhs", xb_lhs - xb_rhs), // <= 0
        ],
    });

    // (B,Y): player 1 steers (r = r1, needs r1 <= r2) and player 2's
    // Y-supply stays within what the capacity constant allows.
    let by_lhs = prim.r1.powf(prim.exp_xy);
    cases.push(CandidateCase {
        regime: Regime::BY,
        passed: leq(prim.r1, prim.r2) && geq(by_lhs, prim.kxy),
        margins: vec![
            Margin::new("r1_minus_r2", prim.r1 - prim.r2), // <= 0
            Margin::new("r1_power_minus_kxy", by_lhs - prim.kxy), // >= 0
        ],
    });

    // (Y,B): mirror of (B,Y).
    let yb_lhs = prim.r2.powf(prim.exp_yx);
    cases.push(CandidateCase {
        regime: Regime::YB,
        passed: leq(prim.r2, prim.r1) && geq(yb_lhs, prim.kyx),
        margins: vec![
            Margin::new("r2_minus_r1", prim.r2 - prim.r1), // <= 0
            Margin::new("r2_power_minus_kyx", yb_lhs - prim.kyx), // >= 0
        ],
    });

    // (X,Y): full specialization, ratio at the fixed point r*_XY, which must
    // sit between the players' autarky ratios.
    cases.push(CandidateCase {
        regime: Regime::XY,
        passed: geq(prim.r_star_xy, prim.r1) && leq(prim.r_star_xy, prim.r2),
        margins: vec![
            Margin::new("r_star_minus_r1", prim.r_star_xy - prim.r1), // >= 0
            Margin::new("r2_minus_r_star", prim.r2 - prim.r_star_xy), // >= 0
            Margin::new(
                "equation_lhs_minus_rhs",
                prim.r_star_xy.powf(prim.exp_xy) - prim.kxy, // ~ 0
            ),
        ],
    });

    // (Y,X): mirror of (X,Y).
    cases.push(CandidateCase {
        regime: Regime::YX,
        passed: geq(prim.r_star_yx, prim.r2) && leq(prim.r_star_yx, prim.r1),
        margins: vec![
            Margin::new("r_star_minus_r2", prim.r_star_yx - prim.r2), // >= 0
            Margin::new("r1_minus_r_star", prim.r1 - prim.r_star_yx), // >= 0
            Margin::new(
                "equation_lhs_minus_rhs",
                prim.r_star_yx.powf(prim.exp_yx) - prim.kyx, // ~ 0
            ),
        ],
    });

    // (B,B): fully interior, only on the r1 == r2 knife edge.
    cases.push(CandidateCase {
        regime: Regime::BB,
        passed: (prim.r1 - prim.r2).abs() <= tol,
        margins: vec![
            Margin::new("r1_minus_r2", prim.r1 - prim.r2), // ~ 0
        ],
    });

    cases
}
