//! Per-regime closed forms and equilibrium diagnostics.

use std::fmt;

use serde::Serialize;

use crate::params::{EffortPoint, ParameterVector};

use super::regime::Regime;
use super::Primitives;

/// One of the four effort variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EffortVar {
    X1,
    Y1,
    X2,
    Y2,
}

impl fmt::Display for EffortVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X1 => "x1",
            Self::Y1 => "y1",
            Self::X2 => "x2",
            Self::Y2 => "y2",
        };
        f.write_str(s)
    }
}

/// Numerical proof that a solution satisfies its first-order conditions.
///
/// Active efforts (strictly positive) report stationarity residuals, expected
/// to be ~0. Inactive efforts (pinned to zero) report the same expression as
/// a KKT margin, expected to be <= 0. The ratio and totals residuals check
/// internal consistency of the closed form.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub active_foc_residuals: Vec<(EffortVar, f64)>,
    pub inactive_kkt_margins: Vec<(EffortVar, f64)>,
    /// `|Y/X - r|`, infinite when `X` is not strictly positive.
    pub ratio_identity_abs_error: f64,
    /// Closed-form total minus `x1 + y1`.
    pub s1_residual: f64,
    /// Closed-form total minus `x2 + y2`.
    pub s2_residual: f64,
}

/// Closed-form equilibrium for one regime.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub regime: Regime,
    /// Equilibrium output ratio `Y/X`.
    pub r: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Player totals `x_i + y_i`.
    pub s1: f64,
    pub s2: f64,
    /// Aggregate task outputs.
    pub output_x: f64,
    pub output_y: f64,
    pub output_ratio: f64,
    pub diagnostics: Diagnostics,
}

impl Solution {
    /// The four efforts as a point, usable with the payoff functions and the
    /// local best-response verifier.
    #[must_use]
    pub const fn efforts(&self) -> EffortPoint {
        EffortPoint::new(self.x1, self.y1, self.x2, self.y2)
    }
}

/// Marginal benefit minus marginal cost of task-X effort at ratio `r`.
fn foc_x(a: f64, px: f64, c: f64, s: f64, r: f64) -> f64 {
    (1.0 - a) * px * r.powf(a) - c * s
}

/// Marginal benefit minus marginal cost of task-Y effort at ratio `r`.
fn foc_y(a: f64, py: f64, c: f64, s: f64, r: f64) -> f64 {
    a * py * r.powf(a - 1.0) - c * s
}

/// Solve the chosen regime in closed form and attach diagnostics.
///
/// Regime feasibility must have been established by the caller; the formulas
/// here assume the regime's inequalities hold.
#[allow(clippy::similar_names, clippy::many_single_char_names)]
pub(super) fn solve_regime(p: &ParameterVector, prim: &Primitives, regime: Regime, tol: f64) -> Solution {
    let ParameterVector {
        a1,
        a2,
        c1,
        c2,
        p1x,
        p1y,
        p2x,
        p2y,
    } = *p;

    // Interior total-effort schedules: player i supplying both tasks (or all
    // effort to X) totals ((1-ai)*pix/ci)*r^ai; all effort to Y totals
    // (ai*piy/ci)*r^(ai-1).
    let s_interior = |a: f64, px: f64, c: f64, r: f64| (1.0 - a) * px / c * r.powf(a);
    let s_y_only = |a: f64, py: f64, c: f64, r: f64| a * py / c * r.powf(a - 1.0);

    // (r, x1, y1, x2, y2, closed-form totals used for the residual check)
    let (r, x1, y1, x2, y2, s1_form, s2_form) = match regime {
        Regime::BX => {
            let r = prim.r1;
            let s1 = s_interior(a1, p1x, c1, r);
            let s2 = s_interior(a2, p2x, c2, r);
            let y1 = r * (p1x * s1 + p2x * s2) / (p1y + r * p1x);
            (r, s1 - y1, y1, s2, 0.0, s1, s2)
        }
        Regime::XB => {
            let r = prim.r2;
            let s1 = s_interior(a1, p1x, c1, r);
            let s2 = s_interior(a2, p2x, c2, r);
            let y2 = r * (p1x * s1 + p2x * s2) / (p2y + r * p2x);
            (r, s1, 0.0, s2 - y2, y2, s1, s2)
        }
        Regime::BY => {
            let r = prim.r1;
            let s1 = s_interior(a1, p1x, c1, r);
            let s2 = s_y_only(a2, p2y, c2, r);
            let y1 = (r * p1x * s1 - p2y * s2) / (p1y + r * p1x);
            (r, s1 - y1, y1, 0.0, s2, s1, s2)
        }
        Regime::YB => {
            let r = prim.r2;
            let s2 = s_interior(a2, p2x, c2, r);
            let s1 = s_y_only(a1, p1y, c1, r);
            let y2 = (r * p2x * s2 - p1y * s1) / (p2y + r * p2x);
            (r, 0.0, s1, s2 - y2, y2, s1, s2)
        }
        Regime::XY => {
            let r = prim.r_star_xy;
            let x1 = s_interior(a1, p1x, c1, r);
            let y2 = s_y_only(a2, p2y, c2, r);
            (r, x1, 0.0, 0.0, y2, x1, y2)
        }
        Regime::YX => {
            let r = prim.r_star_yx;
            let y1 = s_y_only(a1, p1y, c1, r);
            let x2 = s_interior(a2, p2x, c2, r);
            (r, 0.0, y1, x2, 0.0, y1, x2)
        }
        Regime::BB => {
            // Knife-edge: r1 == r2 within tolerance, so player totals are
            // pinned but the split between tasks is indeterminate. Select the
            // canonical equal-fraction-to-X rule: every player routes the
            // same fraction lambda of total effort to X.
            let r = prim.r1;
            let s1 = s_interior(a1, p1x, c1, r);
            let s2 = s_interior(a2, p2x, c2, r);
            let sx = p1x * s1 + p2x * s2;
            let sy = p1y * s1 + p2y * s2;
            let lambda = sy / (sy + r * sx);
            (
                r,
                lambda * s1,
                (1.0 - lambda) * s1,
                lambda * s2,
                (1.0 - lambda) * s2,
                s1,
                s2,
            )
        }
    };

    let s1 = x1 + y1;
    let s2 = x2 + y2;
    let output_x = p1x * x1 + p2x * x2;
    let output_y = p1y * y1 + p2y * y2;
    let output_ratio = if output_x > 0.0 {
        output_y / output_x
    } else {
        f64::INFINITY
    };

    let mut active_foc_residuals = Vec::with_capacity(4);
    let mut inactive_kkt_margins = Vec::with_capacity(2);
    let conditions = [
        (EffortVar::X1, x1, foc_x(a1, p1x, c1, s1, r)),
        (EffortVar::Y1, y1, foc_y(a1, p1y, c1, s1, r)),
        (EffortVar::X2, x2, foc_x(a2, p2x, c2, s2, r)),
        (EffortVar::Y2, y2, foc_y(a2, p2y, c2, s2, r)),
    ];
    for (var, effort, value) in conditions {
        if effort > tol {
            active_foc_residuals.push((var, value));
        } else {
            inactive_kkt_margins.push((var, value));
        }
    }

    let ratio_identity_abs_error = if output_ratio.is_finite() {
        (output_ratio - r).abs()
    } else {
        f64::INFINITY
    };

    Solution {
        regime,
        r,
        x1,
        y1,
        x2,
        y2,
        s1,
        s2,
        output_x,
        output_y,
        output_ratio,
        diagnostics: Diagnostics {
            active_foc_residuals,
            inactive_kkt_margins,
            ratio_identity_abs_error,
            s1_residual: s1_form - s1,
            s2_residual: s2_form - s2,
        },
    }
}
