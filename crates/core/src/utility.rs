//! Cobb-Douglas-minus-quadratic-cost payoffs.
//!
//! Player `i` earns `X^(1-ai) * Y^ai - 0.5 * ci * (xi + yi)^2`, where `X`
//! and `Y` are the aggregate task outputs across both players. Evaluation
//! outside the domain (either aggregate output non-positive) yields negative
//! infinity rather than an error, so infeasible neighbours can never be
//! mistaken for improving moves during local search.

use crate::engine::Solution;
use crate::params::{EffortPoint, ParameterVector, Player};

/// Aggregate task outputs `(X, Y)` at an effort point.
#[must_use]
pub fn aggregate_outputs(params: &ParameterVector, point: &EffortPoint) -> (f64, f64) {
    (
        params.p1x * point.x1 + params.p2x * point.x2,
        params.p1y * point.y1 + params.p2y * point.y2,
    )
}

/// Payoff of `player` at a full effort point, negative infinity out of
/// domain.
#[must_use]
pub fn payoff(params: &ParameterVector, player: Player, point: &EffortPoint) -> f64 {
    let (x_out, y_out) = aggregate_outputs(params, point);
    if x_out <= 0.0 || y_out <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let (a, c) = match player {
        Player::Player1 => (params.a1, params.c1),
        Player::Player2 => (params.a2, params.c2),
    };
    let s = point.total(player);
    x_out.powf(1.0 - a) * y_out.powf(a) - 0.5 * c * s * s
}

/// Closure form of [`payoff`] for use with the local best-response verifier.
pub fn payoff_fn(params: ParameterVector, player: Player) -> impl Fn(&EffortPoint) -> f64 {
    move |point| payoff(&params, player, point)
}

/// Extract `player`'s utility from an engine solution.
///
/// Returns `None` when the solution lies outside the payoff domain (either
/// aggregate output non-positive) or the value is not finite — the caller
/// treats such trials as infeasible.
#[must_use]
pub fn utility_from_solution(
    solution: &Solution,
    player: Player,
    params: &ParameterVector,
) -> Option<f64> {
    if solution.output_x <= 0.0 || solution.output_y <= 0.0 {
        return None;
    }
    let (a, c) = match player {
        Player::Player1 => (params.a1, params.c1),
        Player::Player2 => (params.a2, params.c2),
    };
    let s = match player {
        Player::Player1 => solution.s1,
        Player::Player2 => solution.s2,
    };
    let u = solution.output_x.powf(1.0 - a) * solution.output_y.powf(a) - 0.5 * c * s * s;
    u.is_finite().then_some(u)
}
