//! Discrete local best-response verification.
//!
//! Audits whether an effort allocation is locally undominated for each
//! player by exhaustively probing every non-zero step vector in
//! `{-1,0,+1}^2` over the player's own two efforts, holding the opponent
//! fixed. No gradient information is used: utilities may sit on
//! non-differentiable regime boundaries, where an 8-point exhaustive probe
//! is still sound.

use serde::Serialize;

use crate::error::SolverError;
use crate::params::{EffortPoint, Player};

/// Moves landing below this are rejected as infeasible; values in
/// `[FEASIBILITY_FLOOR, 0)` are treated as floating-point noise and clamped
/// to exactly zero before evaluation.
const FEASIBILITY_FLOOR: f64 = -1e-15;

/// Classification of one candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    /// `dU > tolerance`: the move strictly improves the player's payoff.
    Improves,
    /// `dU < -tolerance`.
    Worsens,
    /// `|dU| <= tolerance`.
    NoChange,
    /// Move rejected (own effort driven below the feasibility floor) or the
    /// shifted point fell outside the payoff domain.
    Infeasible,
}

/// Record of one probed move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    /// Step multipliers applied to the player's `(x, y)` efforts.
    pub steps: (i8, i8),
    /// Utility at the shifted point; `None` when the move was infeasible.
    pub utility: Option<f64>,
    /// `U(moved) - U(base)`; `None` when the move was infeasible.
    pub delta: Option<f64>,
    pub outcome: MoveOutcome,
}

/// Verdict of one player's local best-response check.
#[derive(Debug, Clone, Serialize)]
pub struct BestResponseReport {
    pub player: Player,
    pub base_utility: f64,
    /// True iff no feasible move improved the payoff by more than the
    /// tolerance.
    pub is_best_response: bool,
    pub moves: Vec<MoveReport>,
}

/// Joint verdict: both players' checks at the same base point.
#[derive(Debug, Clone, Serialize)]
pub struct LocalNashReport {
    pub is_local_nash: bool,
    pub player1: BestResponseReport,
    pub player2: BestResponseReport,
}

/// Check whether `base` is a local best response for `player` under
/// `utility`.
///
/// `utility` must return `f64::NEG_INFINITY` (not panic) for points outside
/// its domain. Each of the 8 non-zero step vectors shifts only the player's
/// own two efforts by `±step`; the opponent's efforts are held fixed.
///
/// # Errors
///
/// Returns an error if `step` is not strictly positive or if the baseline
/// utility itself is not finite.
pub fn check_local_best_response<F>(
    utility: &F,
    base: &EffortPoint,
    player: Player,
    step: f64,
    tolerance: f64,
) -> Result<BestResponseReport, SolverError>
where
    F: Fn(&EffortPoint) -> f64,
{
    if !(step > 0.0 && step.is_finite()) {
        return Err(SolverError::InvalidStep(step));
    }
    let base_utility = utility(base);
    if !base_utility.is_finite() {
        return Err(SolverError::UnevaluableBaseline {
            value: base_utility,
        });
    }

    let mut moves = Vec::with_capacity(8);
    let mut improved = false;

    for dx in [-1i8, 0, 1] {
        for dy in [-1i8, 0, 1] {
            if dx == 0 && dy == 0 {
                continue;
            }
            let Some(moved) = shifted(base, player, dx, dy, step) else {
                moves.push(MoveReport {
                    steps: (dx, dy),
                    utility: None,
                    delta: None,
                    outcome: MoveOutcome::Infeasible,
                });
                continue;
            };

            let u = utility(&moved);
            if u == f64::NEG_INFINITY {
                // Out-of-domain neighbour: never counts as a deviation.
                moves.push(MoveReport {
                    steps: (dx, dy),
                    utility: None,
                    delta: None,
                    outcome: MoveOutcome::Infeasible,
                });
                continue;
            }

            let delta = u - base_utility;
            let outcome = if delta > tolerance {
                improved = true;
                MoveOutcome::Improves
            } else if delta < -tolerance {
                MoveOutcome::Worsens
            } else {
                MoveOutcome::NoChange
            };
            moves.push(MoveReport {
                steps: (dx, dy),
                utility: Some(u),
                delta: Some(delta),
                outcome,
            });
        }
    }

    Ok(BestResponseReport {
        player,
        base_utility,
        is_best_response: !improved,
        moves,
    })
}

/// Check whether `base` is a local Nash equilibrium: both players must
/// independently pass their own local best-response check.
///
/// # Errors
///
/// Propagates the first per-player check failure.
pub fn check_local_nash<F1, F2>(
    utility1: &F1,
    utility2: &F2,
    base: &EffortPoint,
    step: f64,
    tolerance: f64,
) -> Result<LocalNashReport, SolverError>
where
    F1: Fn(&EffortPoint) -> f64,
    F2: Fn(&EffortPoint) -> f64,
{
    let player1 = check_local_best_response(utility1, base, Player::Player1, step, tolerance)?;
    let player2 = check_local_best_response(utility2, base, Player::Player2, step, tolerance)?;
    Ok(LocalNashReport {
        is_local_nash: player1.is_best_response && player2.is_best_response,
        player1,
        player2,
    })
}

/// Shift the player's own efforts, applying the feasibility policy.
/// `None` means the move is rejected entirely.
fn shifted(base: &EffortPoint, player: Player, dx: i8, dy: i8, step: f64) -> Option<EffortPoint> {
    let (x, y) = base.own(player);
    let nx = clamp_feasible(x + step * f64::from(dx))?;
    let ny = clamp_feasible(y + step * f64::from(dy))?;
    Some(base.with_own(player, nx, ny))
}

fn clamp_feasible(value: f64) -> Option<f64> {
    if value < FEASIBILITY_FLOOR {
        None
    } else if value < 0.0 {
        Some(0.0)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::timed_test;

    /// Concave bowl in the player's own efforts, peak at (1, 1).
    fn bowl(player: Player) -> impl Fn(&EffortPoint) -> f64 {
        move |pt: &EffortPoint| {
            let (x, y) = pt.own(player);
            -((x - 1.0).powi(2) + (y - 1.0).powi(2))
        }
    }

    #[timed_test]
    fn peak_is_a_local_best_response() {
        let u = bowl(Player::Player1);
        let base = EffortPoint::new(1.0, 1.0, 0.3, 0.7);
        let report =
            check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        assert!(report.is_best_response);
        assert_eq!(report.moves.len(), 8);
        assert!(report
            .moves
            .iter()
            .all(|m| m.outcome == MoveOutcome::Worsens));
    }

    #[timed_test]
    fn off_peak_point_is_dominated() {
        let u = bowl(Player::Player1);
        let base = EffortPoint::new(0.5, 1.0, 0.3, 0.7);
        let report =
            check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        assert!(!report.is_best_response);
        assert!(report
            .moves
            .iter()
            .any(|m| m.outcome == MoveOutcome::Improves));
    }

    #[timed_test]
    fn opponent_variables_never_move() {
        let base = EffortPoint::new(1.0, 1.0, 0.3, 0.7);
        let u = |pt: &EffortPoint| {
            assert!(
                (pt.x2 - 0.3).abs() < 1e-15 && (pt.y2 - 0.7).abs() < 1e-15,
                "player 1's probes must hold player 2 fixed"
            );
            let (x, y) = pt.own(Player::Player1);
            -((x - 1.0).powi(2) + (y - 1.0).powi(2))
        };
        let report = check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        assert!(report.is_best_response);
    }

    #[timed_test]
    fn negative_moves_below_floor_are_rejected() {
        let u = bowl(Player::Player1);
        // x1 = 0, so any -step move on x1 lands well below the floor.
        let base = EffortPoint::new(0.0, 1.0, 0.3, 0.7);
        let report =
            check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        let infeasible = report
            .moves
            .iter()
            .filter(|m| m.outcome == MoveOutcome::Infeasible)
            .count();
        assert_eq!(infeasible, 3); // the three moves with dx = -1
    }

    #[timed_test]
    fn float_noise_is_clamped_to_zero_not_rejected() {
        // base - step lands a few ulps below zero: inside the noise band.
        let step = 0.01 + 5e-16;
        let u = |pt: &EffortPoint| {
            assert!(pt.x1 >= 0.0, "clamping must not pass negative efforts");
            -pt.x1
        };
        let base = EffortPoint::new(0.01, 1.0, 0.3, 0.7);
        let report = check_local_best_response(&u, &base, Player::Player1, step, 1e-12).unwrap();
        let down_x = report
            .moves
            .iter()
            .find(|m| m.steps == (-1, 0))
            .unwrap();
        // Clamped to exactly zero and evaluated, not rejected.
        assert_eq!(down_x.outcome, MoveOutcome::Improves);
        assert!((down_x.utility.unwrap() - 0.0).abs() < 1e-15);
    }

    #[timed_test]
    fn out_of_domain_neighbour_is_not_an_improvement() {
        let u = |pt: &EffortPoint| {
            if pt.x1 > 0.5 {
                f64::NEG_INFINITY
            } else {
                pt.x1
            }
        };
        let base = EffortPoint::new(0.495, 1.0, 0.3, 0.7);
        let report =
            check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        let up_x = report.moves.iter().find(|m| m.steps == (1, 0)).unwrap();
        assert_eq!(up_x.outcome, MoveOutcome::Infeasible);
        assert!(up_x.utility.is_none());
    }

    #[timed_test]
    fn non_finite_baseline_is_an_error() {
        let u = |_: &EffortPoint| f64::NEG_INFINITY;
        let base = EffortPoint::new(0.1, 0.1, 0.1, 0.1);
        assert!(matches!(
            check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12),
            Err(SolverError::UnevaluableBaseline { .. })
        ));
    }

    #[timed_test]
    fn zero_step_is_an_error() {
        let u = bowl(Player::Player1);
        let base = EffortPoint::new(1.0, 1.0, 0.3, 0.7);
        assert!(matches!(
            check_local_best_response(&u, &base, Player::Player1, 0.0, 1e-12),
            Err(SolverError::InvalidStep(_))
        ));
    }

    #[timed_test]
    fn joint_verdict_requires_both_players() {
        let u1 = bowl(Player::Player1);
        let u2 = bowl(Player::Player2);

        let nash = EffortPoint::new(1.0, 1.0, 1.0, 1.0);
        let report = check_local_nash(&u1, &u2, &nash, 0.01, 1e-12).unwrap();
        assert!(report.is_local_nash);

        let off = EffortPoint::new(1.0, 1.0, 0.4, 1.0);
        let report = check_local_nash(&u1, &u2, &off, 0.01, 1e-12).unwrap();
        assert!(!report.is_local_nash);
        assert!(report.player1.is_best_response);
        assert!(!report.player2.is_best_response);
    }

    #[timed_test]
    fn verdict_is_deterministic() {
        let u = bowl(Player::Player1);
        let base = EffortPoint::new(1.0, 1.0, 0.3, 0.7);
        let first = check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        let second = check_local_best_response(&u, &base, Player::Player1, 0.01, 1e-12).unwrap();
        assert_eq!(first.is_best_response, second.is_best_response);
        assert!(first.is_best_response);
    }
}
