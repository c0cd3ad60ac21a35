//! Game parameters and effort points.
//!
//! [`ParameterVector`] holds the eight primitives of the two-task game and is
//! validated on construction: taste exponents live in the open unit interval,
//! costs and productivities are strictly positive. [`FixedParameters`] is the
//! same vector minus `a2`, used by the scalar optimizer which sweeps `a2`.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Player in the two-player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Player1,
    Player2,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

/// The eight primitives of the two-player, two-task Cobb-Douglas game.
///
/// `a1`, `a2` are the players' taste exponents on task Y output; `c1`, `c2`
/// are quadratic effort-cost coefficients; `pix`, `piy` are player `i`'s
/// per-unit productivities on tasks X and Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    pub a1: f64,
    pub a2: f64,
    pub c1: f64,
    pub c2: f64,
    pub p1x: f64,
    pub p1y: f64,
    pub p2x: f64,
    pub p2y: f64,
}

impl ParameterVector {
    /// Build a validated parameter vector.
    ///
    /// # Errors
    ///
    /// Returns an error if `a1` or `a2` is outside `(0,1)`, or if any cost or
    /// productivity is not strictly positive and finite.
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    pub fn new(
        a1: f64,
        a2: f64,
        c1: f64,
        c2: f64,
        p1x: f64,
        p1y: f64,
        p2x: f64,
        p2y: f64,
    ) -> Result<Self, SolverError> {
        let params = Self {
            a1,
            a2,
            c1,
            c2,
            p1x,
            p1y,
            p2x,
            p2y,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its required domain.
    ///
    /// # Errors
    ///
    /// Returns the first domain violation found.
    pub fn validate(&self) -> Result<(), SolverError> {
        check_share("a1", self.a1)?;
        check_share("a2", self.a2)?;
        check_positive("c1", self.c1)?;
        check_positive("c2", self.c2)?;
        check_positive("p1x", self.p1x)?;
        check_positive("p1y", self.p1y)?;
        check_positive("p2x", self.p2x)?;
        check_positive("p2y", self.p2y)?;
        Ok(())
    }

    /// Same vector with `a2` replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the new `a2` is outside `(0,1)`.
    pub fn with_a2(mut self, a2: f64) -> Result<Self, SolverError> {
        check_share("a2", a2)?;
        self.a2 = a2;
        Ok(self)
    }
}

/// All parameters except player 2's taste exponent `a2`.
///
/// The scalar optimizer substitutes a trial `a2` into this to form a full
/// [`ParameterVector`] for each oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedParameters {
    pub a1: f64,
    pub c1: f64,
    pub c2: f64,
    pub p1x: f64,
    pub p1y: f64,
    pub p2x: f64,
    pub p2y: f64,
}

impl FixedParameters {
    /// Build a validated seven-parameter vector.
    ///
    /// # Errors
    ///
    /// Returns the first domain violation found.
    #[allow(clippy::too_many_arguments, clippy::similar_names)]
    pub fn new(
        a1: f64,
        c1: f64,
        c2: f64,
        p1x: f64,
        p1y: f64,
        p2x: f64,
        p2y: f64,
    ) -> Result<Self, SolverError> {
        check_share("a1", a1)?;
        check_positive("c1", c1)?;
        check_positive("c2", c2)?;
        check_positive("p1x", p1x)?;
        check_positive("p1y", p1y)?;
        check_positive("p2x", p2x)?;
        check_positive("p2y", p2y)?;
        Ok(Self {
            a1,
            c1,
            c2,
            p1x,
            p1y,
            p2x,
            p2y,
        })
    }

    /// Complete the vector with a trial `a2`.
    ///
    /// # Errors
    ///
    /// Returns an error if `a2` is outside `(0,1)`.
    pub fn with_a2(&self, a2: f64) -> Result<ParameterVector, SolverError> {
        check_share("a2", a2)?;
        Ok(ParameterVector {
            a1: self.a1,
            a2,
            c1: self.c1,
            c2: self.c2,
            p1x: self.p1x,
            p1y: self.p1y,
            p2x: self.p2x,
            p2y: self.p2y,
        })
    }
}

/// A full effort allocation: both players' efforts on both tasks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortPoint {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl EffortPoint {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The given player's own `(x, y)` efforts.
    #[must_use]
    pub const fn own(&self, player: Player) -> (f64, f64) {
        match player {
            Player::Player1 => (self.x1, self.y1),
            Player::Player2 => (self.x2, self.y2),
        }
    }

    /// Copy of this point with the given player's efforts replaced,
    /// the opponent's held fixed.
    #[must_use]
    pub const fn with_own(mut self, player: Player, x: f64, y: f64) -> Self {
        match player {
            Player::Player1 => {
                self.x1 = x;
                self.y1 = y;
            }
            Player::Player2 => {
                self.x2 = x;
                self.y2 = y;
            }
        }
        self
    }

    /// The given player's total effort `x + y`.
    #[must_use]
    pub fn total(&self, player: Player) -> f64 {
        let (x, y) = self.own(player);
        x + y
    }
}

fn check_share(name: &'static str, value: f64) -> Result<(), SolverError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SolverError::ShareOutOfRange { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SolverError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::timed_test;

    fn valid() -> ParameterVector {
        ParameterVector::new(0.45, 0.55, 1.0, 1.2, 1.0, 1.1, 0.9, 1.3).unwrap()
    }

    #[timed_test]
    fn accepts_valid_vector() {
        let p = valid();
        assert!(p.validate().is_ok());
    }

    #[timed_test]
    fn rejects_share_at_boundaries() {
        for bad in [0.0, 1.0, -0.2, 1.7, f64::NAN] {
            let result = ParameterVector::new(bad, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
            assert!(matches!(
                result,
                Err(SolverError::ShareOutOfRange { name: "a1", .. })
            ));
        }
    }

    #[timed_test]
    fn rejects_non_positive_productivity() {
        let result = ParameterVector::new(0.5, 0.5, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            result,
            Err(SolverError::NonPositive { name: "p1x", .. })
        ));

        let result = ParameterVector::new(0.5, 0.5, 1.0, 1.0, 1.0, 1.0, -3.0, 1.0);
        assert!(matches!(
            result,
            Err(SolverError::NonPositive { name: "p2x", .. })
        ));
    }

    #[timed_test]
    fn rejects_infinite_cost() {
        let result = ParameterVector::new(0.5, 0.5, f64::INFINITY, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            result,
            Err(SolverError::NonPositive { name: "c1", .. })
        ));
    }

    #[timed_test]
    fn with_a2_replaces_only_a2() {
        let p = valid().with_a2(0.3).unwrap();
        assert!((p.a2 - 0.3).abs() < 1e-15);
        assert!((p.a1 - 0.45).abs() < 1e-15);
        assert!(valid().with_a2(1.0).is_err());
    }

    #[timed_test]
    fn fixed_parameters_complete_to_full_vector() {
        let fixed = FixedParameters::new(0.45, 1.0, 1.2, 1.0, 1.1, 0.9, 1.3).unwrap();
        let full = fixed.with_a2(0.55).unwrap();
        assert_eq!(full, valid());
    }

    #[timed_test]
    fn effort_point_own_and_with_own() {
        let pt = EffortPoint::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(pt.own(Player::Player1), (1.0, 2.0));
        assert_eq!(pt.own(Player::Player2), (3.0, 4.0));

        let moved = pt.with_own(Player::Player2, 5.0, 6.0);
        assert_eq!(moved.own(Player::Player1), (1.0, 2.0));
        assert_eq!(moved.own(Player::Player2), (5.0, 6.0));
        assert!((moved.total(Player::Player2) - 11.0).abs() < 1e-15);
    }

    #[timed_test]
    fn opponent_flips() {
        assert_eq!(Player::Player1.opponent(), Player::Player2);
        assert_eq!(Player::Player2.opponent(), Player::Player1);
    }
}
