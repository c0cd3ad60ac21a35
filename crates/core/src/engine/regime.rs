//! Regime labels and per-regime feasibility records.

use std::fmt;

use serde::Serialize;

/// Activity pattern of the equilibrium, one tag per player.
///
/// `B` means the player supplies effort to both tasks; `X` or `Y` means the
/// player works only the named task. The first letter describes player 1,
/// the second player 2. Exactly one regime holds for generic parameters;
/// knife-edge parameters can satisfy several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Regime {
    /// Player 1 interior, player 2 on task X only.
    BX,
    /// Player 1 on task X only, player 2 interior.
    XB,
    /// Player 1 interior, player 2 on task Y only.
    BY,
    /// Player 1 on task Y only, player 2 interior.
    YB,
    /// Player 1 on task X only, player 2 on task Y only.
    XY,
    /// Player 1 on task Y only, player 2 on task X only.
    YX,
    /// Both players interior. Knife-edge: requires `r1 == r2`.
    BB,
}

impl Regime {
    /// All seven regimes, in the order they are tested.
    pub const ALL: [Self; 7] = [
        Self::BX,
        Self::XB,
        Self::BY,
        Self::YB,
        Self::XY,
        Self::YX,
        Self::BB,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BX => "B,X",
            Self::XB => "X,B",
            Self::BY => "B,Y",
            Self::YB => "Y,B",
            Self::XY => "X,Y",
            Self::YX => "Y,X",
            Self::BB => "B,B",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One signed feasibility slack. The sign convention (whether the value must
/// be non-negative, non-positive, or near zero) is fixed per margin name and
/// documented where the candidate is built.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub name: &'static str,
    pub value: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// Feasibility verdict for one regime, with its raw margins.
///
/// Candidates are produced for all seven regimes on every solve, pass or
/// fail, so callers can always inspect why a regime was ruled out.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateCase {
    pub regime: Regime,
    pub passed: bool,
    pub margins: Vec<Margin>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::timed_test;

    #[timed_test]
    fn seven_distinct_labels() {
        assert_eq!(Regime::ALL.len(), 7);
        for (i, a) in Regime::ALL.iter().enumerate() {
            for b in Regime::ALL.iter().skip(i + 1) {
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[timed_test]
    fn display_matches_label() {
        assert_eq!(Regime::BX.to_string(), "B,X");
        assert_eq!(Regime::BB.to_string(), "B,B");
        assert_eq!(format!("{}", Regime::YX), "Y,X");
    }
}
