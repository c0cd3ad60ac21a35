use thiserror::Error;

/// Errors that can occur in the solver
#[derive(Debug, Error)]
pub enum SolverError {
    /// A taste exponent left the open unit interval.
    #[error("{name} must lie in the open interval (0,1), got {value}")]
    ShareOutOfRange { name: &'static str, value: f64 },

    /// A cost or productivity was zero, negative, or non-finite.
    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// Search bounds for the scalar optimizer were not nested in (0,1).
    #[error("invalid search bounds: require 0 < lo < hi < 1, got lo={lo}, hi={hi}")]
    InvalidBounds { lo: f64, hi: f64 },

    /// The verifier's base point evaluated to a non-finite payoff.
    #[error("baseline utility is not finite ({value}); the base point must lie inside the payoff domain")]
    UnevaluableBaseline { value: f64 },

    /// The verifier was given a non-positive perturbation step.
    #[error("step size must be strictly positive, got {0}")]
    InvalidStep(f64),
}
