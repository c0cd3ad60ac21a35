//! Configuration for the scalar best-response optimizer.
//!
//! Provides types and functions for loading search settings from YAML.
//! The coarse-scan resolution and golden-section bracket width are tunable
//! settings with empirically chosen defaults, not algorithmic constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search settings for [`crate::optimizer::optimize_a2`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizerConfig {
    /// Lower edge of the open search interval for `a2`.
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Upper edge of the open search interval for `a2`.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    /// Number of points in the coarse global scan.
    #[serde(default = "default_coarse_points")]
    pub coarse_points: usize,
    /// Golden-section convergence width.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Cap on golden-section iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Tolerance handed to the equilibrium engine on every oracle call.
    #[serde(default = "default_solver_tolerance")]
    pub solver_tolerance: f64,
    /// Inward nudge applied to both bounds to respect the open interval.
    #[serde(default = "default_edge_epsilon")]
    pub edge_epsilon: f64,
}

fn default_lower_bound() -> f64 {
    1e-6
}

fn default_upper_bound() -> f64 {
    1.0 - 1e-6
}

fn default_coarse_points() -> usize {
    2000
}

fn default_tolerance() -> f64 {
    1e-5
}

fn default_max_iterations() -> u32 {
    200
}

fn default_solver_tolerance() -> f64 {
    1e-10
}

fn default_edge_epsilon() -> f64 {
    1e-9
}

impl OptimizerConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// settings fail validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the settings fail
    /// validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0 < self.lower_bound
            && self.lower_bound < self.upper_bound
            && self.upper_bound < 1.0)
        {
            return Err(ConfigError::InvalidBounds {
                lo: self.lower_bound,
                hi: self.upper_bound,
            });
        }
        if self.coarse_points < 2 {
            return Err(ConfigError::TooFewCoarsePoints(self.coarse_points));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ConfigError::NonPositiveTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(self.solver_tolerance > 0.0 && self.solver_tolerance.is_finite()) {
            return Err(ConfigError::NonPositiveTolerance(self.solver_tolerance));
        }
        if !(self.edge_epsilon > 0.0
            && self.edge_epsilon < (self.upper_bound - self.lower_bound) / 2.0)
        {
            return Err(ConfigError::InvalidEdgeEpsilon(self.edge_epsilon));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
            coarse_points: default_coarse_points(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            solver_tolerance: default_solver_tolerance(),
            edge_epsilon: default_edge_epsilon(),
        }
    }
}

/// Errors that can occur when loading or validating optimizer settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("failed to read config file {0}: {1}")]
    Io(std::path::PathBuf, #[source] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Bounds not nested in the open unit interval
    #[error("invalid bounds: require 0 < lo < hi < 1, got lo={lo}, hi={hi}")]
    InvalidBounds { lo: f64, hi: f64 },

    /// Coarse scan needs at least two points
    #[error("coarse_points must be >= 2, got {0}")]
    TooFewCoarsePoints(usize),

    /// Tolerances must be strictly positive
    #[error("tolerance must be > 0 and finite, got {0}")]
    NonPositiveTolerance(f64),

    /// Iteration cap of zero would skip refinement entirely
    #[error("max_iterations must be > 0")]
    ZeroIterations,

    /// Edge nudge must be positive and small relative to the interval
    #[error("edge_epsilon must be > 0 and less than half the interval, got {0}")]
    InvalidEdgeEpsilon(f64),
}
