#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Team Solver Core Library
//!
//! Closed-form equilibrium analysis of a two-player, two-task
//! effort-allocation game with Cobb-Douglas production: each player splits
//! effort between tasks X and Y, outputs aggregate across players, and each
//! player's payoff is an output share minus a quadratic effort cost.
//!
//! # Modules
//!
//! - `engine` - regime classification and closed-form equilibria with
//!   first-order/KKT diagnostics
//! - `verifier` - discrete local best-response and local Nash checks
//! - `optimizer` - scalar search for the `a2` maximizing player 1's utility
//! - `sweep` - parallel `a1` sweeps over the optimizer
//! - `utility` - Cobb-Douglas-minus-quadratic-cost payoffs
//! - `config` - optimizer settings (YAML-loadable)
//! - `error` - error types

pub mod config;
pub mod engine;
pub mod error;
pub mod optimizer;
pub mod params;
pub mod sweep;
pub mod utility;
pub mod verifier;

pub use config::OptimizerConfig;
pub use engine::{solve, EngineResult, Regime, Solution};
pub use error::SolverError;
pub use optimizer::{optimize_a2, OptimizationResult};
pub use params::{EffortPoint, FixedParameters, ParameterVector, Player};
pub use verifier::{check_local_best_response, check_local_nash};
