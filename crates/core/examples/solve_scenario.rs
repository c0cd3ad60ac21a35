//! End-to-end walkthrough: classify a scenario, audit the equilibrium,
//! then search for player 2's taste exponent that serves player 1 best.
//!
//! Usage: cargo run -p team-solver-core --example solve_scenario

use team_solver_core::config::OptimizerConfig;
use team_solver_core::engine::{self, EngineResult};
use team_solver_core::optimizer::optimize_a2;
use team_solver_core::params::{FixedParameters, ParameterVector, Player};
use team_solver_core::utility::payoff_fn;
use team_solver_core::verifier::check_local_nash;

fn main() {
    let params = ParameterVector::new(0.45, 0.55, 1.0, 1.2, 1.0, 1.1, 0.9, 1.3).unwrap();

    println!("=== Regime classification ===\n");
    let result = engine::solve(&params, 1e-10).unwrap();
    for case in result.candidates() {
        let verdict = if case.passed { "pass" } else { "fail" };
        println!("  ({}) {}", case.regime, verdict);
        for margin in &case.margins {
            println!("      {} = {:+.3e}", margin.name, margin.value);
        }
    }

    let EngineResult::Unique { solution, .. } = result else {
        println!("\nno unique equilibrium for these parameters");
        return;
    };
    println!("\n=== Equilibrium ({}) ===\n", solution.regime);
    println!("  x1 = {:.6}  y1 = {:.6}", solution.x1, solution.y1);
    println!("  x2 = {:.6}  y2 = {:.6}", solution.x2, solution.y2);
    println!("  output ratio Y/X = {:.6}", solution.output_ratio);

    println!("\n=== Local Nash audit (step 0.01) ===\n");
    let u1 = payoff_fn(params, Player::Player1);
    let u2 = payoff_fn(params, Player::Player2);
    let audit = check_local_nash(&u1, &u2, &solution.efforts(), 0.01, 1e-9).unwrap();
    println!("  player 1 best response: {}", audit.player1.is_best_response);
    println!("  player 2 best response: {}", audit.player2.is_best_response);
    println!("  local Nash: {}", audit.is_local_nash);

    println!("\n=== Optimal a2 for player 1 ===\n");
    let fixed = FixedParameters::new(0.45, 1.0, 1.2, 1.0, 1.1, 0.9, 1.3).unwrap();
    let search = optimize_a2(&fixed, &OptimizerConfig::default()).unwrap();
    println!("  best a2  = {:.6}", search.best_a2);
    println!("  utility  = {:.6}", search.utility);
    match search.regime {
        Some(regime) => println!("  regime   = {regime}"),
        None => println!("  regime   = (none)"),
    }
    println!("  trials   = {}", search.samples.len());
    println!("  low confidence: {}", search.low_confidence);
}
