//! One round of Quantum Battleships, sampled the way the game is played.
//!
//! Usage: `cargo run --example play_round -- <ship> <bomb> <bomb> [seed]`
//! e.g. `cargo run --example play_round -- a 0 1`. Set `RUST_LOG=debug` to
//! see circuit construction and batch progress.

use qbattleships::core::NUM_SAMPLES_FOR_GAME;
use qbattleships::protocol::build_scenario;
use qbattleships::{BombSelection, DamageAggregator, EvaluationConfig, IntactSummary, QbsError, Rounding, Ship};
use tracing_subscriber::EnvFilter;

fn parse_qubit(arg: Option<String>, default: usize) -> Result<usize, QbsError> {
    match arg {
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| QbsError::invalid_operation(format!("'{}' is not a qubit index", text))),
        None => Ok(default),
    }
}

fn main() -> Result<(), QbsError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let ship: Ship = args.next().as_deref().unwrap_or("a").parse()?;
    let first = parse_qubit(args.next(), 0)?;
    let second = parse_qubit(args.next(), 1)?;
    let seed = args.next().and_then(|s| s.parse().ok());

    let bombs = BombSelection::new(first, second)?;
    println!("Player 1 placed ship {} on qubits {:?}.", ship, ship.position().qubits());
    println!("Player 2 bombs qubits {}.\n", bombs);
    println!("{}", build_scenario(ship.position(), &bombs));

    let mut config = EvaluationConfig::stochastic(NUM_SAMPLES_FOR_GAME);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let report = DamageAggregator::new(config)?.evaluate(ship.position(), &bombs)?;

    println!("{}", IntactSummary::new(&report, Rounding::Truncate));
    Ok(())
}
