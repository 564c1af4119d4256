//! Exact damage for every ship against every bomb pair.

use qbattleships::analysis;
use qbattleships::{EvaluationConfig, QbsError, Verdict};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), QbsError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let survey = analysis::survey(&EvaluationConfig::analytic())?;
    print!("{}", survey);

    let sunk = survey
        .rows()
        .iter()
        .filter(|row| Verdict::from_damage(row.damage) == Verdict::Destroyed)
        .count();
    println!("{} of {} scenarios sink the ship.", sunk, survey.rows().len());
    Ok(())
}
