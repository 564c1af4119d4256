// src/analysis/mod.rs

//! Survey of every ship against every bomb pair.

use crate::core::Result;
use crate::damage::{intact_percentage, DamageAggregator, EvaluationConfig};
use crate::protocol::{BombSelection, Ship};
use std::fmt;

/// One evaluated scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyRow {
    pub ship: Ship,
    pub bombs: BombSelection,
    pub damage: f64,
}

/// Damage for all 6 × 10 scenarios, ships in label order and bomb pairs
/// lexicographic within each ship.
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    rows: Vec<SurveyRow>,
}

impl Survey {
    /// All rows.
    pub fn rows(&self) -> &[SurveyRow] {
        &self.rows
    }

    /// Rows for one ship.
    pub fn for_ship(&self, ship: Ship) -> impl Iterator<Item = &SurveyRow> {
        self.rows.iter().filter(move |row| row.ship == ship)
    }

    /// Damage of a specific scenario, if surveyed.
    pub fn damage(&self, ship: Ship, bombs: &BombSelection) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.ship == ship && row.bombs == *bombs)
            .map(|row| row.damage)
    }
}

/// Evaluates every scenario under `config`.
pub fn survey(config: &EvaluationConfig) -> Result<Survey> {
    let aggregator = DamageAggregator::new(config.clone())?;
    let bomb_pairs = BombSelection::all_pairs();
    let mut rows = Vec::with_capacity(Ship::ALL.len() * bomb_pairs.len());
    for ship in Ship::ALL {
        for bombs in &bomb_pairs {
            let report = aggregator.evaluate(ship.position(), bombs)?;
            rows.push(SurveyRow { ship, bombs: *bombs, damage: report.damage });
        }
    }
    Ok(Survey { rows })
}

impl fmt::Display for Survey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ship in Ship::ALL {
            for row in self.for_ship(ship) {
                writeln!(
                    f,
                    "ship={}, bombs={}: The ship is {:.4}% intact",
                    row.ship,
                    row.bombs,
                    intact_percentage(row.damage)
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
