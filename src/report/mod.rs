// src/report/mod.rs

//! Presentation helpers: verdict and rounded intact/broken percentages.
//!
//! Rounding here only affects display. The damage scalar is never rounded.

use crate::damage::DamageReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the ship survived the bombing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Damage above one half: the bombing player wins.
    Destroyed,
    /// Damage at most one half: the placing player wins.
    Afloat,
}

impl Verdict {
    /// Verdict for a damage value.
    pub fn from_damage(damage: f64) -> Self {
        if damage > 0.5 { Verdict::Destroyed } else { Verdict::Afloat }
    }

    /// The winning player, 1 (ship owner) or 2 (bomber).
    pub fn winner(&self) -> u8 {
        match self {
            Verdict::Destroyed => 2,
            Verdict::Afloat => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Destroyed => write!(f, "It has been destroyed!\nPlayer 2 wins!"),
            Verdict::Afloat => write!(f, "It's still afloat!\nPlayer 1 wins!"),
        }
    }
}

/// How percentages are rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rounding {
    /// Full precision.
    #[default]
    Exact,
    /// Drop the fractional part, toward zero.
    Truncate,
}

impl Rounding {
    /// Applies the policy to `value`.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Exact => value,
            Rounding::Truncate => value.trunc(),
        }
    }
}

/// Human-facing summary of a [`DamageReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntactSummary {
    /// `100 · (1 − 2d)` after rounding.
    pub intact: f64,
    /// `−intact`.
    pub broken: f64,
    /// Who won.
    pub verdict: Verdict,
    rounding: Rounding,
}

impl IntactSummary {
    /// Summarizes `report` under `rounding`.
    pub fn new(report: &DamageReport, rounding: Rounding) -> Self {
        Self {
            intact: rounding.apply(report.intact_percentage()),
            broken: rounding.apply(report.broken_percentage()),
            verdict: report.verdict(),
            rounding,
        }
    }
}

impl fmt::Display for IntactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounding {
            Rounding::Truncate => {
                writeln!(f, "The ship is {}% intact", self.intact as i64)?;
                writeln!(f, "(which means {}% broken).", self.broken as i64)?;
            }
            Rounding::Exact => {
                writeln!(f, "The ship is {}% intact", self.intact)?;
                writeln!(f, "(which means {}% broken).", self.broken)?;
            }
        }
        write!(f, "{}", self.verdict)
    }
}
