// src/damage/mod.rs

//! Damage aggregation: repeated scenario runs folded into one distribution
//! and reduced to the ship's damage.
//!
//! Damage is the probability that the two ship qubits read differently,
//! obtained by summing the `01` and `10` ship patterns over all eight
//! assignments of the three spectator qubits.

mod config;

pub use config::EvaluationConfig;

use crate::circuits::Circuit;
use crate::core::{basis, QbsError, Result, REGISTER_SIZE};
use crate::protocol::{self, BombSelection, ShipPosition};
use crate::report::Verdict;
use crate::simulation::{MeasurementMode, ProbabilityDistribution, Simulator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Marginal probability that the ship qubits disagree.
///
/// Enumerates the spectator assignments and, for each, adds the mass of the
/// basis states with bits `(0, 1)` and `(1, 0)` on the (lower, higher) ship
/// qubit.
pub fn damage_from_distribution(dist: &ProbabilityDistribution, ship: ShipPosition) -> Result<f64> {
    if dist.num_qubits() != REGISTER_SIZE {
        return Err(QbsError::dimension_mismatch(REGISTER_SIZE, dist.num_qubits()));
    }
    let [a, b] = ship.qubits();
    let (lower, higher) = (a.min(b), a.max(b));
    let spectators = ship.spectators();
    let k = spectators.len();

    let mut damage = 0.0;
    let mut bits = [0u8; REGISTER_SIZE];
    for assignment in 0..(1usize << k) {
        for (m, q) in spectators.iter().enumerate() {
            bits[*q] = ((assignment >> (k - 1 - m)) & 1) as u8;
        }
        for (bit_lower, bit_higher) in [(0, 1), (1, 0)] {
            bits[lower] = bit_lower;
            bits[higher] = bit_higher;
            damage += dist.probability(basis::index_from_bits(&bits));
        }
    }
    Ok(damage)
}

/// Maps damage in `[0, 1]` to the intactness observable in `[-100, 100]`:
/// `100 · (1 − 2d)`.
pub fn intact_percentage(damage: f64) -> f64 {
    100.0 * (1.0 - 2.0 * damage)
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageReport {
    /// Marginal probability that the ship qubits disagree.
    pub damage: f64,
    /// Mean distribution over the completed repetitions.
    pub distribution: ProbabilityDistribution,
    /// Extraction mode used.
    pub mode: MeasurementMode,
    /// Repetitions asked for.
    pub repetitions_requested: usize,
    /// Repetitions actually folded in; lower than requested after a timeout.
    pub repetitions_completed: usize,
}

impl DamageReport {
    /// `100 · (1 − 2d)`.
    pub fn intact_percentage(&self) -> f64 {
        intact_percentage(self.damage)
    }

    /// Negation of the intact percentage.
    pub fn broken_percentage(&self) -> f64 {
        -self.intact_percentage()
    }

    /// Whether the ship sank.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_damage(self.damage)
    }

    /// `true` when the timeout cut the accumulation short.
    pub fn is_truncated(&self) -> bool {
        self.repetitions_completed < self.repetitions_requested
    }
}

/// Running sum of distributions with the number of runs folded in.
struct Accumulator {
    sum: ProbabilityDistribution,
    completed: usize,
}

impl Accumulator {
    fn empty() -> Self {
        Self {
            sum: ProbabilityDistribution::zeros(REGISTER_SIZE),
            completed: 0,
        }
    }

    fn absorb(mut self, run: Option<ProbabilityDistribution>) -> Result<Self> {
        if let Some(dist) = run {
            self.sum.accumulate(&dist, 1.0)?;
            self.completed += 1;
        }
        Ok(self)
    }

    fn merge(mut self, other: Accumulator) -> Result<Self> {
        self.sum.accumulate(&other.sum, 1.0)?;
        self.completed += other.completed;
        Ok(self)
    }
}

/// Runs the scenario circuit repeatedly and reduces the result to damage.
#[derive(Debug, Clone)]
pub struct DamageAggregator {
    config: EvaluationConfig,
}

impl DamageAggregator {
    /// Aggregator for `config`; rejects zero repetitions.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        if config.repetitions == 0 {
            return Err(QbsError::InvalidRepetitions);
        }
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Builds the scenario for `ship` and `bombs`, runs it and reports damage.
    pub fn evaluate(&self, ship: ShipPosition, bombs: &BombSelection) -> Result<DamageReport> {
        let circuit = protocol::build_scenario(ship, bombs);
        let (distribution, repetitions_completed) = self.accumulate(&circuit)?;
        let damage = damage_from_distribution(&distribution, ship)?;

        info!(
            ship = ?ship.qubits(),
            bombs = ?bombs.qubits(),
            mode = ?self.config.mode,
            repetitions = repetitions_completed,
            damage,
            "evaluation finished"
        );
        Ok(DamageReport {
            damage,
            distribution,
            mode: self.config.mode,
            repetitions_requested: self.config.repetitions,
            repetitions_completed,
        })
    }

    /// Mean distribution of `circuit` over the configured repetitions, with
    /// the number of repetitions that completed.
    ///
    /// Each repetition owns its state vector and RNG; partial sums are
    /// combined by plain addition. The first repetition always runs, later
    /// ones are skipped once the timeout has passed.
    pub fn accumulate(&self, circuit: &Circuit) -> Result<(ProbabilityDistribution, usize)> {
        let simulator = Simulator::new(self.config.mode);
        let base_seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        let started = Instant::now();
        let timeout = self.config.timeout;
        let repetitions = self.config.repetitions;

        let run = |r: usize| -> Result<Option<ProbabilityDistribution>> {
            if r > 0 && timed_out(started, timeout) {
                return Ok(None);
            }
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(r as u64));
            Ok(Some(simulator.run(circuit, &mut rng)?.into_distribution()))
        };

        debug!(repetitions, parallel = self.config.parallel, "accumulating repetitions");
        let acc = if self.config.parallel && repetitions > 1 {
            (0..repetitions)
                .into_par_iter()
                .map(run)
                .try_fold(Accumulator::empty, |acc, item| acc.absorb(item?))
                .try_reduce(Accumulator::empty, Accumulator::merge)?
        } else {
            let mut acc = Accumulator::empty();
            for r in 0..repetitions {
                let item = run(r)?;
                if item.is_none() {
                    break;
                }
                acc = acc.absorb(item)?;
            }
            acc
        };

        if acc.completed < repetitions {
            warn!(
                completed = acc.completed,
                requested = repetitions,
                "timeout reached, damage computed from fewer repetitions"
            );
        }

        let mut mean = acc.sum;
        mean.scale(1.0 / acc.completed as f64);
        Ok((mean, acc.completed))
    }
}

fn timed_out(started: Instant, timeout: Option<Duration>) -> bool {
    timeout.is_some_and(|limit| started.elapsed() >= limit)
}

/// Evaluates one round from raw indices.
///
/// `ship_indices` is the ship's qubit pair in entangling order,
/// `bomb_indices` the two bombed qubits. Stochastic runs draw a random seed;
/// use [`DamageAggregator`] with a seeded [`EvaluationConfig`] for
/// reproducible sampling.
pub fn evaluate(
    ship_indices: (usize, usize),
    bomb_indices: (usize, usize),
    mode: MeasurementMode,
    repetitions: usize,
) -> Result<f64> {
    let ship = ShipPosition::new(ship_indices.0, ship_indices.1)?;
    let bombs = BombSelection::new(bomb_indices.0, bomb_indices.1)?;
    let config = EvaluationConfig {
        mode,
        repetitions,
        ..Default::default()
    };
    Ok(DamageAggregator::new(config)?.evaluate(ship, &bombs)?.damage)
}
