// src/simulation/mod.rs

//! Executes a [`Circuit`] against a fresh state vector.
//!
//! [`Simulator`] is the entry point; it drives the [`CircuitEngine`] through
//! the operations of a circuit and returns a [`SimulationResult`] once the
//! engine has been flushed.

mod results;
pub mod engine;

pub use engine::CircuitEngine;
pub use results::{ProbabilityDistribution, SimulationResult};

use crate::circuits::Circuit;
use crate::core::Result;
use crate::operations::Operation;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How the final distribution of a run is extracted.
///
/// Passed explicitly through every call; there is no process-wide mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementMode {
    /// Read the exact probabilities of the final state. Deterministic.
    Analytic,
    /// Sample one outcome per run, collapsing the state.
    Stochastic,
}

/// Runs circuits in a fixed measurement mode.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    mode: MeasurementMode,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(MeasurementMode::Analytic)
    }
}

impl Simulator {
    /// Simulator extracting results in `mode`.
    pub fn new(mode: MeasurementMode) -> Self {
        Self { mode }
    }

    /// The measurement mode in use.
    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Runs `circuit` on `|0...0>`.
    ///
    /// `rng` is only drawn from in stochastic mode. Every qubit of the
    /// register must be measured exactly once by the circuit.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` holding the joint distribution of the run.
    /// * `Err(QbsError)` for an invalid index, a repeated measurement, an
    ///   unmeasured qubit, or (debug builds) normalization drift.
    pub fn run(&self, circuit: &Circuit, rng: &mut StdRng) -> Result<SimulationResult> {
        let mut engine = CircuitEngine::init(circuit.num_qubits(), self.mode)?;
        for op in circuit.operations() {
            match op {
                Operation::Measure { targets } => engine.measure(targets, rng)?,
                _ => engine.apply_operation(op)?,
            }
        }
        engine.flush()
    }

    /// [`Simulator::run`] with an RNG seeded from `seed`.
    pub fn run_seeded(&self, circuit: &Circuit, seed: u64) -> Result<SimulationResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run(circuit, &mut rng)
    }
}
