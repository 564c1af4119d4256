// src/simulation/engine.rs
use crate::core::{basis, QbsError, Result, StateVector};
use crate::operations::{gates, Operation};
use crate::simulation::{MeasurementMode, ProbabilityDistribution, SimulationResult};
use crate::validation;
use rand::rngs::StdRng;
use tracing::trace;

/// Applies operations to one [`StateVector`] and extracts the result.
///
/// The engine owns its state for the duration of a single run. Gates are
/// applied strictly in the order received. Measurement either collapses the
/// state (stochastic mode) or only marks the qubit as consumed (analytic
/// mode); in both cases every qubit must be measured exactly once before
/// [`CircuitEngine::flush`] hands out the joint distribution.
pub struct CircuitEngine {
    state: StateVector,
    mode: MeasurementMode,
    /// Sampled bit per qubit in stochastic mode, `None` until measured.
    outcomes: Vec<Option<u8>>,
    measured: Vec<bool>,
}

impl CircuitEngine {
    /// Fresh engine on `|0...0>`.
    pub fn init(num_qubits: usize, mode: MeasurementMode) -> Result<Self> {
        let state = StateVector::new(num_qubits)?;
        Ok(Self {
            state,
            mode,
            outcomes: vec![None; num_qubits],
            measured: vec![false; num_qubits],
        })
    }

    /// Current amplitudes.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Extraction mode of this run.
    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Applies one gate operation. Measurements go through [`CircuitEngine::measure`].
    ///
    /// In debug builds the squared norm is checked after each gate; a drift
    /// beyond tolerance aborts the run with `NormalizationDrift`.
    pub fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        for q in op.involved_qubits() {
            self.state.check_index(q)?;
            if self.measured[q] {
                return Err(QbsError::AlreadyMeasured { index: q });
            }
        }

        match op {
            Operation::Single { target, gate } => {
                self.state.apply_single_qubit(*target, &gate.matrix())?;
            }
            Operation::Controlled { control, target, gate } => {
                if control == target {
                    return Err(QbsError::DuplicateIndex { index: *control });
                }
                self.state
                    .apply_two_qubit(*control, *target, &gates::controlled(&gate.matrix()))?;
            }
            Operation::Measure { .. } => {
                return Err(QbsError::invalid_operation(
                    "Measure operation should not be passed directly to apply_operation",
                ));
            }
        }
        trace!(op = %op, "applied gate");

        if cfg!(debug_assertions) {
            validation::check_normalization(&self.state, None)?;
        }
        Ok(())
    }

    /// Measures each of `targets` once.
    pub fn measure(&mut self, targets: &[usize], rng: &mut StdRng) -> Result<()> {
        for &q in targets {
            self.state.check_index(q)?;
            if self.measured[q] {
                return Err(QbsError::AlreadyMeasured { index: q });
            }
            if self.mode == MeasurementMode::Stochastic {
                self.outcomes[q] = Some(self.state.measure_qubit(q, rng)?);
            }
            self.measured[q] = true;
            trace!(qubit = q, outcome = ?self.outcomes[q], "measured qubit");
        }
        Ok(())
    }

    /// Commit boundary: checks that every qubit was consumed and returns the
    /// joint distribution of the run.
    ///
    /// Analytic mode reports the squared magnitudes of the final state.
    /// Stochastic mode reports a one-hot distribution on the sampled outcome.
    pub fn flush(self) -> Result<SimulationResult> {
        if let Some(q) = self.measured.iter().position(|m| !m) {
            return Err(QbsError::invalid_operation(format!(
                "Qubit {} was never measured; every qubit must be consumed once per run",
                q
            )));
        }

        let num_qubits = self.state.num_qubits();
        let distribution = match self.mode {
            MeasurementMode::Analytic => ProbabilityDistribution::new(num_qubits, self.state.probabilities())?,
            MeasurementMode::Stochastic => {
                let bits = self
                    .outcomes
                    .iter()
                    .map(|b| b.ok_or_else(|| QbsError::invalid_operation("Missing sampled outcome")))
                    .collect::<Result<Vec<u8>>>()?;
                ProbabilityDistribution::one_hot(num_qubits, basis::index_from_bits(&bits))?
            }
        };
        Ok(SimulationResult::new(self.mode, distribution, self.outcomes))
    }

    // Lets tests start from an arbitrary state.
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            return Err(QbsError::dimension_mismatch(self.state.dim(), state.dim()));
        }
        self.state = state;
        Ok(())
    }
}
