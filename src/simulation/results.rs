// src/simulation/results.rs
use crate::core::{basis, QbsError, Result, PROBABILITY_EPSILON};
use crate::simulation::MeasurementMode;
use std::fmt;

/// Probability of every basis state of a register, in basis-index order.
///
/// Values are kept exactly as computed (no clamping) so tests can inspect
/// rounding error; use [`ProbabilityDistribution::clamped`] before feeding
/// them to anything that requires `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDistribution {
    num_qubits: usize,
    probabilities: Vec<f64>,
}

impl ProbabilityDistribution {
    /// Wraps a probability vector of length `2^num_qubits`.
    pub fn new(num_qubits: usize, probabilities: Vec<f64>) -> Result<Self> {
        let expected = 1usize << num_qubits;
        if probabilities.len() != expected {
            return Err(QbsError::dimension_mismatch(expected, probabilities.len()));
        }
        Ok(Self { num_qubits, probabilities })
    }

    /// All-zero accumulator.
    pub fn zeros(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            probabilities: vec![0.0; 1 << num_qubits],
        }
    }

    /// Distribution with all mass on `index`.
    pub fn one_hot(num_qubits: usize, index: usize) -> Result<Self> {
        let mut dist = Self::zeros(num_qubits);
        let dim = dist.dim();
        let slot = dist
            .probabilities
            .get_mut(index)
            .ok_or_else(|| QbsError::dimension_mismatch(dim, index + 1))?;
        *slot = 1.0;
        Ok(dist)
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states.
    pub fn dim(&self) -> usize {
        self.probabilities.len()
    }

    /// Raw probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of basis index `index` (0.0 when out of range).
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    /// Probability of the basis state with the given per-qubit bits.
    pub fn probability_of_bits(&self, bits: &[u8]) -> Result<f64> {
        if bits.len() != self.num_qubits {
            return Err(QbsError::dimension_mismatch(self.num_qubits, bits.len()));
        }
        Ok(self.probability(basis::index_from_bits(bits)))
    }

    /// Sum of all entries.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Copy with each entry that lies within `PROBABILITY_EPSILON` outside
    /// `[0, 1]` clipped back into range. Larger excursions are left alone so a
    /// real defect stays visible.
    pub fn clamped(&self) -> Self {
        let probabilities = self
            .probabilities
            .iter()
            .map(|&p| {
                if (-PROBABILITY_EPSILON..0.0).contains(&p) {
                    0.0
                } else if p > 1.0 && p <= 1.0 + PROBABILITY_EPSILON {
                    1.0
                } else {
                    p
                }
            })
            .collect();
        Self { num_qubits: self.num_qubits, probabilities }
    }

    /// Adds `weight · other` entry-wise.
    pub fn accumulate(&mut self, other: &ProbabilityDistribution, weight: f64) -> Result<()> {
        if other.dim() != self.dim() {
            return Err(QbsError::dimension_mismatch(self.dim(), other.dim()));
        }
        for (acc, p) in self.probabilities.iter_mut().zip(other.probabilities.iter()) {
            *acc += weight * p;
        }
        Ok(())
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.probabilities.iter_mut().for_each(|p| *p *= factor);
    }
}

impl fmt::Display for ProbabilityDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distribution over {} qubits:", self.num_qubits)?;
        for (k, p) in self.probabilities.iter().enumerate() {
            if p.abs() > PROBABILITY_EPSILON {
                writeln!(f, "  {}: {:.6}", basis::ket_label(k, self.num_qubits), p)?;
            }
        }
        Ok(())
    }
}

/// Outcome of one circuit run, available once the engine has been flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    mode: MeasurementMode,
    distribution: ProbabilityDistribution,
    /// Sampled bit per qubit; `None` everywhere in analytic mode.
    outcomes: Vec<Option<u8>>,
}

impl SimulationResult {
    pub(crate) fn new(mode: MeasurementMode, distribution: ProbabilityDistribution, outcomes: Vec<Option<u8>>) -> Self {
        Self { mode, distribution, outcomes }
    }

    /// Mode the run was executed in.
    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Full joint distribution: exact in analytic mode, one-hot in stochastic mode.
    pub fn distribution(&self) -> &ProbabilityDistribution {
        &self.distribution
    }

    /// Consumes the result, keeping only the distribution.
    pub fn into_distribution(self) -> ProbabilityDistribution {
        self.distribution
    }

    /// Sampled value of `qubit`, if the run was stochastic.
    pub fn outcome(&self, qubit: usize) -> Option<u8> {
        self.outcomes.get(qubit).copied().flatten()
    }

    /// Basis index of the sampled outcome, if every qubit was sampled.
    pub fn sampled_index(&self) -> Option<usize> {
        let bits: Option<Vec<u8>> = self.outcomes.iter().copied().collect();
        bits.map(|b| basis::index_from_bits(&b))
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results ({:?}):", self.mode)?;
        if let Some(index) = self.sampled_index() {
            writeln!(
                f,
                "  Sampled outcome: {}",
                basis::ket_label(index, self.distribution.num_qubits())
            )?;
        }
        write!(f, "{}", self.distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot() {
        let dist = ProbabilityDistribution::one_hot(3, 5).unwrap();
        assert_eq!(dist.probability(5), 1.0);
        assert_eq!(dist.total(), 1.0);
        assert!(ProbabilityDistribution::one_hot(3, 8).is_err());
    }

    #[test]
    fn test_clamped_only_touches_noise() {
        let dist = ProbabilityDistribution::new(1, vec![-1e-15, 1.0 + 1e-15]).unwrap();
        let clamped = dist.clamped();
        assert_eq!(clamped.probabilities(), &[0.0, 1.0]);
        // raw values are kept for inspection
        assert!(dist.probability(0) < 0.0);

        let broken = ProbabilityDistribution::new(1, vec![-0.5, 1.5]).unwrap();
        assert_eq!(broken.clamped(), broken);
    }

    #[test]
    fn test_accumulate_weighted_mean() {
        let mut acc = ProbabilityDistribution::zeros(1);
        acc.accumulate(&ProbabilityDistribution::one_hot(1, 0).unwrap(), 0.25).unwrap();
        acc.accumulate(&ProbabilityDistribution::one_hot(1, 1).unwrap(), 0.75).unwrap();
        assert_eq!(acc.probabilities(), &[0.25, 0.75]);
        assert!(acc.accumulate(&ProbabilityDistribution::zeros(2), 1.0).is_err());
    }

    #[test]
    fn test_probability_of_bits_uses_msb_convention() {
        let dist = ProbabilityDistribution::one_hot(3, 0b100).unwrap();
        assert_eq!(dist.probability_of_bits(&[1, 0, 0]).unwrap(), 1.0);
        assert_eq!(dist.probability_of_bits(&[0, 0, 1]).unwrap(), 0.0);
    }
}
