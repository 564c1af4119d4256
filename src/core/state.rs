// src/core/state.rs

use super::basis;
use super::constants::qbs_constants::PROBABILITY_EPSILON;
use super::error::{QbsError, Result};
use num_complex::Complex;
use num_traits::{One, Zero};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use std::fmt;

/// Complex amplitude vector of an `n`-qubit register.
///
/// Holds `2^n` amplitudes indexed by basis state (qubit 0 is the most
/// significant bit, see [`basis`]). Every mutation goes through `&mut self`,
/// so a gate application always has exclusive access to the amplitudes.
/// All operators applied are unitary; the vector stays normalized without an
/// explicit renormalization step, measurement being the only exception.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Creates the register in `|0...0>`.
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QbsError::invalid_operation("Cannot create a register with zero qubits"));
        }
        let dim = 1usize
            .checked_shl(num_qubits as u32)
            .ok_or_else(|| QbsError::invalid_operation("Register too large, state vector dimension overflows usize"))?;

        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::one();
        Ok(Self { num_qubits, amplitudes })
    }

    /// Creates a state from explicit amplitudes. The vector is taken as given;
    /// callers wanting a physical state must pass a normalized one.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let expected = 1usize
            .checked_shl(num_qubits as u32)
            .ok_or_else(|| QbsError::invalid_operation("Register too large, state vector dimension overflows usize"))?;
        if num_qubits == 0 || amplitudes.len() != expected {
            return Err(QbsError::dimension_mismatch(expected, amplitudes.len()));
        }
        Ok(Self { num_qubits, amplitudes })
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// `Σ|c_i|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Squared magnitude of every amplitude, in basis-index order. Unclamped.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Probability of reading `1` on `qubit`.
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_index(qubit)?;
        let mask = basis::qubit_mask(self.num_qubits, qubit);
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(k, _)| k & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum())
    }

    /// Returns `InvalidIndex` unless `qubit` addresses this register.
    pub fn check_index(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            Err(QbsError::invalid_index(qubit, self.num_qubits))
        } else {
            Ok(())
        }
    }

    /// Applies a `2^k × 2^k` unitary, given row-major, to the `k` listed qubits.
    ///
    /// The first listed qubit is the most significant bit of the local matrix
    /// index, so for `qubits = [control, target]` the matrix basis order is
    /// `|00>, |01>, |10>, |11>` over `|control, target>`. Every group of `2^k`
    /// amplitudes that differ only in the acted-upon bits is transformed in place.
    pub fn apply_unitary(&mut self, qubits: &[usize], matrix: &[Complex<f64>]) -> Result<()> {
        let k = qubits.len();
        if k == 0 {
            return Err(QbsError::invalid_operation("A gate must act on at least one qubit"));
        }
        if k > self.num_qubits {
            return Err(QbsError::dimension_mismatch(self.num_qubits, k));
        }
        let sub_dim = 1usize << k;
        if matrix.len() != sub_dim * sub_dim {
            return Err(QbsError::dimension_mismatch(sub_dim * sub_dim, matrix.len()));
        }
        for (pos, &q) in qubits.iter().enumerate() {
            self.check_index(q)?;
            if qubits[..pos].contains(&q) {
                return Err(QbsError::DuplicateIndex { index: q });
            }
        }

        let masks: Vec<usize> = qubits.iter().map(|&q| basis::qubit_mask(self.num_qubits, q)).collect();
        let acted = masks.iter().fold(0, |acc, m| acc | m);
        // offsets[s] sets the acted-upon bits to the local index s
        let offsets: Vec<usize> = (0..sub_dim)
            .map(|s| {
                masks
                    .iter()
                    .enumerate()
                    .filter(|(m, _)| (s >> (k - 1 - m)) & 1 == 1)
                    .fold(0, |acc, (_, mask)| acc | mask)
            })
            .collect();

        let mut local = vec![Complex::zero(); sub_dim];
        for base in (0..self.dim()).filter(|b| b & acted == 0) {
            for (s, offset) in offsets.iter().enumerate() {
                local[s] = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                let row_coeffs = &matrix[row * sub_dim..(row + 1) * sub_dim];
                self.amplitudes[base | offset] = row_coeffs
                    .iter()
                    .zip(local.iter())
                    .map(|(m, psi)| m * psi)
                    .sum();
            }
        }
        Ok(())
    }

    /// Applies a 2x2 matrix to `target`.
    pub fn apply_single_qubit(&mut self, target: usize, matrix: &[[Complex<f64>; 2]; 2]) -> Result<()> {
        self.apply_unitary(&[target], matrix.as_flattened())
    }

    /// Applies a 4x4 matrix to the ordered pair `(first, second)`.
    pub fn apply_two_qubit(&mut self, first: usize, second: usize, matrix: &[[Complex<f64>; 4]; 4]) -> Result<()> {
        self.apply_unitary(&[first, second], matrix.as_flattened())
    }

    /// Projective measurement of one qubit in the computational basis.
    ///
    /// Draws the outcome with Born-rule probability, zeroes the amplitudes
    /// inconsistent with it and renormalizes the rest.
    pub fn measure_qubit(&mut self, qubit: usize, rng: &mut StdRng) -> Result<u8> {
        let p_one = self.probability_of_one(qubit)?;
        let r: f64 = StandardUniform.sample(rng);
        let mut outcome = u8::from(r < p_one);
        let mut p_outcome = if outcome == 1 { p_one } else { 1.0 - p_one };
        // r can land on a branch whose weight is only rounding noise
        if p_outcome < PROBABILITY_EPSILON {
            outcome ^= 1;
            p_outcome = 1.0 - p_outcome;
        }

        let scale = 1.0 / p_outcome.sqrt();
        for (k, amp) in self.amplitudes.iter_mut().enumerate() {
            if basis::qubit_bit(k, self.num_qubits, qubit) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(outcome)
    }

    /// Samples a full basis state and collapses the register onto it.
    pub fn sample_collapse(&mut self, rng: &mut StdRng) -> usize {
        let probabilities = self.probabilities();
        let total: f64 = probabilities.iter().sum();
        let r: f64 = StandardUniform.sample(rng);
        let target = r * total;

        let mut cumulative = 0.0;
        let mut chosen = probabilities
            .iter()
            .rposition(|p| *p > PROBABILITY_EPSILON)
            .unwrap_or(0);
        for (k, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if target < cumulative && *p > PROBABILITY_EPSILON {
                chosen = k;
                break;
            }
        }

        self.amplitudes.iter_mut().for_each(|c| *c = Complex::zero());
        self.amplitudes[chosen] = Complex::one();
        chosen
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateVector[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn hadamard() -> [[Complex<f64>; 2]; 2] {
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        [[h, h], [h, -h]]
    }

    #[test]
    fn test_new_is_all_zero_basis_state() {
        let state = StateVector::new(5).unwrap();
        assert_eq!(state.dim(), 32);
        assert_eq!(state.amplitudes()[0], Complex::one());
        assert!(state.amplitudes()[1..].iter().all(|c| c.is_zero()));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(StateVector::new(0).is_err());
    }

    #[test]
    fn test_from_amplitudes_checks_length() {
        let err = StateVector::from_amplitudes(2, vec![Complex::one(); 3]).unwrap_err();
        assert_eq!(err, QbsError::dimension_mismatch(4, 3));
    }

    #[test]
    fn test_single_qubit_gate_targets_correct_bit() {
        let mut state = StateVector::new(3).unwrap();
        let x = [[Complex::zero(), Complex::one()], [Complex::one(), Complex::zero()]];
        state.apply_single_qubit(2, &x).unwrap();
        // qubit 2 is the least significant bit
        assert_eq!(state.amplitudes()[0b001], Complex::one());
        state.apply_single_qubit(0, &x).unwrap();
        assert_eq!(state.amplitudes()[0b101], Complex::one());
    }

    #[test]
    fn test_matrix_size_mismatch() {
        let mut state = StateVector::new(2).unwrap();
        let err = state.apply_unitary(&[0, 1], &[Complex::one(); 4]).unwrap_err();
        assert_eq!(err, QbsError::dimension_mismatch(16, 4));
    }

    #[test]
    fn test_invalid_and_duplicate_indices() {
        let mut state = StateVector::new(2).unwrap();
        assert_eq!(
            state.apply_single_qubit(2, &hadamard()).unwrap_err(),
            QbsError::invalid_index(2, 2)
        );
        let id4 = [[Complex::one(); 4]; 4];
        assert_eq!(
            state.apply_two_qubit(1, 1, &id4).unwrap_err(),
            QbsError::DuplicateIndex { index: 1 }
        );
    }

    #[test]
    fn test_measure_qubit_collapses_and_renormalizes() {
        let mut state = StateVector::new(2).unwrap();
        state.apply_single_qubit(0, &hadamard()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = state.measure_qubit(0, &mut rng).unwrap();
        let expected_index = if outcome == 1 { 0b10 } else { 0b00 };
        assert!((state.amplitudes()[expected_index].norm_sqr() - 1.0).abs() < TEST_TOLERANCE);
        assert!((state.norm_sqr() - 1.0).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_measure_deterministic_state() {
        let mut state = StateVector::new(1).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(state.measure_qubit(0, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_sample_collapse_gives_basis_state() {
        let mut state = StateVector::new(3).unwrap();
        for q in 0..3 {
            state.apply_single_qubit(q, &hadamard()).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(42);
        let k = state.sample_collapse(&mut rng);
        assert!(k < 8);
        assert_eq!(state.amplitudes()[k], Complex::one());
        assert!((state.norm_sqr() - 1.0).abs() < TEST_TOLERANCE);
    }
}
