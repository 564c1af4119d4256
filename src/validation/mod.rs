// src/validation/mod.rs

//! Numerical sanity checks on states and distributions.
//!
//! Violations here are defects (a non-unitary gate, a wrong index
//! convention), never conditions to recover from at runtime.

use crate::core::{QbsError, Result, StateVector, NORM_TOLERANCE, PROBABILITY_EPSILON};
use crate::simulation::ProbabilityDistribution;

/// Checks `Σ|c_i|² ≈ 1`.
///
/// # Arguments
/// * `state` - The state to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QbsError::NormalizationDrift)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > tolerance {
        Err(QbsError::normalization_drift(norm_sq))
    } else {
        Ok(())
    }
}

/// Checks that a distribution sums to 1 and every entry lies in `[0, 1]`,
/// both up to tolerance.
pub fn check_distribution(dist: &ProbabilityDistribution, tolerance: Option<f64>) -> Result<()> {
    let tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let total = dist.total();
    if (total - 1.0).abs() > tolerance {
        return Err(QbsError::normalization_drift(total));
    }
    if let Some(p) = dist
        .probabilities()
        .iter()
        .find(|p| **p < -PROBABILITY_EPSILON || **p > 1.0 + PROBABILITY_EPSILON)
    {
        return Err(QbsError::invalid_operation(format!("Probability {} outside [0, 1]", p)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn test_normalized_state_passes() {
        let state = StateVector::new(3).unwrap();
        assert!(check_normalization(&state, None).is_ok());
    }

    #[test]
    fn test_drift_detected() {
        let state = StateVector::from_amplitudes(1, vec![Complex::new(0.9, 0.0), Complex::new(0.0, 0.0)]).unwrap();
        assert!(matches!(
            check_normalization(&state, None),
            Err(QbsError::NormalizationDrift { .. })
        ));
        assert!(check_normalization(&state, Some(0.5)).is_ok());
    }

    #[test]
    fn test_distribution_checks() {
        let good = ProbabilityDistribution::new(1, vec![0.25, 0.75]).unwrap();
        assert!(check_distribution(&good, None).is_ok());

        let short = ProbabilityDistribution::new(1, vec![0.25, 0.5]).unwrap();
        assert!(check_distribution(&short, None).is_err());

        let negative = ProbabilityDistribution::new(1, vec![-0.5, 1.5]).unwrap();
        assert!(check_distribution(&negative, None).is_err());
    }
}
