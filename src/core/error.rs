//! Error handling logic

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QbsError>;

/// Failures the simulation core can report.
///
/// None of these are retried inside the core. Index and duplicate errors are
/// caller mistakes; dimension and normalization errors indicate a defect in
/// circuit construction or gate definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QbsError {
    /// A qubit index outside `0..num_qubits`.
    #[error("Invalid qubit index {index}: register has {num_qubits} qubits")]
    InvalidIndex {
        /// Offending index.
        index: usize,
        /// Size of the register the index was checked against.
        num_qubits: usize,
    },

    /// An index pair (ship, bomb or gate operands) repeats a value.
    #[error("Duplicate qubit index {index}")]
    DuplicateIndex {
        /// Repeated index.
        index: usize,
    },

    /// A gate, matrix or distribution has the wrong size for what it is applied to.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Size encountered.
        actual: usize,
    },

    /// The squared-magnitude sum left the tolerance band around 1.
    #[error("Normalization drift: sum(|c_i|^2) = {norm}")]
    NormalizationDrift {
        /// Observed squared norm. Stored as a string so the error stays `Eq`.
        norm: String,
    },

    /// A qubit was measured a second time within one run.
    #[error("Qubit {index} has already been measured in this run")]
    AlreadyMeasured {
        /// Qubit index.
        index: usize,
    },

    /// A ship label outside the ship map.
    #[error("Unknown ship '{label}' (expected one of a, b, c, d, e, f)")]
    UnknownShip {
        /// Label as supplied.
        label: String,
    },

    /// Zero repetitions were requested.
    #[error("Repetitions must be at least 1")]
    InvalidRepetitions,

    /// Any other malformed request to the engine.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of the failure.
        message: String,
    },
}

impl QbsError {
    /// Create an invalid index error.
    pub fn invalid_index(index: usize, num_qubits: usize) -> Self {
        Self::InvalidIndex { index, num_qubits }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create a normalization drift error.
    pub fn normalization_drift(norm: f64) -> Self {
        Self::NormalizationDrift { norm: format!("{norm:.12}") }
    }

    /// Create an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QbsError::invalid_index(7, 5);
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains('5'));

        let err = QbsError::dimension_mismatch(4, 2);
        assert!(err.to_string().contains("expected 4"));

        let err = QbsError::UnknownShip { label: "z".to_string() };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_normalization_drift_keeps_value() {
        let err = QbsError::normalization_drift(1.5);
        assert!(err.to_string().contains("1.500000000000"));
    }
}
