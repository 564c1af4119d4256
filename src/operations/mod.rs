// src/operations/mod.rs

//! Gate descriptors: which operator acts on which qubits.
//!
//! An [`Operation`] is immutable and carries nothing beyond the operator and
//! the indices it acts on. The matrices themselves live in [`gates`].

pub mod gates;

use crate::core::{QbsError, Result};
use gates::Matrix2;
use std::fmt;

/// The single-qubit part of the gate vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard.
    Hadamard,
    /// Pauli-X (bit flip).
    PauliX,
    /// Phase gate, rotation by π/2.
    S,
    /// Inverse phase gate, rotation by -π/2.
    SInverse,
    /// π/4 phase rotation.
    T,
    /// Inverse of [`Gate::T`].
    TInverse,
}

impl Gate {
    /// 2x2 matrix of the gate.
    pub fn matrix(&self) -> Matrix2 {
        match self {
            Gate::Hadamard => gates::hadamard(),
            Gate::PauliX => gates::pauli_x(),
            Gate::S => gates::phase_s(),
            Gate::SInverse => gates::phase_s_inverse(),
            Gate::T => gates::phase_t(),
            Gate::TInverse => gates::phase_t_inverse(),
        }
    }

    /// The declared inverse gate.
    pub fn inverse(&self) -> Gate {
        match self {
            Gate::Hadamard => Gate::Hadamard,
            Gate::PauliX => Gate::PauliX,
            Gate::S => Gate::SInverse,
            Gate::SInverse => Gate::S,
            Gate::T => Gate::TInverse,
            Gate::TInverse => Gate::T,
        }
    }

    /// Short label used in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::Hadamard => "H",
            Gate::PauliX => "X",
            Gate::S => "S",
            Gate::SInverse => "S†",
            Gate::T => "T",
            Gate::TInverse => "T†",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A single-qubit gate on `target`.
    Single {
        /// Qubit the gate acts on.
        target: usize,
        /// The gate.
        gate: Gate,
    },

    /// Applies `gate` to `target` on the components where `control` is `|1>`.
    /// With `gate = PauliX` this is the controlled-NOT.
    Controlled {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
        /// Gate applied to the target.
        gate: Gate,
    },

    /// Computational-basis measurement of each listed qubit.
    Measure {
        /// Qubits consumed by the measurement.
        targets: Vec<usize>,
    },
}

impl Operation {
    /// Builds a gate operation from a flat list of qubits: one qubit for a plain
    /// gate, `[control, target]` for its controlled form.
    ///
    /// Returns `DimensionMismatch` when the count matches neither form, or
    /// when `controlled` disagrees with the number of qubits supplied.
    pub fn from_qubits(gate: Gate, controlled: bool, qubits: &[usize]) -> Result<Self> {
        match (controlled, qubits) {
            (false, [target]) => Ok(Operation::Single { target: *target, gate }),
            (true, [control, target]) => Ok(Operation::Controlled { control: *control, target: *target, gate }),
            (false, _) => Err(QbsError::dimension_mismatch(1, qubits.len())),
            (true, _) => Err(QbsError::dimension_mismatch(2, qubits.len())),
        }
    }

    /// Controlled-NOT shorthand.
    pub fn cnot(control: usize, target: usize) -> Self {
        Operation::Controlled { control, target, gate: Gate::PauliX }
    }

    /// Every qubit index mentioned by the operation, in operand order.
    pub fn involved_qubits(&self) -> Vec<usize> {
        match self {
            Operation::Single { target, .. } => vec![*target],
            Operation::Controlled { control, target, .. } => vec![*control, *target],
            Operation::Measure { targets } => targets.clone(),
        }
    }

    /// The operation undoing this one, or `None` for a measurement.
    pub fn inverse(&self) -> Option<Operation> {
        match self {
            Operation::Single { target, gate } => Some(Operation::Single { target: *target, gate: gate.inverse() }),
            Operation::Controlled { control, target, gate } => Some(Operation::Controlled {
                control: *control,
                target: *target,
                gate: gate.inverse(),
            }),
            Operation::Measure { .. } => None,
        }
    }

    /// `true` for measurement steps.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Single { target, gate } => write!(f, "{}({})", gate, target),
            Operation::Controlled { control, target, gate: Gate::PauliX } => write!(f, "CNOT({}, {})", control, target),
            Operation::Controlled { control, target, gate } => write!(f, "C{}({}, {})", gate, control, target),
            Operation::Measure { targets } => write!(f, "M{:?}", targets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_qubits_arity() {
        assert_eq!(
            Operation::from_qubits(Gate::T, false, &[3]).unwrap(),
            Operation::Single { target: 3, gate: Gate::T }
        );
        assert_eq!(Operation::from_qubits(Gate::PauliX, true, &[0, 1]).unwrap(), Operation::cnot(0, 1));
        assert_eq!(
            Operation::from_qubits(Gate::Hadamard, false, &[0, 1]).unwrap_err(),
            QbsError::dimension_mismatch(1, 2)
        );
        assert_eq!(
            Operation::from_qubits(Gate::PauliX, true, &[0]).unwrap_err(),
            QbsError::dimension_mismatch(2, 1)
        );
    }

    #[test]
    fn test_inverse_is_involution() {
        for gate in [Gate::Hadamard, Gate::PauliX, Gate::S, Gate::SInverse, Gate::T, Gate::TInverse] {
            assert_eq!(gate.inverse().inverse(), gate);
        }
        assert_eq!(Operation::Measure { targets: vec![0] }.inverse(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::cnot(0, 1).to_string(), "CNOT(0, 1)");
        assert_eq!(Operation::Single { target: 2, gate: Gate::SInverse }.to_string(), "S†(2)");
    }
}
