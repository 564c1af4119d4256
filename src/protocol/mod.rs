// src/protocol/mod.rs

//! The battleship encoding of a CHSH experiment.
//!
//! A ship occupies two of the five register qubits. Placing it prepares an
//! anti-correlated Bell pair on those qubits with a π/4 phase on the first
//! one (the "bob" qubit). A bomb on a qubit selects one of the two
//! measurement settings of that qubit: S⁻¹ on the bob, S elsewhere. Finally
//! every qubit is rotated by a Hadamard and measured.
//!
//! The layout of the six ship positions on the 5-qubit "bowtie":
//!
//! ```text
//! 4       0        |\     /|
//! |\     /|        | d   b |
//! | \   / |        |  \ /  |
//! |   2   |        f   X   a
//! | /   \ |        |  / \  |
//! |/     \|        | e   c |
//! 3       1        |/     \|
//! ```

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{QbsError, Result, REGISTER_SIZE};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Rejects indices outside the register and repeated indices.
fn validate_pair(first: usize, second: usize) -> Result<()> {
    for index in [first, second] {
        if index >= REGISTER_SIZE {
            return Err(QbsError::invalid_index(index, REGISTER_SIZE));
        }
    }
    if first == second {
        return Err(QbsError::DuplicateIndex { index: first });
    }
    Ok(())
}

/// The two qubits a ship occupies, in entangling order: `first` receives the
/// Hadamard, controls the CNOT and becomes the bob qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipPosition {
    first: usize,
    second: usize,
}

impl ShipPosition {
    /// Validated position; both indices in range and distinct.
    pub fn new(first: usize, second: usize) -> Result<Self> {
        validate_pair(first, second)?;
        Ok(Self { first, second })
    }

    /// Qubit carrying the bob role.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Partner qubit.
    pub fn second(&self) -> usize {
        self.second
    }

    /// Both qubits in entangling order.
    pub fn qubits(&self) -> [usize; 2] {
        [self.first, self.second]
    }

    /// `true` if `qubit` belongs to the ship.
    pub fn contains(&self, qubit: usize) -> bool {
        self.first == qubit || self.second == qubit
    }

    /// Register qubits outside the ship, ascending.
    pub fn spectators(&self) -> Vec<usize> {
        (0..REGISTER_SIZE).filter(|q| !self.contains(*q)).collect()
    }
}

/// The fixed ship map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ship {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Ship {
    /// Every ship in label order.
    pub const ALL: [Ship; 6] = [Ship::A, Ship::B, Ship::C, Ship::D, Ship::E, Ship::F];

    /// Qubit pair occupied by the ship.
    pub fn position(&self) -> ShipPosition {
        let (first, second) = match self {
            Ship::A => (0, 1),
            Ship::B => (0, 2),
            Ship::C => (1, 2),
            Ship::D => (2, 4),
            Ship::E => (2, 3),
            Ship::F => (3, 4),
        };
        ShipPosition { first, second }
    }

    /// Single-letter label.
    pub fn label(&self) -> &'static str {
        match self {
            Ship::A => "a",
            Ship::B => "b",
            Ship::C => "c",
            Ship::D => "d",
            Ship::E => "e",
            Ship::F => "f",
        }
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Ship {
    type Err = QbsError;

    fn from_str(s: &str) -> Result<Self> {
        Ship::ALL
            .into_iter()
            .find(|ship| ship.label() == s.trim())
            .ok_or_else(|| QbsError::UnknownShip { label: s.to_string() })
    }
}

/// Exactly two distinct qubits to bomb. The order in which they were chosen
/// is kept but does not affect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BombSelection {
    bombs: [usize; 2],
}

impl BombSelection {
    /// Validated selection.
    pub fn new(first: usize, second: usize) -> Result<Self> {
        validate_pair(first, second)?;
        Ok(Self { bombs: [first, second] })
    }

    /// The bombed qubits, in the order chosen.
    pub fn qubits(&self) -> [usize; 2] {
        self.bombs
    }

    /// The same selection in reverse order.
    pub fn swapped(&self) -> Self {
        Self { bombs: [self.bombs[1], self.bombs[0]] }
    }

    /// All ten selections `(i, j)` with `i < j`, lexicographically.
    pub fn all_pairs() -> Vec<BombSelection> {
        (0..REGISTER_SIZE)
            .flat_map(|i| ((i + 1)..REGISTER_SIZE).map(move |j| BombSelection { bombs: [i, j] }))
            .collect()
    }
}

impl fmt::Display for BombSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.bombs[0], self.bombs[1])
    }
}

/// Which register qubits carry the bob role for one circuit build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BobFlags {
    flags: [bool; REGISTER_SIZE],
}

impl BobFlags {
    /// `true` if `qubit` is a bob. Out-of-range qubits are never bobs.
    pub fn is_bob(&self, qubit: usize) -> bool {
        self.flags.get(qubit).copied().unwrap_or(false)
    }

    /// Indices flagged as bob.
    pub fn bob_qubits(&self) -> Vec<usize> {
        (0..REGISTER_SIZE).filter(|q| self.flags[*q]).collect()
    }
}

/// Places the ship: anti-correlated Bell pair on the ship qubits with a π/4
/// phase on the first one, which becomes the bob.
///
/// Gate order: `H(i)`, `CNOT(i, j)`, `X(i)`, `T(i)`.
pub fn entangle_chsh(builder: CircuitBuilder, ship: ShipPosition) -> (CircuitBuilder, BobFlags) {
    let (i, j) = (ship.first, ship.second);
    let builder = builder.h(i).cnot(i, j).x(i).t(i);

    let mut bobs = BobFlags::default();
    bobs.flags[i] = true;
    (builder, bobs)
}

/// Applies the bombs: S⁻¹ on a bob qubit, S on any other.
pub fn apply_bombs(mut builder: CircuitBuilder, bombs: &BombSelection, bobs: &BobFlags) -> CircuitBuilder {
    for qubit in bombs.qubits() {
        builder = if bobs.is_bob(qubit) {
            builder.s_inv(qubit)
        } else {
            builder.s(qubit)
        };
    }
    builder
}

/// Hadamard basis change and a measurement on every register qubit.
pub fn measure_in_rotated_basis(mut builder: CircuitBuilder) -> CircuitBuilder {
    for qubit in 0..REGISTER_SIZE {
        builder = builder.h(qubit).measure(qubit);
    }
    builder
}

/// The full scenario circuit for one ship and one bomb selection.
///
/// Bombing the ship's own two qubits is a valid scenario and is not treated
/// specially.
pub fn build_scenario(ship: ShipPosition, bombs: &BombSelection) -> Circuit {
    let (builder, bobs) = entangle_chsh(CircuitBuilder::new(REGISTER_SIZE), ship);
    debug!(
        ship = ?ship.qubits(),
        bombs = ?bombs.qubits(),
        bob = ?bobs.bob_qubits(),
        "building scenario circuit"
    );
    let builder = apply_bombs(builder, bombs, &bobs);
    measure_in_rotated_basis(builder).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{Gate, Operation};

    #[test]
    fn test_ship_map_layout() {
        let expected = [(0, 1), (0, 2), (1, 2), (2, 4), (2, 3), (3, 4)];
        for (ship, (i, j)) in Ship::ALL.iter().zip(expected) {
            assert_eq!(ship.position().qubits(), [i, j], "ship {}", ship);
        }
    }

    #[test]
    fn test_ship_from_str() {
        assert_eq!("d".parse::<Ship>().unwrap(), Ship::D);
        assert_eq!(" a\n".parse::<Ship>().unwrap(), Ship::A);
        assert_eq!(
            "g".parse::<Ship>().unwrap_err(),
            QbsError::UnknownShip { label: "g".to_string() }
        );
    }

    #[test]
    fn test_pair_validation() {
        assert_eq!(BombSelection::new(0, 5).unwrap_err(), QbsError::invalid_index(5, REGISTER_SIZE));
        assert_eq!(BombSelection::new(3, 3).unwrap_err(), QbsError::DuplicateIndex { index: 3 });
        assert_eq!(ShipPosition::new(7, 1).unwrap_err(), QbsError::invalid_index(7, REGISTER_SIZE));
        assert!(ShipPosition::new(4, 2).is_ok());
    }

    #[test]
    fn test_all_pairs() {
        let pairs = BombSelection::all_pairs();
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0].qubits(), [0, 1]);
        assert_eq!(pairs[9].qubits(), [3, 4]);
    }

    #[test]
    fn test_spectators() {
        assert_eq!(Ship::D.position().spectators(), vec![0, 1, 3]);
    }

    #[test]
    fn test_bob_flag_marks_first_ship_qubit_only() {
        let (_, bobs) = entangle_chsh(CircuitBuilder::new(REGISTER_SIZE), Ship::D.position());
        assert_eq!(bobs.bob_qubits(), vec![2]);
        assert!(!bobs.is_bob(4));
        assert!(!bobs.is_bob(99));
    }

    #[test]
    fn test_scenario_gate_sequence() {
        let ship = Ship::D.position();
        let bombs = BombSelection::new(2, 3).unwrap();
        let circuit = build_scenario(ship, &bombs);
        let ops = circuit.operations();

        assert_eq!(ops[0], Operation::Single { target: 2, gate: Gate::Hadamard });
        assert_eq!(ops[1], Operation::cnot(2, 4));
        assert_eq!(ops[2], Operation::Single { target: 2, gate: Gate::PauliX });
        assert_eq!(ops[3], Operation::Single { target: 2, gate: Gate::T });
        assert_eq!(ops[4], Operation::Single { target: 2, gate: Gate::SInverse });
        assert_eq!(ops[5], Operation::Single { target: 3, gate: Gate::S });
        // five (H, M) pairs close the circuit
        assert_eq!(ops.len(), 6 + 2 * REGISTER_SIZE);
        let measured: Vec<usize> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Measure { targets } => Some(targets.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(measured, vec![0, 1, 2, 3, 4]);
    }
}
