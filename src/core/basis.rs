// src/core/basis.rs

//! The single bit-ordering convention of the crate.
//!
//! Qubit 0 is the **most significant** bit of a basis index:
//! `index = Σ bit_q · 2^(n-1-q)`. The gate application in
//! [`StateVector`](super::StateVector), the measurement decoding in the engine
//! and the damage marginalization all go through these helpers, so the
//! convention lives in exactly one place.

/// Bit position (counted from the least significant end) that holds `qubit`.
#[inline]
pub fn bit_position(num_qubits: usize, qubit: usize) -> usize {
    num_qubits - 1 - qubit
}

/// Mask selecting `qubit` inside a basis index.
#[inline]
pub fn qubit_mask(num_qubits: usize, qubit: usize) -> usize {
    1 << bit_position(num_qubits, qubit)
}

/// Value (0 or 1) of `qubit` in the basis state `index`.
#[inline]
pub fn qubit_bit(index: usize, num_qubits: usize, qubit: usize) -> u8 {
    ((index >> bit_position(num_qubits, qubit)) & 1) as u8
}

/// Builds a basis index from per-qubit bits, `bits[q]` being qubit `q`.
pub fn index_from_bits(bits: &[u8]) -> usize {
    let n = bits.len();
    bits.iter()
        .enumerate()
        .filter(|(_, b)| **b != 0)
        .fold(0, |acc, (q, _)| acc | qubit_mask(n, q))
}

/// Splits a basis index into per-qubit bits, inverse of [`index_from_bits`].
pub fn bits_from_index(index: usize, num_qubits: usize) -> Vec<u8> {
    (0..num_qubits).map(|q| qubit_bit(index, num_qubits, q)).collect()
}

/// Renders a basis index as `|q0 q1 ... q(n-1)>` without separators, e.g. `|01100>`.
pub fn ket_label(index: usize, num_qubits: usize) -> String {
    let bits: String = bits_from_index(index, num_qubits)
        .into_iter()
        .map(|b| if b == 1 { '1' } else { '0' })
        .collect();
    format!("|{}>", bits)
}
