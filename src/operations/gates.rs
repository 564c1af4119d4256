// src/operations/gates.rs

//! Gate library: closed-form matrices of the fixed gate vocabulary.
//!
//! Every matrix here is exactly unitary; the engine never renormalizes after
//! applying one. Matrices are indexed `[row][col]` over the `{|0>, |1>}` basis
//! of the target qubit.

use num_complex::Complex;
use num_traits::{One, Zero};
use std::f64::consts::FRAC_1_SQRT_2;

/// 2x2 complex matrix acting on one qubit.
pub type Matrix2 = [[Complex<f64>; 2]; 2];
/// 4x4 complex matrix acting on an ordered qubit pair.
pub type Matrix4 = [[Complex<f64>; 4]; 4];

/// `1/√2 · [[1, 1], [1, -1]]`
pub fn hadamard() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Swaps the `|0>` and `|1>` components.
pub fn pauli_x() -> Matrix2 {
    [
        [Complex::zero(), Complex::one()],
        [Complex::one(), Complex::zero()],
    ]
}

/// `diag(1, e^{iθ})`
pub fn phase(theta: f64) -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::from_polar(1.0, theta)],
    ]
}

/// S: `|1>` picks up `i`.
pub fn phase_s() -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::i()],
    ]
}

/// S†: `|1>` picks up `-i`.
pub fn phase_s_inverse() -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), -Complex::i()],
    ]
}

/// T: `|1>` picks up `e^{iπ/4} = (1+i)/√2`.
pub fn phase_t() -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
    ]
}

/// T†: `|1>` picks up `e^{-iπ/4} = (1-i)/√2`.
pub fn phase_t_inverse() -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)],
    ]
}

/// Lifts `u` to a controlled gate over `|control, target>`.
///
/// The control `|0>` block is the identity; the control `|1>` block is `u`.
pub fn controlled(u: &Matrix2) -> Matrix4 {
    [
        [Complex::one(), Complex::zero(), Complex::zero(), Complex::zero()],
        [Complex::zero(), Complex::one(), Complex::zero(), Complex::zero()],
        [Complex::zero(), Complex::zero(), u[0][0], u[0][1]],
        [Complex::zero(), Complex::zero(), u[1][0], u[1][1]],
    ]
}

/// Controlled-NOT over `|control, target>`.
pub fn cnot() -> Matrix4 {
    controlled(&pauli_x())
}

/// Conjugate transpose of a 2x2 matrix.
pub fn dagger(m: &Matrix2) -> Matrix2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Product `a · b`.
pub fn multiply(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[Complex::zero(); 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn approx_eq(a: &Matrix2, b: &Matrix2) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).norm() < TEST_TOLERANCE)
    }

    fn identity() -> Matrix2 {
        phase(0.0)
    }

    #[test]
    fn test_all_gates_unitary() {
        for m in [hadamard(), pauli_x(), phase_s(), phase_s_inverse(), phase_t(), phase_t_inverse()] {
            assert!(approx_eq(&multiply(&dagger(&m), &m), &identity()));
        }
    }

    #[test]
    fn test_inverse_pairs() {
        assert!(approx_eq(&multiply(&phase_s(), &phase_s_inverse()), &identity()));
        assert!(approx_eq(&multiply(&phase_t(), &phase_t_inverse()), &identity()));
        assert!(approx_eq(&multiply(&hadamard(), &hadamard()), &identity()));
    }

    #[test]
    fn test_named_phases_match_rotation() {
        assert!(approx_eq(&phase_s(), &phase(PI / 2.0)));
        assert!(approx_eq(&phase_t(), &phase(PI / 4.0)));
        assert!(approx_eq(&multiply(&phase_t(), &phase_t()), &phase_s()));
    }

    #[test]
    fn test_cnot_layout() {
        let m = cnot();
        assert_eq!(m[0][0], Complex::one());
        assert_eq!(m[1][1], Complex::one());
        assert_eq!(m[2][3], Complex::one());
        assert_eq!(m[3][2], Complex::one());
        assert_eq!(m[2][2], Complex::zero());
    }
}
