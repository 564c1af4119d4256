//! Fixed dimensions and numerical tolerances of the battleship register.

/// Constants shared by the state vector, the engine and the damage aggregator.
pub mod qbs_constants {
    /// Number of qubits in the register.
    pub const REGISTER_SIZE: usize = 5;
    /// Dimension of the state space, `2^REGISTER_SIZE`.
    pub const STATE_DIM: usize = 1 << REGISTER_SIZE;
    /// Allowed deviation of `Σ|ψ|²` from 1 after a gate.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Probabilities this far outside `[0, 1]` are treated as rounding noise and clamped.
    pub const PROBABILITY_EPSILON: f64 = 1e-12;
    /// Samples per round when the game is played stochastically.
    pub const NUM_SAMPLES_FOR_GAME: usize = 1000;
}
