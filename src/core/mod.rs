// src/core/mod.rs

//! Core data structures and types

pub mod basis;
pub mod constants;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qbattleships::core::TypeName`
pub use constants::qbs_constants::{
    NORM_TOLERANCE, NUM_SAMPLES_FOR_GAME, PROBABILITY_EPSILON, REGISTER_SIZE, STATE_DIM,
};
pub use error::{QbsError, Result};
pub use state::StateVector;
