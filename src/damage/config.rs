use crate::core::NUM_SAMPLES_FOR_GAME;
use crate::simulation::MeasurementMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of one damage evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Extraction mode of each run.
    pub mode: MeasurementMode,
    /// Number of runs averaged into the final distribution.
    pub repetitions: usize,
    /// Base seed. Repetition `r` uses `seed + r`, so results do not depend on
    /// how repetitions are spread over threads. `None` draws a random base seed.
    pub seed: Option<u64>,
    /// Spread repetitions over the rayon thread pool.
    pub parallel: bool,
    /// Stop starting new repetitions once this much time has passed.
    pub timeout: Option<Duration>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mode: MeasurementMode::Stochastic,
            repetitions: NUM_SAMPLES_FOR_GAME,
            seed: None,
            parallel: true,
            timeout: None,
        }
    }
}

impl EvaluationConfig {
    /// Single deterministic run reading exact probabilities.
    pub fn analytic() -> Self {
        Self {
            mode: MeasurementMode::Analytic,
            repetitions: 1,
            parallel: false,
            ..Default::default()
        }
    }

    /// `repetitions` sampled runs.
    pub fn stochastic(repetitions: usize) -> Self {
        Self {
            mode: MeasurementMode::Stochastic,
            repetitions,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same configuration with a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Same configuration, sequential or parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
