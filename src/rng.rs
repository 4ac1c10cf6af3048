use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// An empty list always yields 0.0. Samples are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct FixedDraws {
    samples: Vec<f64>,
    drawn: usize,
}

impl FixedDraws {
    pub fn new(samples: Vec<f64>) -> Self {
        FixedDraws { samples, drawn: 0 }
    }

    pub fn constant(sample: f64) -> Self {
        Self::new(vec![sample])
    }

    /// Number of samples handed out so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        let sample = if self.samples.is_empty() {
            0.0
        } else {
            self.samples[self.drawn % self.samples.len()]
        };
        self.drawn += 1;
        if sample.is_nan() {
            return 0.0;
        }
        sample.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Seeded generator used for reproducible resolution runs.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replace a zero seed with a random one. Non-zero seeds pass through.
pub fn effective_seed(seed: u64) -> u64 {
    if seed == 0 {
        rand::thread_rng().r#gen()
    } else {
        seed
    }
}

/// Derive an independent seed for one trial of a batch.
pub fn trial_seed(base_seed: u64, trial: u64) -> u64 {
    base_seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(trial)
        .wrapping_mul(1442695040888963407)
}
