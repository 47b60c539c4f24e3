use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::error::{TorsoError, TorsoResult};

/// Source of the uniform draws used for rectangle placement and tone frequencies.
///
/// Both ranges are inclusive. An inverted range is an invalid argument, never a panic.
pub trait RandomSource {
    /// Uniform integer in `[lo, hi]`.
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> TorsoResult<u32>;

    /// Uniform float in `[lo, hi]`.
    fn float_inclusive(&mut self, lo: f64, hi: f64) -> TorsoResult<f64>;
}

/// [`RandomSource`] backed by `rand`'s standard generator.
#[derive(Clone, Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Reproducible generator: the same seed yields the same slides and tones.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> TorsoResult<u32> {
        if lo > hi {
            return Err(TorsoError::validation(format!(
                "empty integer range [{lo}, {hi}]"
            )));
        }
        Ok(self.rng.gen_range(lo..=hi))
    }

    fn float_inclusive(&mut self, lo: f64, hi: f64) -> TorsoResult<f64> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(TorsoError::validation(format!(
                "float range [{lo}, {hi}] must be finite"
            )));
        }
        if lo > hi {
            return Err(TorsoError::validation(format!(
                "empty float range [{lo}, {hi}]"
            )));
        }
        if lo == hi {
            return Ok(lo);
        }
        Ok(self.rng.gen_range(lo..=hi))
    }
}
