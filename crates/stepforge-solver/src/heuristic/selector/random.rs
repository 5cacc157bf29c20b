//! Step-scoped random streams for selectors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const STEP_STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random source of a selector.
///
/// The stream is re-derived from the seed at every step start. How many
/// moves a step pulls, including moves pulled ahead for move threads, has
/// no influence on the moves of the next step.
#[derive(Debug, Clone)]
pub struct SelectionRandom {
    seed: u64,
    step_count: u64,
    rng: ChaCha8Rng,
}

impl SelectionRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            step_count: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn step_started(&mut self) {
        self.step_count += 1;
        let step_seed = self
            .seed
            .wrapping_add(self.step_count.wrapping_mul(STEP_STREAM_STRIDE));
        self.rng = ChaCha8Rng::seed_from_u64(step_seed);
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
