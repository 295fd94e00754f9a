// RSA Random State
// Seeded pseudorandom generator shared by prime generation and key generation

use num_bigint::{BigUint, RandBigInt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Explicit generator handle.
///
/// Every randomized operation takes `&mut RandState`, so there is exactly one
/// owner of the generator and its lifetime is scoped by the caller. Two states
/// built from the same seed produce the same sequence of outputs.
#[derive(Debug, Clone)]
pub struct RandState {
    rng: StdRng,
    seed: u64,
}

impl RandState {
    /// Seed a new generator deterministically from `seed`
    pub fn new(seed: u64) -> Self {
        log::trace!("random state seeded with {}", seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this state was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [0, 2^k)
    pub fn uniform_bits(&mut self, k: u64) -> BigUint {
        self.rng.gen_biguint(k)
    }

    /// Uniform value in [0, m)
    ///
    /// # Panics
    /// Panics if `m` is zero.
    pub fn uniform_below(&mut self, m: &BigUint) -> BigUint {
        self.rng.gen_biguint_below(m)
    }

    /// Uniform machine integer in [low, high]
    pub fn uniform_u64_inclusive(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..=high)
    }

    /// Release the generator state
    pub fn clear(self) {
        log::trace!("random state (seed {}) cleared", self.seed);
    }
}
