// Key Generation Configuration
// Parameters for RSA key pair construction with their defaults

use crate::rsa::error::{RsaError, RsaResult};

/// Default modulus size in bits
pub const DEFAULT_BITS: u64 = 256;

/// Default number of Miller-Rabin rounds per prime candidate
pub const DEFAULT_ITERS: u64 = 50;

/// Smallest modulus size whose key always leaves room for the sentinel plus
/// one data byte per block (a modulus of at least 17 bits)
pub const MIN_KEY_BITS: u64 = 18;

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Target bit length of the modulus n
    pub bits: u64,
    /// Miller-Rabin iterations; false-positive bound is 4^(-iters)
    pub iters: u64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            iters: DEFAULT_ITERS,
        }
    }
}

impl KeyGenConfig {
    pub fn new(bits: u64, iters: u64) -> Self {
        Self { bits, iters }
    }

    pub fn with_bits(mut self, bits: u64) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_iters(mut self, iters: u64) -> Self {
        self.iters = iters;
        self
    }

    /// Reject parameters key generation cannot honour
    pub fn validate(&self) -> RsaResult<()> {
        if self.bits < MIN_KEY_BITS {
            return Err(RsaError::InvalidKeySize {
                bits: self.bits,
                min: MIN_KEY_BITS,
            });
        }
        if self.iters == 0 {
            return Err(RsaError::InvalidIterations);
        }
        Ok(())
    }
}
