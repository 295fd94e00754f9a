// RSA Error Types
// Errors surfaced by the number theory, codec and key artifact layers

use std::io;
use thiserror::Error;

/// Errors that can occur in RSA operations
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unparsable token, missing line or truncated key artifact
    #[error("invalid key file at line {line}: {reason}")]
    InvalidKeyFile { line: usize, reason: String },

    /// gcd(a, n) != 1, so `a` has no inverse modulo `n`
    #[error("no modular inverse exists")]
    NoModularInverse,

    #[error("malformed ciphertext at line {line}: {token:?}")]
    MalformedCiphertext { line: usize, token: String },

    /// The block size `k` is below 2, leaving no room for the sentinel and data
    #[error("modulus of {bits} bits is too small for block encryption")]
    ModulusTooSmall { bits: u64 },

    #[error("key size must be at least {min} bits, got {bits}")]
    InvalidKeySize { bits: u64, min: u64 },

    #[error("prime bit length must be at least 2, got {0}")]
    InvalidPrimeBits(u64),

    #[error("Miller-Rabin iteration count must be at least 1")]
    InvalidIterations,

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
