// RSA Key Generation
// Builds the modulus, public exponent and private exponent from two fresh primes

use num_traits::One;

use super::artifact::PublicKeyArtifact;
use super::bigint::{gcd, lcm, mod_inverse, random_prime, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::randstate::RandState;
use super::sign::{identity_to_int, sign, verify};
use crate::config::KeyGenConfig;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

/// Full key material produced by key generation. Never mutated afterwards;
/// only the two key halves are persisted.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub n: RsaBigInt,
    pub e: RsaBigInt,
    pub d: RsaBigInt,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Check a signature over `message`
    pub fn verify(&self, message: &RsaBigInt, signature: &RsaBigInt) -> bool {
        verify(message, signature, &self.e, &self.n)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn sign(&self, message: &RsaBigInt) -> RsaBigInt {
        sign(message, &self.d, &self.n)
    }
}

impl KeyMaterial {
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey {
            n: self.n.clone(),
            d: self.d.clone(),
        }
    }

    /// λ(n), recomputed on demand since it is never persisted
    pub fn lambda(&self) -> RsaBigInt {
        carmichael_lambda(&self.p, &self.q)
    }

    /// Sign `identity` and bundle it with the public key
    ///
    /// The base-62 value of `identity` must be below `n`; a larger value would
    /// be signed modulo `n` and could never verify.
    pub fn public_artifact(&self, identity: &str) -> RsaResult<PublicKeyArtifact> {
        let message = identity_to_int(identity)?;
        if message >= self.n {
            return Err(RsaError::InvalidIdentity(format!(
                "identity value has {} bits, modulus only {}",
                message.bits(),
                self.n.bits()
            )));
        }
        Ok(PublicKeyArtifact {
            key: self.public_key(),
            signature: self.private_key().sign(&message),
            identity: identity.to_string(),
        })
    }
}

/// λ(n) = (p-1)(q-1) / gcd(p-1, q-1)
pub fn carmichael_lambda(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    lcm(&(p - 1u8), &(q - 1u8))
}

/// Draw two distinct primes whose bit lengths sum to `bits`, with p's
/// length uniform in [bits/4, 3*bits/4]
pub fn generate_primes(bits: u64, iters: u64, rng: &mut RandState) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    let p_bits = rng.uniform_u64_inclusive(bits / 4, 3 * bits / 4);
    let q_bits = bits - p_bits;
    log::debug!("prime split: p {} bits, q {} bits", p_bits, q_bits);

    let p = random_prime(p_bits, iters, rng)?;
    let mut q = random_prime(q_bits, iters, rng)?;
    while q == p {
        log::debug!("q collided with p, drawing again");
        q = random_prime(q_bits, iters, rng)?;
    }

    Ok((p, q))
}

/// Draw random `bits`-bit values until one is coprime to λ(n)
pub fn choose_public_exponent(bits: u64, lambda: &RsaBigInt, rng: &mut RandState) -> RsaBigInt {
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let e = rng.uniform_bits(bits);
        if e > RsaBigInt::one() && gcd(&e, lambda).is_one() {
            log::debug!("public exponent chosen after {} draws", attempts);
            return e;
        }
    }
}

/// d = e^(-1) mod λ(n)
pub fn make_private(e: &RsaBigInt, lambda: &RsaBigInt) -> RsaResult<RsaBigInt> {
    mod_inverse(e, lambda).ok_or(RsaError::NoModularInverse)
}

/// Generate RSA key material for `config.bits` with `config.iters`
/// Miller-Rabin rounds per prime
///
/// `NoModularInverse` means e and λ(n) were not coprime; the caller should
/// retry with fresh primes or abort.
pub fn generate_keypair(config: &KeyGenConfig, rng: &mut RandState) -> RsaResult<KeyMaterial> {
    config.validate()?;

    // Step 1: Generate two distinct random primes p and q
    let (p, q) = generate_primes(config.bits, config.iters, rng)?;

    // Step 2: Compute n = p * q
    let n = &p * &q;

    // Step 3: Compute λ(n)
    let lambda = carmichael_lambda(&p, &q);

    // Step 4: Pick e coprime to λ(n)
    let e = choose_public_exponent(config.bits, &lambda, rng);

    // Step 5: Compute d = e^(-1) mod λ(n)
    let d = make_private(&e, &lambda)?;

    log::info!("generated {}-bit RSA key", n.bits());

    Ok(KeyMaterial { p, q, n, e, d })
}
