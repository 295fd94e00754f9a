// RSA Big Integer Operations
// Number theory on top of num-bigint: modular exponentiation, primality, gcd, inverses

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use super::error::{RsaError, RsaResult};
use super::randstate::RandState;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Lowercase hexadecimal, no prefix
pub fn to_hex(n: &RsaBigInt) -> String {
    format!("{:x}", n)
}

/// Parse an unsigned hexadecimal token (either case, no sign, prefix or separators)
pub fn from_hex(token: &str) -> Option<RsaBigInt> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    RsaBigInt::parse_bytes(token.as_bytes(), 16)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
///
/// # Panics
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime; a composite survives with
/// probability at most 4^(-iterations)
pub fn is_probable_prime(n: &RsaBigInt, iterations: u64, rng: &mut RandState) -> bool {
    let two = from_u64(2);
    if n < &two {
        return false;
    }
    if n == &two || n == &from_u64(3) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as r * 2^s with r odd
    let n_minus_one = n - 1u8;
    let mut r = n_minus_one.clone();
    let mut s = 0u64;
    while r.is_even() {
        r >>= 1;
        s += 1;
    }

    // Witnesses are drawn from [2, n-2]
    let witness_span = n - 3u8;

    for _ in 0..iterations {
        let a = rng.uniform_below(&witness_span) + 2u8;
        let mut y = mod_pow(&a, &r, n);

        if y.is_one() || y == n_minus_one {
            continue;
        }

        let mut j = 1;
        while j < s && y != n_minus_one {
            y = mod_pow(&y, &two, n);
            // Nontrivial square root of 1
            if y.is_one() {
                return false;
            }
            j += 1;
        }

        if y != n_minus_one {
            return false;
        }
    }

    true
}

/// Generate a random prime of exactly `bit_length` bits
///
/// Candidates are drawn uniformly from [2^(bits-1), 2^bits - 1] until one
/// passes `is_probable_prime`. The search has no upper bound on attempts;
/// the expected number of draws is O(bits).
pub fn random_prime(bit_length: u64, iterations: u64, rng: &mut RandState) -> RsaResult<RsaBigInt> {
    if bit_length < 2 {
        return Err(RsaError::InvalidPrimeBits(bit_length));
    }

    let lower = RsaBigInt::one() << (bit_length - 1);
    let mut attempts = 0u64;

    loop {
        attempts += 1;
        let candidate = &lower + rng.uniform_bits(bit_length - 1);

        if is_probable_prime(&candidate, iterations, rng) {
            log::debug!("found {}-bit prime after {} candidates", bit_length, attempts);
            return Ok(candidate);
        }
    }
}

/// Greatest common divisor (iterative Euclid)
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }

    a
}

/// Least common multiple
pub fn lcm(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    if a.is_zero() || b.is_zero() {
        return RsaBigInt::zero();
    }
    (a / gcd(a, b)) * b
}

/// Compute modular inverse: a^(-1) mod n
/// Extended Euclid tracking only the coefficient of `a`.
/// Returns None if gcd(a, n) != 1
pub fn mod_inverse(a: &RsaBigInt, n: &RsaBigInt) -> Option<RsaBigInt> {
    if n.is_zero() {
        return None;
    }

    let modulus = BigInt::from(n.clone());
    let (mut r, mut r_prime) = (modulus.clone(), BigInt::from(a.clone()));
    let (mut t, mut t_prime) = (BigInt::zero(), BigInt::one());

    while !r_prime.is_zero() {
        let q = r.div_floor(&r_prime);

        let next_r = &r - &q * &r_prime;
        r = std::mem::replace(&mut r_prime, next_r);

        let next_t = &t - &q * &t_prime;
        t = std::mem::replace(&mut t_prime, next_t);
    }

    if !r.is_one() {
        return None;
    }

    // t lies in (-n, n); move it into [0, n)
    t.mod_floor(&modulus).to_biguint()
}
