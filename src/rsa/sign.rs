// RSA Signatures
// Signs and verifies a single integer, typically a user identity read as base 62

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// Longest identity accepted in a key artifact, in bytes
pub const MAX_IDENTITY_LEN: usize = 255;

const IDENTITY_RADIX: u32 = 62;

/// Digit value of one identity character: 0-9, then A-Z, then a-z
fn base62_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(c as u8 - b'A' + 10),
        'a'..='z' => Some(c as u8 - b'a' + 36),
        _ => None,
    }
}

/// Read an identity string as a base-62 numeral
///
/// The mapping is one-way; the integer is only used as the signed payload.
pub fn identity_to_int(identity: &str) -> RsaResult<RsaBigInt> {
    if identity.is_empty() {
        return Err(RsaError::InvalidIdentity("empty identity".to_string()));
    }
    if identity.len() > MAX_IDENTITY_LEN {
        return Err(RsaError::InvalidIdentity(format!(
            "identity is {} bytes, max {}",
            identity.len(),
            MAX_IDENTITY_LEN
        )));
    }

    let digits = identity
        .chars()
        .map(|c| {
            base62_digit(c).ok_or_else(|| {
                RsaError::InvalidIdentity(format!("{:?} is not a base-62 digit", c))
            })
        })
        .collect::<RsaResult<Vec<u8>>>()?;

    RsaBigInt::from_radix_be(&digits, IDENTITY_RADIX)
        .ok_or_else(|| RsaError::InvalidIdentity(identity.to_string()))
}

/// s = m^d mod n
pub fn sign(message: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    mod_pow(message, d, n)
}

/// Check s^e mod n == m
pub fn verify(message: &RsaBigInt, signature: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> bool {
    mod_pow(signature, e, n) == *message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_identity_digits() {
        assert_eq!(identity_to_int("0").unwrap(), from_u64(0));
        assert_eq!(identity_to_int("Z").unwrap(), from_u64(35));
        assert_eq!(identity_to_int("a").unwrap(), from_u64(36));
        assert_eq!(identity_to_int("z").unwrap(), from_u64(61));
        assert_eq!(identity_to_int("10").unwrap(), from_u64(62));
        // "ab" = 36 * 62 + 37
        assert_eq!(identity_to_int("ab").unwrap(), from_u64(36 * 62 + 37));
    }

    #[test]
    fn test_identity_rejected() {
        assert!(matches!(identity_to_int(""), Err(RsaError::InvalidIdentity(_))));
        assert!(matches!(identity_to_int("first.last"), Err(RsaError::InvalidIdentity(_))));
        assert!(matches!(identity_to_int("jo hn"), Err(RsaError::InvalidIdentity(_))));

        let long = "a".repeat(MAX_IDENTITY_LEN + 1);
        assert!(matches!(identity_to_int(&long), Err(RsaError::InvalidIdentity(_))));
        assert!(identity_to_int(&"a".repeat(MAX_IDENTITY_LEN)).is_ok());
    }

    #[test]
    fn test_sign_verify_textbook() {
        // n = 61 * 53, e = 17, d = 413 (lambda = 780)
        let n = from_u64(3233);
        let e = from_u64(17);
        let d = from_u64(413);
        let m = from_u64(65);

        let s = sign(&m, &d, &n);
        assert!(verify(&m, &s, &e, &n));
        assert!(!verify(&from_u64(66), &s, &e, &n));
        assert!(!verify(&m, &(&s + 1u8), &e, &n));
    }
}
