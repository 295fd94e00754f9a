// RSA Key Artifacts
// Line-oriented text format for persisted public and private keys
//
// Public:  n, e, s as lowercase hex, then the identity, one per line
// Private: n, d as lowercase hex, one per line

use std::io::{BufRead, Write};

use num_traits::One;

use super::bigint::{from_hex, to_hex, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use super::sign::{identity_to_int, MAX_IDENTITY_LEN};

/// Public key together with the signature over its owner's identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyArtifact {
    pub key: RsaPublicKey,
    pub signature: RsaBigInt,
    pub identity: String,
}

impl PublicKeyArtifact {
    /// Check that `signature` is the owner's signature over `identity`
    pub fn verify(&self) -> RsaResult<bool> {
        let message = identity_to_int(&self.identity)?;
        Ok(self.key.verify(&message, &self.signature))
    }
}

/// Tracks line numbers while pulling one token per line
struct LineReader<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn invalid(&self, reason: impl Into<String>) -> RsaError {
        RsaError::InvalidKeyFile {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn next_token(&mut self, what: &str) -> RsaResult<String> {
        let mut buf = String::new();
        self.line += 1;
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(self.invalid(format!("missing {}", what)));
        }
        let token = buf.trim();
        if token.is_empty() {
            return Err(self.invalid(format!("empty {}", what)));
        }
        Ok(token.to_string())
    }

    fn next_hex(&mut self, what: &str) -> RsaResult<RsaBigInt> {
        let token = self.next_token(what)?;
        from_hex(&token).ok_or_else(|| self.invalid(format!("{} is not hexadecimal: {:?}", what, token)))
    }

    fn next_modulus(&mut self) -> RsaResult<RsaBigInt> {
        let n = self.next_hex("modulus")?;
        if n <= RsaBigInt::one() {
            return Err(self.invalid("modulus must be greater than 1"));
        }
        Ok(n)
    }
}

/// Write a public key artifact
pub fn write_public<W: Write>(artifact: &PublicKeyArtifact, writer: &mut W) -> RsaResult<()> {
    // Only identities that verify() can read back are written
    identity_to_int(&artifact.identity)?;
    writeln!(writer, "{}", to_hex(&artifact.key.n))?;
    writeln!(writer, "{}", to_hex(&artifact.key.e))?;
    writeln!(writer, "{}", to_hex(&artifact.signature))?;
    writeln!(writer, "{}", artifact.identity)?;
    Ok(())
}

/// Read a public key artifact
pub fn read_public<R: BufRead>(reader: R) -> RsaResult<PublicKeyArtifact> {
    let mut lines = LineReader::new(reader);
    let n = lines.next_modulus()?;
    let e = lines.next_hex("public exponent")?;
    let signature = lines.next_hex("signature")?;

    let identity = lines.next_token("identity")?;
    if identity.len() > MAX_IDENTITY_LEN {
        return Err(lines.invalid(format!(
            "identity is {} bytes, max {}",
            identity.len(),
            MAX_IDENTITY_LEN
        )));
    }

    Ok(PublicKeyArtifact {
        key: RsaPublicKey { n, e },
        signature,
        identity,
    })
}

/// Write a private key artifact
pub fn write_private<W: Write>(key: &RsaPrivateKey, writer: &mut W) -> RsaResult<()> {
    writeln!(writer, "{}", to_hex(&key.n))?;
    writeln!(writer, "{}", to_hex(&key.d))?;
    Ok(())
}

/// Read a private key artifact
pub fn read_private<R: BufRead>(reader: R) -> RsaResult<RsaPrivateKey> {
    let mut lines = LineReader::new(reader);
    let n = lines.next_modulus()?;
    let d = lines.next_hex("private exponent")?;
    Ok(RsaPrivateKey { n, d })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    fn sample_public() -> PublicKeyArtifact {
        PublicKeyArtifact {
            key: RsaPublicKey {
                n: from_u64(3233),
                e: from_u64(17),
            },
            signature: from_u64(0xabc),
            identity: "alice".to_string(),
        }
    }

    #[test]
    fn test_public_format() {
        let mut out = Vec::new();
        write_public(&sample_public(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "ca1\n11\nabc\nalice\n");

        let parsed = read_public(out.as_slice()).unwrap();
        assert_eq!(parsed, sample_public());
    }

    #[test]
    fn test_private_format() {
        let key = RsaPrivateKey {
            n: from_u64(3233),
            d: from_u64(413),
        };
        let mut out = Vec::new();
        write_private(&key, &mut out).unwrap();
        assert_eq!(out, b"ca1\n19d\n");
        assert_eq!(read_private(out.as_slice()).unwrap(), key);
    }

    #[test]
    fn test_read_accepts_uppercase_and_crlf() {
        let key = read_private("CA1\r\n19D\r\n".as_bytes()).unwrap();
        assert_eq!(key.n, from_u64(3233));
        assert_eq!(key.d, from_u64(413));
    }

    #[test]
    fn test_truncated_public() {
        let err = read_public("ca1\n11\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RsaError::InvalidKeyFile { line: 3, .. }));

        let err = read_public("ca1\n11\nabc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RsaError::InvalidKeyFile { line: 4, .. }));
    }

    #[test]
    fn test_malformed_hex() {
        let err = read_private("ca1\nzz\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RsaError::InvalidKeyFile { line: 2, .. }));

        let err = read_private("0x1f\n19d\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RsaError::InvalidKeyFile { line: 1, .. }));

        let err = read_private("1\n19d\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RsaError::InvalidKeyFile { line: 1, .. }));
    }

    #[test]
    fn test_identity_limits() {
        let mut artifact = sample_public();
        artifact.identity = "a".repeat(MAX_IDENTITY_LEN + 1);
        assert!(matches!(
            write_public(&artifact, &mut Vec::new()),
            Err(RsaError::InvalidIdentity(_))
        ));

        artifact.identity = "two words".to_string();
        assert!(write_public(&artifact, &mut Vec::new()).is_err());

        artifact.identity = "first.last".to_string();
        assert!(matches!(
            write_public(&artifact, &mut Vec::new()),
            Err(RsaError::InvalidIdentity(_))
        ));

        artifact.identity = String::new();
        assert!(write_public(&artifact, &mut Vec::new()).is_err());

        let text = format!("ca1\n11\nabc\n{}\n", "b".repeat(MAX_IDENTITY_LEN + 1));
        assert!(matches!(
            read_public(text.as_bytes()),
            Err(RsaError::InvalidKeyFile { line: 4, .. })
        ));
    }

    #[test]
    fn test_verify_artifact() {
        let d = from_u64(413);
        let n = from_u64(3233);
        let mut artifact = sample_public();
        // "1" reads as the integer 1
        artifact.identity = "1".to_string();
        artifact.signature = crate::rsa::sign::sign(&from_u64(1), &d, &n);
        assert!(artifact.verify().unwrap());

        artifact.identity = "2".to_string();
        assert!(!artifact.verify().unwrap());
    }
}
