// RSA Decryption Implementation
// Decrypts hex-encoded ciphertext streams block by block under a private key

use std::io::{self, BufRead, Write};

use super::bigint::{from_hex, mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPrivateKey;
use super::padding::{block_size, unframe_block};

/// m = c^d mod n
pub fn decrypt_int(c: &RsaBigInt, d: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    mod_pow(c, d, n)
}

/// Parses one ciphertext integer per line; blank lines are skipped
pub struct CiphertextLines<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> CiphertextLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for CiphertextLines<R> {
    type Item = RsaResult<RsaBigInt>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line += 1;

            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Some(Err(RsaError::MalformedCiphertext {
                        line: self.line,
                        token: "<invalid UTF-8>".to_string(),
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }

            let token = self.buf.trim();
            if token.is_empty() {
                continue;
            }

            return Some(from_hex(token).ok_or_else(|| RsaError::MalformedCiphertext {
                line: self.line,
                token: token.to_string(),
            }));
        }
    }
}

/// Decrypt one block and strip its sentinel
fn decrypt_block(c: &RsaBigInt, private_key: &RsaPrivateKey, index: usize) -> Vec<u8> {
    let block = unframe_block(&decrypt_int(c, &private_key.d, &private_key.n));
    if !block.sentinel_ok {
        log::warn!("block {} does not start with the sentinel byte", index);
    }
    block.data
}

/// Decrypt every ciphertext line of `reader` into `writer`
///
/// Stops at the first malformed line; blocks before it have already been
/// written. Returns the number of blocks decrypted.
pub fn decrypt_stream<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    private_key: &RsaPrivateKey,
) -> RsaResult<usize> {
    block_size(&private_key.n)?;

    let mut blocks = 0usize;
    for c in CiphertextLines::new(reader) {
        writer.write_all(&decrypt_block(&c?, private_key, blocks))?;
        blocks += 1;
    }
    log::debug!("decrypted {} blocks", blocks);
    Ok(blocks)
}

/// Decrypt ciphertext blocks using RSA private key
/// Returns the concatenated plaintext
pub fn decrypt_bytes(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<Vec<u8>> {
    block_size(&private_key.n)?;

    let mut plaintext = Vec::new();
    for (index, c) in ciphertext.iter().enumerate() {
        plaintext.extend_from_slice(&decrypt_block(c, private_key, index));
    }
    Ok(plaintext)
}

impl RsaPrivateKey {
    /// Decrypt ciphertext blocks using this private key
    pub fn decrypt(&self, ciphertext: &[RsaBigInt]) -> RsaResult<Vec<u8>> {
        decrypt_bytes(ciphertext, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::encrypt::{encrypt_int, encrypt_stream};
    use crate::rsa::keygen::RsaPublicKey;

    // p = 65537, q = 65539, λ = lcm(65536, 65538) = 2147549184, e = 5
    fn small_pair() -> (RsaPublicKey, RsaPrivateKey) {
        let n = from_u64(65537 * 65539);
        let e = from_u64(5);
        let d = crate::rsa::bigint::mod_inverse(&e, &from_u64(2147549184)).unwrap();
        (RsaPublicKey { n: n.clone(), e }, RsaPrivateKey { n, d })
    }

    #[test]
    fn test_decrypt_int() {
        let (public, private) = small_pair();
        for m in [0u64, 1, 2, 0xff00, 4295229442] {
            let c = encrypt_int(&from_u64(m), &public.e, &public.n);
            assert_eq!(decrypt_int(&c, &private.d, &private.n), from_u64(m));
        }
    }

    #[test]
    fn test_stream_roundtrip() {
        let (public, private) = small_pair();
        let message = b"\x00\x00leading zeros, \xff trailing \x00";

        let mut ciphertext = Vec::new();
        encrypt_stream(&message[..], &mut ciphertext, &public).unwrap();

        let mut plaintext = Vec::new();
        decrypt_stream(ciphertext.as_slice(), &mut plaintext, &private).unwrap();
        assert_eq!(plaintext, message.to_vec());
    }

    #[test]
    fn test_decrypt_bytes() {
        let (public, private) = small_pair();
        let blocks = public.encrypt(b"hello world").unwrap();
        assert_eq!(private.decrypt(&blocks).unwrap(), b"hello world".to_vec());
        assert!(private.decrypt(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let (public, private) = small_pair();
        let c = encrypt_int(&from_u64(0xff41), &public.e, &public.n);
        let text = format!("\n{:x}\r\n\n", c);

        let mut out = Vec::new();
        assert_eq!(decrypt_stream(text.as_bytes(), &mut out, &private).unwrap(), 1);
        assert_eq!(out, b"A".to_vec());
    }

    #[test]
    fn test_malformed_line_stops() {
        let (public, private) = small_pair();
        let c = encrypt_int(&from_u64(0xff41), &public.e, &public.n);
        let text = format!("{:x}\nnot-hex\n{:x}\n", c, c);

        let mut out = Vec::new();
        let err = decrypt_stream(text.as_bytes(), &mut out, &private).unwrap_err();
        assert!(matches!(err, RsaError::MalformedCiphertext { line: 2, .. }));
        assert_eq!(out, b"A".to_vec());
    }

    #[test]
    fn test_invalid_utf8_line() {
        let (_, private) = small_pair();
        let mut out = Vec::new();
        let err = decrypt_stream(&b"\xff\xfe\n"[..], &mut out, &private).unwrap_err();
        assert!(matches!(err, RsaError::MalformedCiphertext { line: 1, .. }));
    }

    #[test]
    fn test_wrong_key_garbles() {
        let (public, _) = small_pair();
        let wrong = RsaPrivateKey {
            n: public.n.clone(),
            d: from_u64(3),
        };
        let blocks = public.encrypt(b"secret").unwrap();
        assert_ne!(wrong.decrypt(&blocks).unwrap(), b"secret".to_vec());
    }
}
