// RSA Encryption Implementation
// Encrypts byte streams block by block under a public key

use std::io::{self, Read, Write};

use super::bigint::{mod_pow, to_hex, RsaBigInt};
use super::error::RsaResult;
use super::keygen::RsaPublicKey;
use super::padding::{block_size, frame_block};

/// c = m^e mod n
pub fn encrypt_int(m: &RsaBigInt, e: &RsaBigInt, n: &RsaBigInt) -> RsaBigInt {
    mod_pow(m, e, n)
}

/// Fill `buf` from `reader`, stopping early only at end of input
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Lazy sequence of ciphertext blocks, in input order
///
/// Each block carries the sentinel plus up to `k - 1` bytes of input.
/// Blocks are independent of each other.
pub struct EncryptBlocks<'k, R> {
    reader: R,
    key: &'k RsaPublicKey,
    chunk: Vec<u8>,
    done: bool,
}

impl<'k, R: Read> EncryptBlocks<'k, R> {
    pub fn new(reader: R, key: &'k RsaPublicKey) -> RsaResult<Self> {
        let k = block_size(&key.n)?;
        Ok(Self {
            reader,
            key,
            chunk: vec![0u8; k - 1],
            done: false,
        })
    }
}

impl<'k, R: Read> Iterator for EncryptBlocks<'k, R> {
    type Item = RsaResult<RsaBigInt>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match read_chunk(&mut self.reader, &mut self.chunk) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(j) => {
                if j < self.chunk.len() {
                    self.done = true;
                }
                let m = frame_block(&self.chunk[..j]);
                Some(Ok(encrypt_int(&m, &self.key.e, &self.key.n)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

/// Encrypt everything `reader` yields, writing one lowercase hex line per block
/// Returns the number of blocks written
pub fn encrypt_stream<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    public_key: &RsaPublicKey,
) -> RsaResult<usize> {
    let mut blocks = 0usize;
    for c in EncryptBlocks::new(reader, public_key)? {
        writeln!(writer, "{}", to_hex(&c?))?;
        blocks += 1;
    }
    log::debug!("encrypted {} blocks", blocks);
    Ok(blocks)
}

/// Encrypt bytes using RSA public key
/// Returns one ciphertext integer per block
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> RsaResult<Vec<RsaBigInt>> {
    EncryptBlocks::new(plaintext, public_key)?.collect()
}

impl RsaPublicKey {
    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> RsaResult<Vec<RsaBigInt>> {
        encrypt_bytes(plaintext, self)
    }
}
