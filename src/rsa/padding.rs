// Sentinel Block Framing
// Each plaintext block is prefixed with 0xFF so leading zero bytes survive the
// trip through a big integer. This is textbook RSA framing: deterministic and
// malleable, with no semantic security.

use num_traits::Zero;

use super::bigint::{from_bytes, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// Leading byte of every framed plaintext block
pub const SENTINEL: u8 = 0xFF;

/// Block size `k = floor((bitlength(n) - 1) / 8)` for modulus `n`
///
/// A framed block holds the sentinel plus up to `k - 1` data bytes, so the
/// modulus must give `k >= 2`.
pub fn block_size(n: &RsaBigInt) -> RsaResult<usize> {
    let bits = n.bits();
    let k = (bits.saturating_sub(1) / 8) as usize;
    if k < 2 {
        return Err(RsaError::ModulusTooSmall { bits });
    }
    Ok(k)
}

/// Build the integer for one block: 0xFF || chunk, read big-endian
pub fn frame_block(chunk: &[u8]) -> RsaBigInt {
    let mut block = Vec::with_capacity(chunk.len() + 1);
    block.push(SENTINEL);
    block.extend_from_slice(chunk);
    from_bytes(&block)
}

/// Recovered block contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnframedBlock {
    pub data: Vec<u8>,
    /// Whether the discarded leading byte was the sentinel
    pub sentinel_ok: bool,
}

/// Export `m` big-endian and drop its leading byte
pub fn unframe_block(m: &RsaBigInt) -> UnframedBlock {
    if m.is_zero() {
        return UnframedBlock {
            data: Vec::new(),
            sentinel_ok: false,
        };
    }

    let bytes = to_bytes(m);
    UnframedBlock {
        sentinel_ok: bytes[0] == SENTINEL,
        data: bytes[1..].to_vec(),
    }
}
