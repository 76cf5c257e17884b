use log::{info, trace};

use crate::bitstream::bitcarry::BitCarry;
use crate::error::{Error, Result};

use super::{
    Progress, MIN_DIST, MIN_LEN, REF_DIST_BITS, REF_LEN_BITS, REF_SMALL_DIST_BITS,
    REF_SMALL_LEN_BITS,
};

/// Decompress a stream produced by [`super::compress::compress`] back into
/// the original bytes.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_progress(data, &mut |_| {})
}

/// Like [`decompress`], reporting best-effort progress percentages to
/// `observer`.
pub fn decompress_with_progress(data: &[u8], observer: &mut dyn FnMut(u8)) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut progress = Progress::new(observer);
    let mut carry = BitCarry::from_slice(data);
    let compressed = carry.consume_bits(1)? == 1;
    let mut out = Vec::with_capacity(data.len() * 2);

    if !compressed {
        // Raw storage: byte-aligned input behind the flag bit; whatever is
        // left under a byte is flush padding.
        while carry.available_bits() >= 8 {
            out.push(carry.consume_bits(8)? as u8);
        }
        progress.report(100);
        info!("unpacked {} raw bytes", out.len());
        return Ok(out);
    }

    // Every token starts with at least 8 bits; anything shorter at the tail
    // is flush padding.
    while carry.available_bits() >= 8 {
        if carry.peek_bits(1)? == 0 {
            // Literal whose own top bit is the tag.
            out.push(token_bits(&mut carry, 8)? as u8);
        } else {
            carry.consume_bits(1)?;
            if peek_token_bit(&mut carry)? == 1 {
                // Literal with a one top bit; the peeked bit re-reads as
                // part of the byte.
                out.push(token_bits(&mut carry, 8)? as u8);
            } else {
                carry.consume_bits(1)?;
                copy_reference(&mut carry, &mut out)?;
            }
        }
        progress.report((data.len() * 8 - carry.available_bits()) * 100 / (data.len() * 8));
    }

    progress.report(100);
    info!("unpacked {} bytes from {}", out.len(), data.len());
    Ok(out)
}

/// Decode one reference token and replay it. The copy is byte-by-byte so an
/// overlapping reference (distance shorter than length) reads the bytes it
/// has just written, expanding a run.
fn copy_reference(carry: &mut BitCarry, out: &mut Vec<u8>) -> Result<()> {
    let wide_length = token_bits(carry, 1)? == 1;
    let length = token_bits(
        carry,
        if wide_length {
            REF_LEN_BITS
        } else {
            REF_SMALL_LEN_BITS
        },
    )? as usize
        + MIN_LEN;
    let wide_offset = token_bits(carry, 1)? == 1;
    let distance = token_bits(
        carry,
        if wide_offset {
            REF_DIST_BITS
        } else {
            REF_SMALL_DIST_BITS
        },
    )? as usize
        + MIN_DIST;

    if distance > out.len() {
        return Err(Error::CorruptStream(
            "reference reaches before the start of the output",
        ));
    }
    trace!("reference: length {length}, distance {distance}");

    let start = out.len() - distance;
    for i in 0..length {
        let byte = out[start + i];
        out.push(byte);
    }
    Ok(())
}

/// Read part of a token, mapping a bit-stream underflow to a corruption
/// error: a well-formed stream never ends inside a token.
fn token_bits(carry: &mut BitCarry, width: u32) -> Result<u64> {
    carry
        .consume_bits(width)
        .map_err(|_| Error::CorruptStream("stream ends inside a token"))
}

fn peek_token_bit(carry: &mut BitCarry) -> Result<u64> {
    carry
        .peek_bits(1)
        .map_err(|_| Error::CorruptStream("stream ends inside a token"))
}
