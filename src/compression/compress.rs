use log::{debug, info};

use crate::bitstream::bitcarry::BitCarry;
use crate::error::Result;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::match_finder::suffix_array::SuffixArray;
use crate::tools::freq_count::ref_length_freqs;

use super::{
    Progress, Reference, LOOK_AHEAD, MIN_DIST, MIN_LEN, REF_DIST_BITS, REF_LEN_BITS,
    REF_SMALL_DIST_BITS, REF_SMALL_LEN_BITS, SEARCH,
};

/// Compress `data` into the codec's bit stream. Pure and deterministic; the
/// output never exceeds the input by more than the flag bit and padding.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_progress(data, &mut |_| {})
}

/// Like [`compress`], reporting best-effort progress percentages to
/// `observer`. The observer is called synchronously and must not call back
/// into the codec.
pub fn compress_with_progress(data: &[u8], observer: &mut dyn FnMut(u8)) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut progress = Progress::new(observer);
    let mut carry = BitCarry::with_capacity(data.len() + 2);
    carry.push_bits(1, 1)?;

    let references = gather_references(data, &mut progress)?;

    // Interleave literals and references in input order.
    let mut pos = 0;
    for reference in &references {
        while pos < reference.pos {
            push_literal(&mut carry, data[pos])?;
            pos += 1;
        }
        push_reference(&mut carry, reference)?;
        pos += reference.length;
        progress.report(60 + pos * 40 / data.len());
    }

    // Whatever the main loop left over goes out as literals.
    for &byte in &data[pos..] {
        push_literal(&mut carry, byte)?;
    }

    // Inflation guard: an encoded stream larger than the input gets thrown
    // away and the input is stored raw behind a 0 flag.
    if carry.bit_len() > data.len() * 8 {
        debug!(
            "{} encoded bits inflate {} input bytes, storing raw",
            carry.bit_len(),
            data.len()
        );
        carry.clear();
        carry.push_bits(0, 1)?;
        carry.push_bytes(data)?;
    }

    progress.report(100);
    let out = carry.into_bytes(true);
    info!("compressed {} bytes to {}", data.len(), out.len());
    Ok(out)
}

/// Run the match finder over the input, collecting every reference the
/// greedy pass emits, and account the reference lengths into a Huffman
/// tree. The tree does not reach the canonical stream; building it here
/// validates the length alphabet and keeps the codes on hand for the
/// header-carrying stream variant.
fn gather_references(data: &[u8], progress: &mut Progress<'_>) -> Result<Vec<Reference>> {
    let finder = SuffixArray::new(data, LOOK_AHEAD, SEARCH, MIN_LEN);
    let mut references = Vec::new();

    let mut pos = 0;
    let end = data.len().saturating_sub(MIN_LEN);
    while pos < end {
        let (length, distance) = finder.longest_match(pos);
        if length >= MIN_LEN {
            references.push(Reference {
                pos,
                length,
                distance,
            });
            pos += length;
        } else {
            pos += 1;
        }
        progress.report(pos * 60 / data.len());
    }

    if !references.is_empty() {
        let tree = HuffmanTree::build(&ref_length_freqs(&references))?;
        debug!(
            "{} references over a length alphabet of {} symbols",
            references.len(),
            tree.leaf_count()
        );
    }
    Ok(references)
}

/// One literal token. A byte with a zero top bit is its own tag; a byte
/// with a one top bit gets a single 1 tag bit in front, and its own top bit
/// doubles as the second tag bit on the way back in.
fn push_literal(carry: &mut BitCarry, byte: u8) -> Result<()> {
    if byte & 0x80 != 0 {
        carry.push_bits(1, 1)?;
    }
    carry.push_bits(byte as u64, 8)
}

/// One reference token: the `10` tag, then the length and offset fields,
/// each behind a mode bit selecting the narrow or wide width.
fn push_reference(carry: &mut BitCarry, reference: &Reference) -> Result<()> {
    let ref_length = (reference.length - MIN_LEN) as u64;
    let offset = (reference.distance - MIN_DIST) as u64;
    let wide_length = ref_length >= 1 << REF_SMALL_LEN_BITS;
    let wide_offset = offset >= 1 << REF_SMALL_DIST_BITS;

    carry.push_bits(0b10, 2)?;
    carry.push_bits(wide_length as u64, 1)?;
    carry.push_bits(
        ref_length,
        if wide_length {
            REF_LEN_BITS
        } else {
            REF_SMALL_LEN_BITS
        },
    )?;
    carry.push_bits(wide_offset as u64, 1)?;
    carry.push_bits(
        offset,
        if wide_offset {
            REF_DIST_BITS
        } else {
            REF_SMALL_DIST_BITS
        },
    )
}
