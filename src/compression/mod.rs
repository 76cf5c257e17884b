//! The compression module drives the codec end to end.
//!
//! Compression happens in the following steps:
//! - Suffix-array match finding: every repeat of 4+ bytes within the 64 KiB
//!   window behind the cursor becomes a `(position, length, distance)`
//!   reference.
//! - Huffman accounting: the reference lengths are frequency-counted and a
//!   prefix-code tree is built over them (the canonical stream layout does
//!   not serialise it; see `MAX_FREQ_BITS_LEN`).
//! - Token emission: literals and references are interleaved into the bit
//!   stream in input order, with single-bit tags discriminating them.
//! - Inflation guard: if the token stream ends up larger than the input,
//!   it is thrown away and the input is stored raw behind a 0 flag bit.
//!
//! Decompression reads the flag bit and replays the token stream directly;
//! it needs neither the match finder nor the Huffman tree.

pub mod compress;
pub mod decompress;

/// Bits of the wide reference-length field.
pub const REF_LEN_BITS: u32 = 8;
/// Bits of the narrow reference-length field.
pub const REF_SMALL_LEN_BITS: u32 = 4;
/// Bits of the wide reference-offset field.
pub const REF_DIST_BITS: u32 = 16;
/// Bits of the narrow reference-offset field.
pub const REF_SMALL_DIST_BITS: u32 = 10;

/// Shortest repeat worth a reference. A reference costs at least 19 bits,
/// so three-byte repeats are a loss on average.
pub const MIN_LEN: usize = 4;
/// Shortest representable back-distance.
pub const MIN_DIST: usize = 1;

/// Longest match a reference can carry: [4, 259] maps onto the 8-bit
/// length field as [0, 255].
pub const LOOK_AHEAD: usize = (1 << REF_LEN_BITS) - 1 + MIN_LEN;
/// Window size; back-distances [1, 65536] map onto the 16-bit offset field
/// as [0, 65535].
pub const SEARCH: usize = (1 << REF_DIST_BITS) + MIN_DIST;

/// Width of the max-frequency-width field a serialised Huffman header would
/// start with. The canonical layout omits the header; this records the
/// constant for the header-carrying variant of the stream.
pub const MAX_FREQ_BITS_LEN: u32 = 5;

/// A dictionary match: `length` bytes at `pos` repeat the bytes starting
/// `distance` back. Overlap (`length > distance`) is legal and decodes as a
/// run-length expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub pos: usize,
    pub length: usize,
    pub distance: usize,
}

/// Monotone percentage reporter wrapped around a caller observer. Reports
/// are best-effort: clamped to 100 and never decreasing.
pub(crate) struct Progress<'a> {
    observer: &'a mut dyn FnMut(u8),
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(observer: &'a mut dyn FnMut(u8)) -> Self {
        Self {
            observer,
            last: None,
        }
    }

    pub(crate) fn report(&mut self, percent: usize) {
        let percent = percent.min(100) as u8;
        if self.last.map_or(true, |last| percent > last) {
            self.last = Some(percent);
            (self.observer)(percent);
        }
    }
}

#[cfg(test)]
mod test {
    use super::compress::{compress, compress_with_progress};
    use super::decompress::{decompress, decompress_with_progress};
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(data: &[u8]) {
        let packed = compress(data).unwrap();
        assert_eq!(decompress(&packed).unwrap(), data, "round trip failed");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(compress(&[]).unwrap(), Vec::<u8>::new());
        assert_eq!(decompress(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_stores_raw() {
        // 9 encoded bits inflate the single input byte, so the guard kicks
        // in: flag 0, then 0x41 byte-aligned behind it.
        let packed = compress(&[0x41]).unwrap();
        assert_eq!(packed, vec![0x20, 0x80]);
        assert_eq!(decompress(&packed).unwrap(), vec![0x41]);
    }

    #[test]
    fn long_run_compresses_hard() {
        let data = vec![0_u8; 300];
        let packed = compress(&data).unwrap();
        assert!(packed.len() < 40, "run packed to {} bytes", packed.len());
        assert!(packed[0] & 0x80 != 0, "expected the compressed flag");
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn incompressible_text_falls_back_to_raw() {
        // Eight distinct top-bit-zero bytes encode to 65 bits, one over the
        // raw size, so the stored form wins: 1 flag bit + 8 bytes.
        let data = b"abcdefgh";
        let packed = compress(data).unwrap();
        assert_eq!(packed.len(), 9);
        assert_eq!(packed[0], 0x30); // flag 0, then 'a' = 0x61 shifted in
        assert_eq!(decompress(&packed).unwrap(), data.to_vec());
    }

    #[test]
    fn overlapping_run_bit_layout() {
        // Two literals, then one reference with length 6, distance 2:
        // 1 | 00000001 | 00000010 | 10 0 0010 0 0000000001 | padding.
        let data = [1, 2, 1, 2, 1, 2, 1, 2];
        let packed = compress(&data).unwrap();
        assert_eq!(packed, vec![0x80, 0x81, 0x42, 0x00, 0x20]);
        assert_eq!(decompress(&packed).unwrap(), data.to_vec());
    }

    #[test]
    fn high_literals_round_trip() {
        round_trip(&[0xff; 300]);
        round_trip(&[0x80, 0xff, 0x7f, 0x00, 0x81, 0xfe, 0x80, 0xff]);
    }

    #[test]
    fn structured_inputs_round_trip() {
        round_trip(b"the quick brown fox jumps over the lazy dog ".repeat(50).as_slice());
        round_trip(&[0xab; 4]);
        round_trip(&[0xab; 5]);
        round_trip(b"aaaabaaaabaaaab");
        let ramp: Vec<u8> = (0..=255).collect();
        round_trip(&ramp);
        round_trip(&ramp.repeat(40));
    }

    #[test]
    fn random_inputs_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for &len in &[1_usize, 2, 3, 5, 64, 1_000, 5_000] {
            let noise: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            round_trip(&noise);
            // Low-entropy variant with plenty of repeats.
            let chatty: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4) * 60).collect();
            round_trip(&chatty);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let data = b"deterministic deterministic deterministic".to_vec();
        assert_eq!(compress(&data).unwrap(), compress(&data).unwrap());
    }

    #[test]
    fn inflation_is_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        for &len in &[1_usize, 7, 64, 256, 1_000] {
            let noise: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let packed = compress(&noise).unwrap();
            assert!(
                packed.len() <= noise.len() + 2,
                "{} bytes inflated to {}",
                noise.len(),
                packed.len()
            );
        }
    }

    #[test]
    fn reference_before_start_is_corrupt() {
        use crate::bitstream::bitcarry::BitCarry;
        let mut carry = BitCarry::new();
        carry.push_bits(1, 1).unwrap(); // compressed flag
        carry.push_bits(0b10, 2).unwrap(); // reference tag
        carry.push_bits(0, 1).unwrap(); // narrow length
        carry.push_bits(0, 4).unwrap(); // length 4
        carry.push_bits(0, 1).unwrap(); // narrow offset
        carry.push_bits(5, 10).unwrap(); // distance 6 with nothing decoded
        let stream = carry.into_bytes(true);
        assert!(matches!(
            decompress(&stream),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn truncated_token_is_corrupt() {
        use crate::bitstream::bitcarry::BitCarry;
        let mut carry = BitCarry::new();
        carry.push_bits(1, 1).unwrap(); // compressed flag
        carry.push_bits(0b10, 2).unwrap(); // reference tag
        carry.push_bits(1, 1).unwrap(); // wide length
        carry.push_bits(0, 8).unwrap(); // length 4
        carry.push_bits(1, 1).unwrap(); // wide offset...
        carry.push_bits(0, 4).unwrap(); // ...but only 4 of its 16 bits
        let stream = carry.into_bytes(true);
        assert!(matches!(
            decompress(&stream),
            Err(Error::CorruptStream(_))
        ));
    }

    #[test]
    fn compress_progress_is_monotone() {
        let data = b"progress progress progress progress ".repeat(60);
        let mut seen = Vec::new();
        let packed = compress_with_progress(&data, &mut |p| seen.push(p)).unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*seen.last().unwrap(), 100);

        let mut seen = Vec::new();
        let out = decompress_with_progress(&packed, &mut |p| seen.push(p)).unwrap();
        assert_eq!(out, data);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*seen.last().unwrap(), 100);
    }
}
