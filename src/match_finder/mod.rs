//! The match_finder module is the dictionary half of the codec.
//!
//! Compression quality lives or dies on finding long repeats quickly. Rather
//! than re-scanning the window for every position, the encoder builds a
//! suffix array over the whole input once and answers every
//! "longest match at position p" query by walking outward from p's rank,
//! where the lexicographic neighbours — and therefore the longest common
//! prefixes — sit.

pub mod suffix_array;
