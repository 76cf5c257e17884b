//! The huffman_coding module builds the prefix codes for the codec.
//!
//! The encoder counts how often each reference length occurs while it gathers
//! matches, then hands the frequency table to [`huffman::HuffmanTree`]. The
//! tree-merge is fully deterministic (ascending frequency, ties broken by
//! ascending symbol), so the same input always yields the same codes — a
//! decoder rebuilding the tree from the same frequencies lands on the
//! identical shape.

pub mod huffman;
