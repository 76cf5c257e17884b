//! The bitstream module is the serialisation substrate for the codec.
//!
//! Every other component writes and reads the compressed form through
//! [`bitcarry::BitCarry`], which packs arbitrary-width fields across byte
//! boundaries. Bits are filled most-significant-bit first within each output
//! byte, and multi-bit fields are written MSB-first of the field's value.
//! That ordering lets the decoder peek one or two tag bits ahead of a token
//! without buffering.

pub mod bitcarry;
