//! Lossless byte-stream compression built from a sliding-window dictionary
//! coder and a prefix-code coder.
//!
//! - Provides one-shot, buffer-in/buffer-out `compress` and `decompress`.
//! - Finds repeats with a suffix array over the whole input, so match
//!   queries stay cheap even on highly repetitive data.
//! - Never inflates: incompressible input is stored raw behind a one-bit
//!   flag, so the output is at most the input plus two bytes.
//!
//! Basic usage:
//!
//! ```
//! let data = b"to be or not to be, that is the question".to_vec();
//! let packed = sqz::compress(&data).unwrap();
//! assert_eq!(sqz::decompress(&packed).unwrap(), data);
//! ```
//!
//! The stream layout is self-defined and not interchangeable with DEFLATE
//! or gzip.

pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod match_finder;
pub mod tools;

pub use compression::compress::{compress, compress_with_progress};
pub use compression::decompress::{decompress, decompress_with_progress};
pub use error::{Error, Result};
