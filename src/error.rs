//! Error kinds shared by the whole crate.
//!
//! Every failure surfaces immediately to the caller of `compress`/`decompress`;
//! there is no internal recovery. Empty input is not an error, and neither is
//! an incompressible buffer (that case falls back to raw storage silently).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A bit read ran past the write cursor of the stream.
    #[error("bit read past the end of the stream")]
    Underflow,

    /// A field width outside the supported range was requested.
    #[error("bit width {width} is out of range (maximum is 64)")]
    Width { width: u32 },

    /// The compressed stream is semantically invalid, e.g. a back-reference
    /// pointing before the start of the decoded output.
    #[error("corrupt compressed stream: {0}")]
    CorruptStream(&'static str),

    /// A Huffman tree was requested for an alphabet with no symbols.
    #[error("huffman alphabet is empty")]
    EmptyAlphabet,

    /// I/O failure in the file-handling layer of the CLI.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
