//! Error handling.
//!
//! The query surface is infallible by design: `bool`, `Option`, or an empty
//! iterator covers "not found" — there is nothing to fail. Fallibility only
//! enters at the edge that's inherently fallible: reading a file that might
//! not be one of ours.

use thiserror::Error;

/// Everything that can go wrong loading a persisted trie.
#[derive(Debug, Error)]
pub enum Error {
    /// The header or body didn't describe a trie this build can read: wrong
    /// magic, unsupported version, or a tag (container/variant/encoding/
    /// integer width/value kind) the caller's `S`/`V` doesn't match.
    #[error("invalid flattrie file: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
