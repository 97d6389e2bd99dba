//! Error types.
//!
//! The expression algebra itself is total: building, normalising,
//! differentiating and compiling well-formed expressions cannot fail.
//! Errors only arise at the edges — parsing pattern text and moving
//! compiled automata to and from disk.

use thiserror::Error;

use crate::parser::ParseError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QuotientError>;

#[derive(Debug, Error)]
pub enum QuotientError {
    /// The pattern text did not parse.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// A compiled DFA could not be serialized.
    #[error("serialize failed: {0}")]
    SerializeError(String),

    /// A DFA file on disk could not be decoded.
    #[error("malformed DFA file: {0}")]
    MalformedDfa(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
