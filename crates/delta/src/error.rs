use std::fmt;

use thiserror::Error;

/// Which operand of a binary delta operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The delta the method was called on.
    Receiver,
    /// The delta passed as the argument.
    Argument,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Receiver => f.write_str("receiver"),
            Side::Argument => f.write_str("argument"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    #[error("diff() called on a non-document: the {0} contains a retain or delete")]
    NotADocument(Side),
    #[error("invalid operation: {0}")]
    InvalidOp(String),
}
