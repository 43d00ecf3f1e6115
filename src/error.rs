//! Error types for expression tokenization, parsing, and evaluation.

use alloc::string::String;
use thiserror::Error;

use crate::lexer::TokenKind;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ExprError>;

/// Error type for expression parsing and evaluation.
///
/// Every failure mode is a distinct variant; evaluation never falls back to a
/// silent default value. Resolvers signalling "not found" is not represented
/// here at all, since it only means lookup continues with the next resolver in
/// the chain; exhausting the chain surfaces as [`ExprError::UnknownVariable`]
/// or [`ExprError::UnknownFunction`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The tokenizer hit a character it does not recognize, or a numeric
    /// literal that scans but does not decode (`"."`, `".e100"`, an integer
    /// literal outside the 64-bit range).
    #[error("unrecognized input at column {column}")]
    Lex {
        /// 0-based column of the offending character
        column: usize,
    },

    /// The parser found a token that the grammar does not allow at this
    /// position.
    #[error("unexpected {kind} token at column {column}")]
    Parse {
        /// Kind of the unexpected token
        kind: TokenKind,
        /// 0-based column of the unexpected token
        column: usize,
    },

    /// The input ended where the grammar required another token.
    #[error("unexpected end of expression")]
    ParseEnd,

    /// A name was used as a variable and no resolver in the chain knew it.
    #[error("unknown variable: '{name}'")]
    UnknownVariable { name: String },

    /// A name was called as a function and no resolver in the chain knew it.
    #[error("unknown function: '{name}'")]
    UnknownFunction { name: String },

    /// A resolver recognized the function name but rejected the number of
    /// arguments. This is definitive: resolution does not fall through to the
    /// next resolver once a name has matched.
    #[error("invalid function call to '{name}': expected {expected} arguments, found {found}")]
    InvalidFunctionCall {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Integer division or floor division by zero.
    #[error("division by zero")]
    DivideByZero,

    /// Integer arithmetic left the 64-bit range.
    #[error("integer overflow")]
    Overflow,

    /// Elementwise arithmetic over two vectors of different lengths.
    #[error("shape mismatch: lengths {left} and {right}")]
    ShapeMismatch { left: usize, right: usize },

    /// A library function was applied to a value kind it does not support,
    /// e.g. a vector passed to the scalar library.
    #[error("invalid argument to '{name}'")]
    InvalidArgument { name: String },

    /// A fixed-capacity container is full.
    #[error("capacity exceeded for {0}")]
    CapacityExceeded(&'static str),

    /// A name does not fit the fixed-capacity bindings storage.
    #[error("name too long for bindings storage")]
    NameTooLong,
}
