use thiserror::Error;

/// Lexical errors.
///
/// Raised while turning source text into tokens: stray characters,
/// unterminated strings or comments, and malformed numeric literals.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// a token stream. Every variant records where the problem was found and what
/// the parser expected instead.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unknown
/// names, arity mismatches, type mismatches, division by zero, and exhausted
/// call depth.
pub mod runtime_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error that stops a program from running to completion.
///
/// Lexing and parsing errors are reported before evaluation starts, so no
/// program output precedes them. Runtime errors abort at the point of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The source could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream is not a valid program.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Follows the `sysexits.h` convention: `65` (data error) for programs
    /// that fail to lex or parse, `70` (internal software error) for programs
    /// that fail while running.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lex(_) | Self::Parse(_) => 65,
            Self::Runtime(_) => 70,
        }
    }
}
