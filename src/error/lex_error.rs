use thiserror::Error;

/// The kinds of failure the lexer can report.
///
/// This is also the error type of the `logos` lexer, so it must have a
/// `Default`: input that matches no token is an unexpected character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// A character that does not start any token.
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    /// A string literal without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A `/*` comment without a closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// Digits immediately followed by identifier characters, e.g. `12ab`.
    #[error("malformed numeric literal")]
    MalformedNumber,
    /// An integer literal that does not fit in 64 bits.
    #[error("integer literal out of range")]
    IntegerTooLarge,
}

/// A lexical error with its location in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error on line {line}, column {column}: {kind} `{found}`.")]
pub struct LexError {
    /// What went wrong.
    pub kind:   LexErrorKind,
    /// The offending source text.
    pub found:  String,
    /// 1-based line of the offending text.
    pub line:   usize,
    /// 1-based column of the offending text.
    pub column: usize,
}

impl LexError {
    /// A short human readable description, without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} `{}`", self.kind, self.found)
    }
}
