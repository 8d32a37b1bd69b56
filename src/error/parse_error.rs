use thiserror::Error;

use crate::ast::Position;

/// Represents all errors that can occur while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found a token that cannot appear here.
    #[error("Error on {pos}: Unexpected token `{found}`, expected {expected}.")]
    UnexpectedToken {
        /// The token encountered.
        found:    String,
        /// Description of what would have been accepted.
        expected: String,
        /// Where the token starts.
        pos:      Position,
    },
    /// Reached the end of input in the middle of a construct.
    #[error("Error on {pos}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// Description of what would have been accepted.
        expected: String,
        /// Position of the end of input.
        pos:      Position,
    },
    /// A `(`, `[` or `{` was never closed.
    #[error("Error on {pos}: Unclosed '{delimiter}' opened on {opened}.")]
    UnclosedDelimiter {
        /// The opening delimiter.
        delimiter: char,
        /// Where the delimiter was opened.
        opened:    Position,
        /// Position of the end of input.
        pos:       Position,
    },
    /// The function definition syntax was invalid.
    #[error("Error on {pos}: Invalid function definition: {details}.")]
    InvalidFunctionDefinition {
        /// What is wrong with the definition.
        details: String,
        /// Where the problem was found.
        pos:     Position,
    },
    /// The left side of an assignment is not a variable or an index.
    #[error("Error on {pos}: Invalid assignment target, expected a variable or an index \
             expression.")]
    InvalidAssignmentTarget {
        /// Position of the assignment operator.
        pos: Position,
    },
}

impl ParseError {
    /// Where the error was detected.
    #[must_use]
    pub const fn pos(&self) -> Position {
        match self {
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos, .. }
            | Self::UnclosedDelimiter { pos, .. }
            | Self::InvalidFunctionDefinition { pos, .. }
            | Self::InvalidAssignmentTarget { pos } => *pos,
        }
    }

    /// 1-based line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos().line
    }

    /// 1-based column of the error.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.pos().column
    }

    /// What the parser would have accepted at the error position, if known.
    #[must_use]
    pub fn expected(&self) -> Option<String> {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEndOfInput { expected, .. } => {
                Some(expected.clone())
            },
            Self::UnclosedDelimiter { delimiter, .. } => Some(format!("'{}'", closing(*delimiter))),
            Self::InvalidAssignmentTarget { .. } => Some("a variable or an index expression".into()),
            Self::InvalidFunctionDefinition { .. } => None,
        }
    }
}

const fn closing(delimiter: char) -> char {
    match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        other => other,
    }
}
