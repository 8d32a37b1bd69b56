/// Parser entry points.
///
/// Holds the program-level loop, the expression entry point, and `if`
/// expressions.
pub mod core;

/// Prefix operators, postfix chains, and primary expressions.
pub mod unary;

/// Binary operator precedence levels, from assignment down to
/// multiplication.
pub mod binary;

/// Brace-delimited blocks.
pub mod block;

/// Shared helpers: token expectations, comma-separated lists, names, and
/// parameter lists.
pub mod utils;

/// Statements: declarations, imports, loops, and expression statements.
pub mod statement;

pub use self::core::{ParseResult, parse_expression, parse_program};
