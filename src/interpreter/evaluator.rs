/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions, including
/// arithmetic, string concatenation, comparisons, and logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, statement
/// execution, and function hoisting.
pub mod core;

/// Lexical environments.
///
/// A chain of scopes holding variables and functions. Closures keep their
/// defining environment alive.
pub mod environment;

/// Evaluation of `foreach` loops over arrays and ranges.
pub mod foreach;

/// Utility functions for evaluation.
///
/// Variables, assignment, indexing, literals, blocks and conditionals.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking,
/// method calls on arrays and strings, and call depth accounting.
pub mod function;

pub use self::core::{Context, EvalResult};
