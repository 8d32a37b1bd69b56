/// The evaluator module executes the syntax tree.
///
/// The evaluator walks the tree produced by the parser, manages scopes and
/// closures, performs arithmetic and comparisons, dispatches builtin and user
/// function calls, and writes program output through the host.
///
/// # Responsibilities
/// - Evaluates every expression and statement form.
/// - Hoists function declarations and resolves names through the scope chain.
/// - Reports runtime errors such as division by zero or arity mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as
/// integers, strings, identifiers, operators, delimiters, and keywords. This
/// is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source location.
/// - Discards whitespace, comments, and the `<?php` open tag.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// a [`Program`](crate::ast::Program) that represents the syntactic
/// structure of the source.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting errors with location and expectation.
/// - Encodes operator precedence and associativity.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and its truthiness and textual form.
/// - Stores arrays in a shared arena so copies alias the same elements.
/// - Pairs function declarations with their defining environment.
pub mod value;
/// Output sink and argument provider injected into the evaluator.
pub mod host;
/// Evaluator limits.
pub mod config;
