//! # phlite
//!
//! phlite is an interpreter for a small PHP-flavoured scripting language.
//! It tokenizes, parses, and directly evaluates programs built from integers,
//! strings, shared arrays, closures, ranges, and `foreach` loops.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::{
    ast::Program,
    error::Error,
    interpreter::{
        evaluator::Context, host::Host, lexer::tokenize, parser::parse_program, value::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `Statement` and `Expr` types that
/// represent source code as a tree. The AST is built by the parser and
/// traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source positions to nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing, and evaluation.
///
/// Every error carries the line and column it was raised at, so the binary
/// can report `Error on line L, column C: ...` diagnostics.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Maps each failure class to a process exit status.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, and the host interface through which programs produce
/// output and read their arguments.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides the evaluation context used by [`run_source`] and the REPL.
pub mod interpreter;
/// Interactive read-eval-print loop.
///
/// Keeps one evaluation context alive across inputs and echoes results.
pub mod repl;
/// General utilities for checked numeric conversion.
pub mod util;

/// Tokenizes and parses a complete source file.
///
/// # Errors
/// Returns [`Error::Lex`] or [`Error::Parse`] for malformed source.
///
/// # Examples
/// ```
/// let program = phlite::parse("<?php\nfunction f() { 1 }\nf()").unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// assert!(phlite::parse("f(1, 2").is_err());
/// ```
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized");
    let program = parse_program(&tokens)?;
    debug!(statements = program.statements.len(), "parsed");
    Ok(program)
}

/// Runs a complete program with a fresh context.
///
/// The whole source is parsed before anything runs, so a lexing or parsing
/// error produces no output at all.
///
/// # Returns
/// The value of the last top-level statement that produced one.
///
/// # Errors
/// Returns the first lexing, parsing, or runtime error.
///
/// # Examples
/// ```
/// use phlite::{
///     Config,
///     interpreter::host::{Host, OutputBuffer},
///     run_source,
/// };
///
/// let out = OutputBuffer::new();
/// let host = Host::new(out.clone(), vec!["a".into(), "b".into()]);
/// let source = "foreach args() as $i => $arg { println($i, $arg) }";
///
/// run_source(source, host, Config::default()).unwrap();
/// assert_eq!(out.contents(), "0 a\n1 b\n");
///
/// // Runtime errors are reported after the output that preceded them.
/// let out = OutputBuffer::new();
/// let host = Host::new(out.clone(), Vec::new());
/// let result = run_source("println(1)\nprintln(1 / 0)", host, Config::default());
///
/// assert!(result.is_err());
/// assert_eq!(out.contents(), "1\n");
/// ```
pub fn run_source(source: &str, host: Host, config: Config) -> Result<Value, Error> {
    let mut context = Context::new(host, config);
    run_in(&mut context, source)
}

/// Parses `source` and runs it in an existing context.
///
/// Variables, functions, namespaces and aliases defined by earlier runs in
/// the same context stay visible.
///
/// # Errors
/// Returns the first lexing, parsing, or runtime error.
pub fn run_in(context: &mut Context, source: &str) -> Result<Value, Error> {
    let program = parse(source)?;
    Ok(context.run_program(&program)?)
}

pub use crate::interpreter::config::Config;
