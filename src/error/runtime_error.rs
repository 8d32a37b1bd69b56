use thiserror::Error;

use crate::ast::Position;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Read a variable that is bound in no enclosing scope.
    #[error("Error on {pos}: Undefined variable ${name}.")]
    UnknownVariable {
        /// The variable name without `$`.
        name: String,
        /// Where the variable was read.
        pos:  Position,
    },
    /// A bare name that is not `true`, `false`, a constant, or a declared
    /// function.
    #[error("Error on {pos}: Undefined identifier {name}.")]
    UnknownIdentifier {
        /// The name as written.
        name: String,
        /// Where the name was used.
        pos:  Position,
    },
    /// Called a function that does not exist.
    #[error("Error on {pos}: Call to undefined function {name}().")]
    UnknownFunction {
        /// The function name as written.
        name: String,
        /// Where the call happened.
        pos:  Position,
    },
    /// Called something that is not a function.
    #[error("Error on {pos}: Value of type {type_name} is not callable.")]
    NotCallable {
        /// Type of the callee.
        type_name: &'static str,
        /// Where the call happened.
        pos:       Position,
    },
    /// A function received the wrong number of arguments.
    #[error("Error on {pos}: {name}() expects {expected} argument(s), {found} given.")]
    ArgumentCountMismatch {
        /// The function name.
        name:     String,
        /// The accepted arity, e.g. `1` or `at least 1`.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// Where the call happened.
        pos:      Position,
    },
    /// Attempted to declare a function with a builtin's name.
    #[error("Error on {pos}: Cannot redeclare builtin function {name}().")]
    BuiltinFunctionRedefinition {
        /// The function name.
        name: String,
        /// Position of the declaration.
        pos:  Position,
    },
    /// Declared a constant that is already defined.
    #[error("Error on {pos}: Constant {name} already defined.")]
    ConstantRedefinition {
        /// The constant name.
        name: String,
        /// Position of the `const` keyword.
        pos:  Position,
    },
    /// A string that does not hold a decimal integer was converted to one.
    #[error("Error on {pos}: \"{text}\" is not a valid integer.")]
    InvalidInteger {
        /// The string being converted.
        text: String,
        /// Position of the `->` token.
        pos:  Position,
    },
    /// Used a builtin where a function value was expected.
    #[error("Error on {pos}: Builtin function {name}() cannot be used as a value.")]
    BuiltinAsValue {
        /// The builtin name.
        name: String,
        /// Where the name was used.
        pos:  Position,
    },
    /// Called an array method on a value that is not an array.
    #[error("Error on {pos}: Method {method}() requires an array, found {type_name}.")]
    ExpectedArray {
        /// The method name.
        method:    String,
        /// Type of the receiver.
        type_name: &'static str,
        /// Position of the `->` token.
        pos:       Position,
    },
    /// Called a method the receiver does not have.
    #[error("Error on {pos}: Call to undefined method {type_name}->{method}().")]
    UnknownMethod {
        /// The method name.
        method:    String,
        /// Type of the receiver.
        type_name: &'static str,
        /// Position of the `->` token.
        pos:       Position,
    },
    /// Division or modulo by zero.
    #[error("Error on {pos}: Division by zero.")]
    DivisionByZero {
        /// Position of the operator.
        pos: Position,
    },
    /// Integer arithmetic overflowed 64 bits.
    #[error("Error on {pos}: Integer overflow in {operation}.")]
    Overflow {
        /// The operation that overflowed.
        operation: String,
        /// Position of the operator.
        pos:       Position,
    },
    /// An operator or builtin was applied to values of the wrong kind.
    #[error("Error on {pos}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// Where the mismatch happened.
        pos:     Position,
    },
    /// An index was negative or past the end.
    #[error("Error on {pos}: Index {index} out of bounds for length {len}.")]
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// The length of the indexed value.
        len:   usize,
        /// Position of the index expression.
        pos:   Position,
    },
    /// `foreach` over something that is neither an array nor a range.
    #[error("Error on {pos}: Cannot iterate over a value of type {type_name}.")]
    NotIterable {
        /// Type of the iterated value.
        type_name: &'static str,
        /// Position of the `foreach` keyword.
        pos:       Position,
    },
    /// Printed a value that has no textual form.
    #[error("Error on {pos}: Cannot print a value of type {type_name}.")]
    NotPrintable {
        /// Type of the value.
        type_name: &'static str,
        /// Where the print call happened.
        pos:       Position,
    },
    /// The call depth limit was reached.
    #[error("Error on {pos}: Stack overflow: maximum call depth of {limit} exceeded.")]
    StackOverflow {
        /// The configured limit.
        limit: usize,
        /// Where the failing call happened.
        pos:   Position,
    },
    /// Writing program output failed.
    #[error("Error on {pos}: Failed to write output: {details}.")]
    Output {
        /// The underlying I/O error message.
        details: String,
        /// Where the write happened.
        pos:     Position,
    },
}

impl RuntimeError {
    /// Where the error was raised.
    #[must_use]
    pub const fn pos(&self) -> Position {
        match self {
            Self::UnknownVariable { pos, .. }
            | Self::UnknownIdentifier { pos, .. }
            | Self::UnknownFunction { pos, .. }
            | Self::NotCallable { pos, .. }
            | Self::ArgumentCountMismatch { pos, .. }
            | Self::BuiltinFunctionRedefinition { pos, .. }
            | Self::ConstantRedefinition { pos, .. }
            | Self::InvalidInteger { pos, .. }
            | Self::BuiltinAsValue { pos, .. }
            | Self::ExpectedArray { pos, .. }
            | Self::UnknownMethod { pos, .. }
            | Self::DivisionByZero { pos }
            | Self::Overflow { pos, .. }
            | Self::TypeError { pos, .. }
            | Self::IndexOutOfBounds { pos, .. }
            | Self::NotIterable { pos, .. }
            | Self::NotPrintable { pos, .. }
            | Self::StackOverflow { pos, .. }
            | Self::Output { pos, .. } => *pos,
        }
    }
}
