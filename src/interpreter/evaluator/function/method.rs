use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{ArrayRef, Value},
    },
    util::num::usize_to_i64_checked,
};

/// Methods arrays understand.
const ARRAY_METHODS: &[&str] = &["append", "length"];
/// Methods strings understand.
const STRING_METHODS: &[&str] = &["length", "toInt"];

impl Context {
    /// Evaluates `receiver->method(args)`.
    ///
    /// Arrays support `append(x, ...)`, which adds each argument to the end of
    /// the shared array and yields `Void`, and `length()`. Strings support
    /// `length()`, counted in characters, and `toInt()`, which parses an
    /// optionally signed decimal integer.
    ///
    /// # Errors
    /// - `ExpectedArray` when an array method is called on another kind.
    /// - `UnknownMethod` for any other method name.
    /// - `ArgumentCountMismatch` on an arity mismatch.
    /// - `InvalidInteger` when `toInt()` is called on a non-numeric string.
    pub(crate) fn eval_method_call(&mut self,
                                   receiver: &Expr,
                                   method: &str,
                                   arguments: &[Expr],
                                   pos: Position)
                                   -> EvalResult<Value> {
        let receiver = self.eval(receiver)?;
        let values = self.eval_arguments(arguments)?;

        match (&receiver, method) {
            (Value::Array(array), _) => eval_array_method(array, method, values, pos),
            (Value::Str(s), _) if STRING_METHODS.contains(&method) => {
                expect_arity(method, &values, 0, pos)?;
                if method == "length" {
                    length_value(s.chars().count(), pos)
                } else {
                    s.trim()
                     .parse::<i64>()
                     .map(Value::Int)
                     .map_err(|_| RuntimeError::InvalidInteger { text: s.to_string(),
                                                                 pos })
                }
            },
            (other, _) if ARRAY_METHODS.contains(&method) => {
                Err(RuntimeError::ExpectedArray { method: method.to_string(),
                                                  type_name: other.type_name(),
                                                  pos })
            },
            (other, _) => Err(RuntimeError::UnknownMethod { method:    method.to_string(),
                                                           type_name: other.type_name(),
                                                           pos }),
        }
    }
}

fn eval_array_method(array: &ArrayRef,
                     method: &str,
                     values: Vec<Value>,
                     pos: Position)
                     -> EvalResult<Value> {
    match method {
        "append" => {
            if values.is_empty() {
                return Err(RuntimeError::ArgumentCountMismatch { name:     method.to_string(),
                                                                 expected: "at least 1".into(),
                                                                 found:    0,
                                                                 pos });
            }
            array.extend(values);
            Ok(Value::Void)
        },
        "length" => {
            expect_arity(method, &values, 0, pos)?;
            length_value(array.len(), pos)
        },
        _ => Err(RuntimeError::UnknownMethod { method:    method.to_string(),
                                               type_name: "array",
                                               pos }),
    }
}

fn expect_arity(method: &str, values: &[Value], expected: usize, pos: Position) -> EvalResult<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCountMismatch { name: method.to_string(),
                                                  expected: expected.to_string(),
                                                  found: values.len(),
                                                  pos })
    }
}

fn length_value(len: usize, pos: Position) -> EvalResult<Value> {
    usize_to_i64_checked(len,
                         RuntimeError::Overflow { operation: "length".to_string(),
                                                  pos })
        .map(Value::Int)
}
