use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
    util::num::i64_to_usize_checked,
};

/// Longest string, in bytes, that `*` may build.
const MAX_REPEATED_LEN: usize = 1 << 30;

impl Context {
    /// Evaluates `+ - * / %`.
    ///
    /// Integers use checked 64 bit arithmetic: `/` truncates toward zero and
    /// `%` takes the sign of the dividend. Two strings may be added
    /// (concatenation) and a string may be multiplied by a non-negative
    /// integer (repetition). Every other combination is a type error.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` or `%` with a zero divisor.
    /// - `Overflow` if the result does not fit in 64 bits, or a repeated
    ///   string would exceed 1 GiB.
    /// - `TypeError` for unsupported operand kinds.
    pub(crate) fn eval_arithmetic(op: BinaryOperator,
                                  left: &Value,
                                  right: &Value,
                                  pos: Position)
                                  -> EvalResult<Value> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Self::eval_int_arithmetic(op, *a, *b, pos),
            (Value::Str(a), Value::Str(b)) if op == BinaryOperator::Add => {
                Ok(Value::Str(Rc::from(format!("{a}{b}"))))
            },
            (Value::Str(s), Value::Int(n)) if op == BinaryOperator::Mul => {
                let count =
                    i64_to_usize_checked(*n, RuntimeError::TypeError { details: format!("cannot \
                                                                                         repeat a \
                                                                                         string \
                                                                                         {n} times"),
                                                                       pos })?;
                match s.len().checked_mul(count) {
                    Some(len) if len <= MAX_REPEATED_LEN => {
                        Ok(Value::Str(Rc::from(s.repeat(count))))
                    },
                    _ => Err(RuntimeError::Overflow { operation: "string repetition".to_string(),
                                                      pos }),
                }
            },
            _ => Err(unsupported(op, left, right, pos)),
        }
    }

    fn eval_int_arithmetic(op: BinaryOperator, a: i64, b: i64, pos: Position) -> EvalResult<Value> {
        let result = match op {
            BinaryOperator::Add => a.checked_add(b),
            BinaryOperator::Sub => a.checked_sub(b),
            BinaryOperator::Mul => a.checked_mul(b),
            BinaryOperator::Div | BinaryOperator::Mod if b == 0 => {
                return Err(RuntimeError::DivisionByZero { pos });
            },
            BinaryOperator::Div => a.checked_div(b),
            BinaryOperator::Mod => a.checked_rem(b),
            _ => return Err(unsupported(op, &Value::Int(a), &Value::Int(b), pos)),
        };

        result.map(Value::Int)
              .ok_or_else(|| RuntimeError::Overflow { operation: format!("{a} {op} {b}"),
                                                      pos })
    }

    /// Evaluates `.`: concatenates the textual forms of two integers or
    /// strings.
    pub(crate) fn eval_concat(left: &Value, right: &Value, pos: Position) -> EvalResult<Value> {
        match (left, right) {
            (Value::Int(_) | Value::Str(_), Value::Int(_) | Value::Str(_)) => {
                Ok(Value::Str(Rc::from(format!("{}{}", scalar_text(left), scalar_text(right)))))
            },
            _ => Err(unsupported(BinaryOperator::Concat, left, right, pos)),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.to_string(),
        _ => String::new(),
    }
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value, pos: Position) -> RuntimeError {
    RuntimeError::TypeError { details: format!("unsupported operand types: {} {op} {}",
                                               left.type_name(),
                                               right.type_name()),
                              pos }
}
