use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context {
    /// Evaluates equality and ordering comparisons.
    ///
    /// `==` and `!=` accept any two values: integers and strings compare by
    /// content, arrays and functions by identity, and values of different
    /// kinds are never equal. Since `==` never converts between kinds,
    /// `===` and `!==` give the same answers. `< > <= >=` compare integers
    /// numerically and strings bytewise.
    ///
    /// # Returns
    /// `Int(1)` when the comparison holds, `Int(0)` otherwise.
    ///
    /// # Errors
    /// `TypeError` when ordering values that are not both integers or both
    /// strings.
    pub(crate) fn eval_comparison(op: BinaryOperator,
                                  left: &Value,
                                  right: &Value,
                                  pos: Position)
                                  -> EvalResult<Value> {
        use BinaryOperator::{
            Equal, Greater, GreaterEqual, Identical, Less, LessEqual, NotEqual, NotIdentical,
        };

        let holds = match op {
            Equal | Identical => left == right,
            NotEqual | NotIdentical => left != right,
            _ => {
                let ordering = Self::compare(left, right, op, pos)?;
                match op {
                    Less => ordering == Ordering::Less,
                    Greater => ordering == Ordering::Greater,
                    LessEqual => ordering != Ordering::Greater,
                    GreaterEqual => ordering != Ordering::Less,
                    _ => false,
                }
            },
        };
        Ok(holds.into())
    }

    fn compare(left: &Value,
               right: &Value,
               op: BinaryOperator,
               pos: Position)
               -> EvalResult<Ordering> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            _ => Err(RuntimeError::TypeError { details: format!("cannot compare {} {op} {}",
                                                                left.type_name(),
                                                                right.type_name()),
                                               pos }),
        }
    }
}
