use crate::{
    ast::{Expr, Position, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context {
    /// Evaluates a unary operation.
    ///
    /// - `-` negates an integer; negating `i64::MIN` overflows.
    /// - `!` yields `Int(1)` for falsy operands and `Int(0)` for truthy ones.
    ///
    /// # Errors
    /// `TypeError` when negating a non-integer, `Overflow` when the negation
    /// does not fit.
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                operand: &Expr,
                                pos: Position)
                                -> EvalResult<Value> {
        let value = self.eval(operand)?;

        match op {
            UnaryOperator::Not => Ok((!value.is_truthy()).into()),
            UnaryOperator::Negate => match value {
                Value::Int(n) => {
                    n.checked_neg()
                     .map(Value::Int)
                     .ok_or_else(|| RuntimeError::Overflow { operation: format!("-({n})"),
                                                             pos })
                },
                other => Err(RuntimeError::TypeError { details: format!("cannot negate a value \
                                                                         of type {}",
                                                                        other.type_name()),
                                                       pos }),
            },
        }
    }
}
