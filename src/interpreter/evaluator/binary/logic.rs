use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context {
    /// Evaluates `&&` / `||` without evaluating the right operand when the
    /// left one already decides the result.
    ///
    /// # Returns
    /// `Int(1)` or `Int(0)`.
    pub(crate) fn eval_short_circuit(&mut self,
                                     left: &Expr,
                                     op: BinaryOperator,
                                     right: &Expr)
                                     -> EvalResult<Value> {
        let left = self.eval(left)?.is_truthy();

        match (op, left) {
            (BinaryOperator::And, false) => Ok(Value::Int(0)),
            (BinaryOperator::Or, true) => Ok(Value::Int(1)),
            _ => Ok(self.eval(right)?.is_truthy().into()),
        }
    }

    /// Evaluates a logical operation between two already evaluated values,
    /// using their truthiness.
    pub(super) fn eval_logic(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        let (left, right) = (left.is_truthy(), right.is_truthy());

        match op {
            BinaryOperator::Or => (left || right).into(),
            _ => (left && right).into(),
        }
    }
}
