use crate::{
    ast::{BinaryOperator, Expr, Position},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` evaluate their right operand only when needed; every
    /// other operator evaluates both operands left to right and then applies
    /// [`Context::eval_binary`].
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 pos: Position)
                                 -> EvalResult<Value> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_short_circuit(left, op, right);
        }

        let left = self.eval(left)?;
        let right = self.eval(right)?;
        Self::eval_binary(op, &left, &right, pos)
    }

    /// Applies a binary operator to two evaluated operands.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator. Arithmetic goes to `eval_arithmetic`, `.` to
    /// `eval_concat`, equality and ordering to `eval_comparison`, and logical
    /// operators to `eval_logic`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `pos`: Position for error reporting.
    ///
    /// # Example
    /// ```
    /// use phlite::{
    ///     ast::{BinaryOperator, Position},
    ///     interpreter::{evaluator::Context, value::Value},
    /// };
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add,
    ///                                   &Value::Int(3),
    ///                                   &Value::Int(4),
    ///                                   Position::default());
    /// assert_eq!(result.unwrap(), Value::Int(7));
    ///
    /// let both = Context::eval_binary(BinaryOperator::And,
    ///                                 &Value::from("x"),
    ///                                 &Value::Int(0),
    ///                                 Position::default());
    /// assert_eq!(both.unwrap(), Value::Int(0));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       pos: Position)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Concat, Div, Equal, Greater, GreaterEqual, Identical, Less, LessEqual, Mod,
            Mul, NotEqual, NotIdentical, Or, Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod => Self::eval_arithmetic(op, left, right, pos),
            Concat => Self::eval_concat(left, right, pos),
            Equal | NotEqual | Identical | NotIdentical | Less | Greater | LessEqual
            | GreaterEqual => {
                Self::eval_comparison(op, left, right, pos)
            },
            And | Or => Ok(Self::eval_logic(op, left, right)),
        }
    }
}
