use tracing::trace;

use crate::{
    ast::{Expr, ForeachStmt},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::range_steps,
        },
        value::Value,
    },
    util::num::usize_to_i64_checked,
};

impl Context {
    /// Evaluates a `foreach` loop.
    ///
    /// The iterable may be:
    /// - a range written directly in the header (`foreach 0..25 as $i`), which
    ///   is iterated without building an array,
    /// - any expression evaluating to an array.
    ///
    /// For arrays, the length is taken once at loop entry: elements appended
    /// by the body are not visited, while elements replaced by the body are
    /// seen with their new value.
    ///
    /// Each iteration runs in a fresh child scope holding the key (the
    /// zero-based ordinal, as an integer) and value bindings, so neither leaks
    /// out of the loop.
    ///
    /// # Returns
    /// Always `Void`.
    ///
    /// # Errors
    /// `NotIterable` for any other iterable, plus any error raised by the
    /// body.
    pub(crate) fn eval_foreach(&mut self, stmt: &ForeachStmt) -> EvalResult<Value> {
        if let Expr::Range { start, end, pos } = &stmt.iterable {
            let (start, end) = self.eval_range_bounds(start, end, *pos)?;
            trace!(start, end, "foreach over range");
            for (key, n) in range_steps(start, end).enumerate() {
                self.run_iteration(stmt, key, Value::Int(n))?;
            }
            return Ok(Value::Void);
        }

        let array = match self.eval(&stmt.iterable)? {
            Value::Array(array) => array,
            other => {
                return Err(RuntimeError::NotIterable { type_name: other.type_name(),
                                                       pos:       stmt.pos, });
            },
        };

        let len = array.len();
        trace!(len, "foreach over array");
        for key in 0..len {
            let Some(value) = array.get(key) else { break };
            self.run_iteration(stmt, key, value)?;
        }
        Ok(Value::Void)
    }

    fn run_iteration(&mut self, stmt: &ForeachStmt, key: usize, value: Value) -> EvalResult<()> {
        let scope = self.env.child();
        if let Some(key_name) = &stmt.key {
            let key = usize_to_i64_checked(key,
                                           RuntimeError::Overflow { operation:
                                                                        "loop key".to_string(),
                                                                    pos:       stmt.pos, })?;
            scope.define_variable(key_name, Value::Int(key));
        }
        scope.define_variable(&stmt.value, value);

        self.in_scope(scope, |ctx| ctx.eval_block(&stmt.body))?;
        Ok(())
    }
}
