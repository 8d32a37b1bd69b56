use std::rc::Rc;

use crate::{
    ast::{AssignTarget, BinaryOperator, Block, Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::is_builtin,
        },
        value::{ArrayRef, Value},
    },
    util::num::i64_to_usize_checked,
};

impl Context {
    /// Reads a variable through the scope chain.
    ///
    /// # Errors
    /// `UnknownVariable` if no enclosing scope binds `name`.
    pub(crate) fn eval_variable(&self, name: &str, pos: Position) -> EvalResult<Value> {
        self.env
            .get_variable(name)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           pos })
    }

    /// Evaluates a bare name.
    ///
    /// `true` and `false` are the integers `1` and `0`. Constants come next;
    /// any other name must refer to a user function, which is returned as a
    /// function value.
    pub(crate) fn eval_identifier(&self, name: &str, pos: Position) -> EvalResult<Value> {
        match name {
            "true" => return Ok(Value::Int(1)),
            "false" => return Ok(Value::Int(0)),
            _ => {},
        }
        if let Some(value) = self.constants.get(name) {
            return Ok(value.clone());
        }

        let resolved = self.resolve_name(name);
        if is_builtin(&resolved) {
            return Err(RuntimeError::BuiltinAsValue { name: name.to_string(),
                                                      pos });
        }
        self.env
            .get_function(&resolved)
            .map(Value::Func)
            .ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.to_string(),
                                                             pos })
    }

    /// Applies `use` aliases to a function name.
    ///
    /// Only the first path segment is looked up, so `use a\b` makes both
    /// `b` and `b\c` resolve below `a\b`.
    pub(crate) fn resolve_name(&self, name: &str) -> String {
        let (head, rest) = name.split_once('\\').map_or((name, None), |(h, r)| (h, Some(r)));
        match (self.aliases.get(head), rest) {
            (Some(target), None) => target.clone(),
            (Some(target), Some(rest)) => format!("{target}\\{rest}"),
            (None, _) => name.to_string(),
        }
    }

    /// Evaluates an assignment and returns the assigned value.
    ///
    /// A variable assignment updates the nearest scope that already binds the
    /// name, or creates the binding in the current scope. An index assignment
    /// writes through to the shared array. Compound operators read the
    /// current value first.
    pub(crate) fn eval_assignment(&mut self,
                                  target: &AssignTarget,
                                  op: Option<BinaryOperator>,
                                  value: &Expr,
                                  pos: Position)
                                  -> EvalResult<Value> {
        match target {
            AssignTarget::Variable(name) => {
                let current = match op {
                    Some(_) => Some(self.eval_variable(name, pos)?),
                    None => None,
                };
                let rhs = self.eval(value)?;
                let new_value = match (op, current) {
                    (Some(op), Some(current)) => Self::eval_binary(op, &current, &rhs, pos)?,
                    _ => rhs,
                };
                self.env.assign_variable(name, new_value.clone());
                Ok(new_value)
            },
            AssignTarget::Index { target, index } => {
                let array = match self.eval(target)? {
                    Value::Array(array) => array,
                    other => {
                        return Err(RuntimeError::TypeError { details: format!("cannot assign to \
                                                                               an index of {}",
                                                                              other.type_name()),
                                                             pos });
                    },
                };
                let index = self.eval(index)?;
                let slot = array_slot(&array, &index, pos)?;
                let rhs = self.eval(value)?;
                let new_value = match op {
                    Some(op) => {
                        let current = array.get(slot).unwrap_or(Value::Void);
                        Self::eval_binary(op, &current, &rhs, pos)?
                    },
                    None => rhs,
                };
                if !array.set(slot, new_value.clone()) {
                    return Err(out_of_bounds(&array, &index, pos));
                }
                Ok(new_value)
            },
        }
    }

    /// Evaluates `target[index]` on an array or a string.
    ///
    /// String indices count characters and yield a one-character string.
    pub(crate) fn eval_index(&mut self,
                             target: &Expr,
                             index: &Expr,
                             pos: Position)
                             -> EvalResult<Value> {
        let target = self.eval(target)?;
        let index = self.eval(index)?;

        match target {
            Value::Array(array) => {
                let slot = array_slot(&array, &index, pos)?;
                array.get(slot).ok_or_else(|| out_of_bounds(&array, &index, pos))
            },
            Value::Str(s) => {
                let Value::Int(i) = index else {
                    return Err(index_type_error(&index, pos));
                };
                let len = s.chars().count();
                i64_to_usize_checked(i, ()).ok()
                                           .and_then(|i| s.chars().nth(i))
                                           .map(|c| Value::Str(Rc::from(c.to_string())))
                                           .ok_or(RuntimeError::IndexOutOfBounds { index: i,
                                                                                   len,
                                                                                   pos })
            },
            other => Err(RuntimeError::TypeError { details: format!("cannot index a value of \
                                                                     type {}",
                                                                    other.type_name()),
                                                   pos }),
        }
    }

    /// Evaluates the elements of an array literal into a new array.
    pub(crate) fn eval_array_literal(&mut self, elements: &[Expr]) -> EvalResult<Value> {
        let values = elements.iter()
                             .map(|element| self.eval(element))
                             .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::Array(self.heap.alloc(values)))
    }

    /// Evaluates a range outside of `foreach` by collecting it into a new
    /// array.
    pub(crate) fn eval_range(&mut self, start: &Expr, end: &Expr, pos: Position) -> EvalResult<Value> {
        let (start, end) = self.eval_range_bounds(start, end, pos)?;
        let values = range_steps(start, end).map(Value::Int).collect();
        Ok(Value::Array(self.heap.alloc(values)))
    }

    /// Evaluates both bounds of a range, which must be integers.
    pub(crate) fn eval_range_bounds(&mut self,
                                    start: &Expr,
                                    end: &Expr,
                                    pos: Position)
                                    -> EvalResult<(i64, i64)> {
        match (self.eval(start)?, self.eval(end)?) {
            (Value::Int(start), Value::Int(end)) => Ok((start, end)),
            (start, end) => Err(RuntimeError::TypeError { details: format!("range bounds must be \
                                                                            int, found {} and {}",
                                                                           start.type_name(),
                                                                           end.type_name()),
                                                          pos }),
        }
    }

    /// Evaluates an `if` expression.
    ///
    /// The chosen branch runs in a fresh child scope. Without an `else`, a
    /// false condition yields `Void`.
    pub(crate) fn eval_if_expr(&mut self,
                               condition: &Expr,
                               then_branch: &Block,
                               else_branch: Option<&Expr>)
                               -> EvalResult<Value> {
        let condition = self.eval(condition)?;

        if condition.is_truthy() {
            let scope = self.env.child();
            self.in_scope(scope, |ctx| ctx.eval_block(then_branch))
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch)
        } else {
            Ok(Value::Void)
        }
    }
}

/// The integers of `start..end`: `start` inclusive, `end` exclusive,
/// counting down when `start > end`.
pub(crate) fn range_steps(start: i64, end: i64) -> impl Iterator<Item = i64> {
    let ascending = start <= end;
    (0..start.abs_diff(end)).map(move |k| {
                                if ascending {
                                    start.wrapping_add_unsigned(k)
                                } else {
                                    start.wrapping_sub_unsigned(k)
                                }
                            })
}

/// Converts an index value into a valid position in `array`.
fn array_slot(array: &ArrayRef, index: &Value, pos: Position) -> EvalResult<usize> {
    let Value::Int(i) = index else {
        return Err(index_type_error(index, pos));
    };
    match i64_to_usize_checked(*i, ()) {
        Ok(slot) if slot < array.len() => Ok(slot),
        _ => Err(out_of_bounds(array, index, pos)),
    }
}

fn out_of_bounds(array: &ArrayRef, index: &Value, pos: Position) -> RuntimeError {
    let index = if let Value::Int(i) = index { *i } else { 0 };
    RuntimeError::IndexOutOfBounds { index,
                                     len: array.len(),
                                     pos }
}

fn index_type_error(index: &Value, pos: Position) -> RuntimeError {
    RuntimeError::TypeError { details: format!("index must be int, found {}", index.type_name()),
                              pos }
}

#[cfg(test)]
mod tests {
    use super::range_steps;

    #[test]
    fn ranges_exclude_the_end() {
        assert_eq!(range_steps(0, 4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(range_steps(3, 0).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(range_steps(5, 5).count(), 0);
        assert_eq!(range_steps(i64::MAX - 1, i64::MAX).collect::<Vec<_>>(), vec![i64::MAX - 1]);
    }
}
