use crate::{
    ast::Position,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

/// Returns the program arguments as a new array of strings.
///
/// Every call allocates a fresh array, so a program may modify the result
/// without affecting later calls.
pub fn args(context: &mut Context, _args: &[Value], _pos: Position) -> EvalResult<Value> {
    let values = context.host.args().iter().map(|arg| Value::from(arg.as_str())).collect();
    Ok(Value::Array(context.heap.alloc(values)))
}
