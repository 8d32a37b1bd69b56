use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

/// Writes the textual form of one value, without a newline.
///
/// # Returns
/// `Void`.
///
/// # Errors
/// `NotPrintable` for `Void`, functions, or arrays containing them.
pub fn print(context: &mut Context, args: &[Value], pos: Position) -> EvalResult<Value> {
    let text = render_all(context, args, pos)?;
    context.write_output(&text, pos)?;
    Ok(Value::Void)
}

/// Writes the textual forms of all arguments separated by single spaces,
/// followed by a newline. With no arguments it writes just the newline.
///
/// # Returns
/// `Void`.
///
/// # Errors
/// `NotPrintable` if any argument has no textual form. Nothing is written
/// in that case.
pub fn println(context: &mut Context, args: &[Value], pos: Position) -> EvalResult<Value> {
    let mut text = render_all(context, args, pos)?;
    text.push('\n');
    context.write_output(&text, pos)?;
    Ok(Value::Void)
}

fn render_all(context: &Context, args: &[Value], pos: Position) -> EvalResult<String> {
    let rendered = args.iter()
                       .map(|value| {
                           value.render()
                                .map_err(|type_name| RuntimeError::NotPrintable { type_name,
                                                                                  pos })
                       })
                       .collect::<EvalResult<Vec<_>>>()?;
    Ok(rendered.join(" "))
}
