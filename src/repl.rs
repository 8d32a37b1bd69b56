use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::debug;

use crate::{
    Config, run_in,
    interpreter::{evaluator::Context, host::Host, value::Value},
};

/// Prompt shown before each input line.
pub const PROMPT: &str = "php> ";

/// Runs the interactive loop until end of input.
///
/// Each line is parsed and run in one long-lived [`Context`], so variables,
/// functions and `use` aliases carry over between lines. A line that
/// produces a printable value other than `Void` has that value echoed.
/// Errors are printed to standard error and the loop continues.
///
/// `Ctrl-C` discards the current line; `Ctrl-D` ends the session.
///
/// # Errors
/// Returns an error if the terminal cannot be set up or read from.
pub fn run(args: Vec<String>, config: Config) -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut context = Context::new(Host::stdout(args), config);

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;
                if let Some(echo) = eval_line(&mut context, &line) {
                    println!("{echo}");
                }
            },
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }

    debug!("repl finished");
    Ok(())
}

/// Runs one line of input and returns the text to echo, if any.
///
/// Errors are written to standard error and yield `None`.
///
/// # Examples
/// ```
/// use phlite::{
///     Config,
///     interpreter::{
///         evaluator::Context,
///         host::{Host, OutputBuffer},
///     },
///     repl::eval_line,
/// };
///
/// let mut context = Context::new(Host::new(OutputBuffer::new(), Vec::new()), Config::default());
///
/// assert_eq!(eval_line(&mut context, "$a = [1, 2]"), Some("[1, 2]".to_string()));
/// assert_eq!(eval_line(&mut context, "$a->append(3)"), None);
/// assert_eq!(eval_line(&mut context, "$a->length()"), Some("3".to_string()));
/// assert_eq!(eval_line(&mut context, "$missing"), None);
/// ```
pub fn eval_line(context: &mut Context, line: &str) -> Option<String> {
    match run_in(context, line) {
        Ok(Value::Void) => None,
        Ok(value) => value.render().ok(),
        Err(e) => {
            eprintln!("{e}");
            None
        },
    }
}
