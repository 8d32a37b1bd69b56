use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, STACK_GROW_SIZE, STACK_RED_ZONE},
            function::{args, print},
        },
        value::{Closure, Value},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluation context, the evaluated arguments, and
/// the position of the call.
type BuiltinFn = fn(&mut Context, &[Value], Position) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name, possibly namespace-qualified,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"    => { arity: Arity::Exact(1), func: print::print },
    "println"  => { arity: Arity::AtLeast(0), func: print::println },
    "args"     => { arity: Arity::Exact(0), func: args::args },
    "os\\args" => { arity: Arity::Exact(0), func: args::args },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::AtLeast(m) => n >= m,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::AtLeast(m) => format!("at least {m}"),
        }
    }
}

/// Returns `true` if `name` is a builtin function.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

impl Context {
    /// Evaluates a call through a name.
    ///
    /// The name is first resolved through `use` aliases. Builtins are checked
    /// before user functions, so a builtin can never be shadowed. User
    /// functions are looked up through the scope chain.
    ///
    /// # Parameters
    /// - `name`: Function name as written, possibly namespace-qualified.
    /// - `arguments`: Argument expressions, evaluated left to right.
    /// - `pos`: Position of the call.
    ///
    /// # Errors
    /// - `UnknownFunction` if no builtin or user function has this name.
    /// - `ArgumentCountMismatch` on an arity mismatch.
    /// - Any error raised while evaluating arguments or running the body.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     arguments: &[Expr],
                                     pos: Position)
                                     -> EvalResult<Value> {
        let resolved = self.resolve_name(name);

        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == resolved) {
            let values = self.eval_arguments(arguments)?;
            if !builtin.arity.check(values.len()) {
                return Err(RuntimeError::ArgumentCountMismatch { name:     name.to_string(),
                                                                 expected: builtin.arity
                                                                                  .describe(),
                                                                 found:    values.len(),
                                                                 pos });
            }
            trace!(builtin = builtin.name, args = values.len(), "call");
            return (builtin.func)(self, &values, pos);
        }

        let closure = self.env
                          .get_function(&resolved)
                          .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                         pos })?;
        let values = self.eval_arguments(arguments)?;
        self.call_closure(&closure, values, pos)
    }

    /// Evaluates a call on a computed callee, such as `$f(1)`.
    ///
    /// # Errors
    /// `NotCallable` if the callee is not a function.
    pub(crate) fn eval_value_call(&mut self,
                                  callee: &Expr,
                                  arguments: &[Expr],
                                  pos: Position)
                                  -> EvalResult<Value> {
        let closure = match self.eval(callee)? {
            Value::Func(closure) => closure,
            other => {
                return Err(RuntimeError::NotCallable { type_name: other.type_name(),
                                                       pos });
            },
        };
        let values = self.eval_arguments(arguments)?;
        self.call_closure(&closure, values, pos)
    }

    /// Executes a user-defined function.
    ///
    /// Its parameter count must match the number of supplied arguments.
    /// A new scope is created whose parent is the closure's defining
    /// environment, parameters are bound in it, and the body runs there. The
    /// function's result is the value of its body.
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` on an arity mismatch.
    /// - `StackOverflow` when the call would exceed the configured depth.
    pub(crate) fn call_closure(&mut self,
                               closure: &Rc<Closure>,
                               arguments: Vec<Value>,
                               pos: Position)
                               -> EvalResult<Value> {
        if arguments.len() != closure.arity() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     closure.name().to_string(),
                                                             expected: closure.arity().to_string(),
                                                             found:    arguments.len(),
                                                             pos });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow { limit: self.config.max_call_depth,
                                                     pos });
        }

        let scope = closure.env.child();
        for (param, value) in closure.decl.params.iter().zip(arguments) {
            scope.define_variable(&param.name, value);
        }

        trace!(function = closure.name(), depth = self.depth, "call");
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.in_scope(scope, |ctx| ctx.eval_block(&closure.decl.body))
        });
        self.depth -= 1;
        result
    }

    /// Evaluates call arguments left to right.
    pub(crate) fn eval_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Value>> {
        arguments.iter().map(|argument| self.eval(argument)).collect()
    }
}
