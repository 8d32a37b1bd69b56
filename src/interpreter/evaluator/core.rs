use std::{collections::HashMap, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{Block, Expr, FunctionDecl, Position, Program, Statement},
    error::RuntimeError,
    interpreter::{
        config::Config,
        evaluator::{environment::Environment, function::core::is_builtin},
        host::Host,
        value::{ArrayHeap, Closure, Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Remaining stack below which evaluation moves to a new stack segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each stack segment allocated for deep evaluation.
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the global and current scopes,
/// the array heap, the host the program talks to, and the bookkeeping for
/// namespaces, `use` aliases and call depth.
///
/// ## Usage
///
/// A `Context` is created once per run. The REPL keeps one alive across
/// inputs so variables and functions persist between lines.
///
/// ```
/// use phlite::{
///     interpreter::{
///         config::Config,
///         evaluator::Context,
///         host::{Host, OutputBuffer},
///         lexer::tokenize,
///         parser::parse_program,
///     },
/// };
///
/// let out = OutputBuffer::new();
/// let mut context = Context::new(Host::new(out.clone(), Vec::new()), Config::default());
///
/// let program = parse_program(&tokenize("$x = 2\nprintln($x * 21)").unwrap()).unwrap();
/// context.run_program(&program).unwrap();
///
/// assert_eq!(out.contents(), "42\n");
/// ```
pub struct Context {
    /// The scope currently in effect.
    pub(crate) env:       Environment,
    /// Storage for every array created by the program.
    pub(crate) heap:      ArrayHeap,
    /// Output sink and program arguments.
    pub(crate) host:      Host,
    /// Evaluator limits.
    pub(crate) config:    Config,
    /// Number of user function calls currently active.
    pub(crate) depth:     usize,
    /// Path of the most recent `namespace` declaration.
    pub(crate) namespace: Vec<String>,
    /// `use` aliases, mapping a short name to a qualified one.
    pub(crate) aliases:   HashMap<String, String>,
    /// Values bound by `const` declarations.
    pub(crate) constants: HashMap<String, Value>,
}

impl Context {
    /// Creates a context with an empty global scope.
    #[must_use]
    pub fn new(host: Host, config: Config) -> Self {
        Self { env: Environment::new(),
               heap: ArrayHeap::new(),
               host,
               config,
               depth: 0,
               namespace: Vec::new(),
               aliases: HashMap::new(),
               constants: HashMap::new() }
    }

    /// The registry of arrays this context has created.
    #[must_use]
    pub const fn heap(&self) -> &ArrayHeap {
        &self.heap
    }

    /// Runs a program in the global scope.
    ///
    /// Function declarations are hoisted first, so calls may precede the
    /// declarations they refer to. Statements then run in order.
    ///
    /// # Returns
    /// The value of the last top-level statement that produced one, or
    /// `Void` if none did.
    ///
    /// # Errors
    /// Returns the first runtime error. Output written before the error is
    /// kept.
    pub fn run_program(&mut self, program: &Program) -> EvalResult<Value> {
        self.hoist(&program.statements)?;
        debug!(statements = program.statements.len(), "running program");

        let mut last = Value::Void;
        for statement in &program.statements {
            let value = self.eval_statement(statement)?;
            if !matches!(value, Value::Void) {
                last = value;
            }
        }
        self.flush(Position::default())?;
        debug!(live_arrays = self.heap.allocated(), "program finished");
        Ok(last)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The stack
    /// grows on demand, so nesting depth is limited by the configured call
    /// depth rather than by the host thread.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_expr(expr))
    }

    /// Dispatches on the expression variant.
    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::IntLiteral { value, .. } => Ok(Value::Int(*value)),
            Expr::StringLiteral { value, .. } => Ok(Value::Str(Rc::clone(value))),
            Expr::Variable { name, pos } => self.eval_variable(name, *pos),
            Expr::Identifier { name, pos } => self.eval_identifier(name, *pos),
            Expr::Unary { op, operand, pos } => self.eval_unary_op(*op, operand, *pos),
            Expr::Binary { left, op, right, pos } => self.eval_binary_op(left, *op, right, *pos),
            Expr::Assign { target,
                           op,
                           value,
                           pos, } => self.eval_assignment(target, *op, value, *pos),
            Expr::Range { start, end, pos } => self.eval_range(start, end, *pos),
            Expr::ArrayLiteral { elements, .. } => self.eval_array_literal(elements),
            Expr::Index { target, index, pos } => self.eval_index(target, index, *pos),
            Expr::Call { name,
                         arguments,
                         pos, } => self.eval_function_call(name, arguments, *pos),
            Expr::CallValue { callee,
                              arguments,
                              pos, } => self.eval_value_call(callee, arguments, *pos),
            Expr::MethodCall { receiver,
                               method,
                               arguments,
                               pos, } => self.eval_method_call(receiver, method, arguments, *pos),
            Expr::If { condition,
                       then_branch,
                       else_branch,
                       .. } => self.eval_if_expr(condition, then_branch, else_branch.as_deref()),
            Expr::Block(block) => {
                let scope = self.env.child();
                self.in_scope(scope, |ctx| ctx.eval_block(block))
            },
            Expr::Closure(decl) => Ok(Value::Func(Rc::new(Closure { decl: Rc::clone(decl),
                                                                    env:  self.env.clone(), }))),
        }
    }

    /// Evaluates a single statement.
    ///
    /// Expression statements yield their value; every other statement yields
    /// `Void`. Function declarations were registered by [`Context::hoist`]
    /// and do nothing here.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Value> {
        match statement {
            Statement::Namespace { path, .. } => {
                debug!(namespace = %path.join("\\"), "entering namespace");
                self.namespace.clone_from(path);
                Ok(Value::Void)
            },
            Statement::Use { path, alias, .. } => {
                let qualified = path.join("\\");
                let short = alias.as_ref().or_else(|| path.last()).cloned().unwrap_or_default();
                trace!(alias = %short, target = %qualified, "use");
                self.aliases.insert(short, qualified);
                Ok(Value::Void)
            },
            Statement::Const { name, value, pos } => {
                if self.constants.contains_key(name) {
                    return Err(RuntimeError::ConstantRedefinition { name: name.clone(),
                                                                    pos:  *pos, });
                }
                let value = self.eval(value)?;
                trace!(constant = %name, "defined");
                self.constants.insert(name.clone(), value);
                Ok(Value::Void)
            },
            Statement::Function(_) => Ok(Value::Void),
            Statement::Foreach(stmt) => self.eval_foreach(stmt),
            Statement::Expression { expr, .. } => self.eval(expr),
        }
    }

    /// Runs the statements of a block in the current scope.
    ///
    /// The caller decides which scope that is: a fresh child scope for `if`
    /// branches and bare blocks, the call scope for function bodies, and the
    /// per-iteration scope for loops.
    pub(crate) fn eval_block(&mut self, block: &Block) -> EvalResult<Value> {
        self.hoist(&block.statements)?;

        let mut last = Value::Void;
        for statement in &block.statements {
            last = self.eval_statement(statement)?;
        }
        Ok(last)
    }

    /// Registers every function declared directly in `statements` in the
    /// current scope.
    ///
    /// Declarations are processed in source order, so a later declaration of
    /// the same name wins. A `namespace` statement among them changes the
    /// prefix used for the declarations that follow it.
    pub(crate) fn hoist(&mut self, statements: &[Statement]) -> EvalResult<()> {
        let mut prefix = self.namespace.clone();
        for statement in statements {
            match statement {
                Statement::Namespace { path, .. } => prefix.clone_from(path),
                Statement::Function(decl) => self.declare_function(decl, &prefix)?,
                _ => {},
            }
        }
        Ok(())
    }

    /// Binds a declared function in the current scope under its bare name
    /// and, inside a namespace, under its qualified name too.
    fn declare_function(&mut self, decl: &Rc<FunctionDecl>, prefix: &[String]) -> EvalResult<()> {
        if is_builtin(&decl.name) {
            return Err(RuntimeError::BuiltinFunctionRedefinition { name: decl.name.clone(),
                                                                   pos:  decl.pos, });
        }

        let closure = Rc::new(Closure { decl: Rc::clone(decl),
                                        env:  self.env.clone(), });
        self.env.define_function(&decl.name, Rc::clone(&closure));
        if !prefix.is_empty() {
            let qualified = format!("{}\\{}", prefix.join("\\"), decl.name);
            self.env.define_function(&qualified, closure);
        }
        trace!(function = %decl.name, params = decl.params.len(), "hoisted");
        Ok(())
    }

    /// Runs `f` with `env` as the current scope, restoring the previous scope
    /// afterwards whether or not `f` fails.
    pub(crate) fn in_scope<T>(&mut self,
                              env: Environment,
                              f: impl FnOnce(&mut Self) -> EvalResult<T>)
                              -> EvalResult<T> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = saved;
        result
    }

    /// Writes program output through the host.
    pub(crate) fn write_output(&mut self, text: &str, pos: Position) -> EvalResult<()> {
        self.host
            .write(text.as_bytes())
            .map_err(|e| RuntimeError::Output { details: e.to_string(),
                                                pos })
    }

    /// Flushes program output.
    pub(crate) fn flush(&mut self, pos: Position) -> EvalResult<()> {
        self.host
            .flush()
            .map_err(|e| RuntimeError::Output { details: e.to_string(),
                                                pos })
    }
}
