use std::{fmt, rc::Rc};

use crate::{ast::FunctionDecl, interpreter::evaluator::environment::Environment};

/// A function value: a declaration plus the environment it closes over.
///
/// Calling a closure creates a new scope whose parent is `env`, so the body
/// sees the bindings that were visible where the function was declared.
pub struct Closure {
    /// The function's declaration.
    pub decl: Rc<FunctionDecl>,
    /// The defining environment.
    pub env:  Environment,
}

impl Closure {
    /// The declared name, or `{closure}` for function literals.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure({}/{})", self.name(), self.arity())
    }
}
