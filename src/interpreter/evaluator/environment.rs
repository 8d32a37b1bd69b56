use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::value::{Closure, Value};

/// A handle to one scope in a chain of lexical scopes.
///
/// Cloning the handle shares the scope. Lookups walk from the scope towards
/// the global scope through parent links; definitions always go into the
/// scope the handle points at.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

#[derive(Default)]
struct Scope {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Rc<Closure>>,
    parent:    Option<Environment>,
}

impl Environment {
    /// Creates a scope with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scope whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope { parent: Some(self.clone()),
                                          ..Scope::default() })))
    }

    /// Looks up a variable through the scope chain.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.find(|scope| scope.variables.get(name).cloned())
    }

    /// Binds a variable in this scope, shadowing any outer binding.
    pub fn define_variable(&self, name: &str, value: Value) {
        self.0.borrow_mut().variables.insert(name.to_string(), value);
    }

    /// Updates the nearest existing binding of `name`, or defines it in this
    /// scope if no enclosing scope binds it.
    pub fn assign_variable(&self, name: &str, value: Value) {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if let Some(slot) = env.0.borrow_mut().variables.get_mut(name) {
                *slot = value;
                return;
            }
            current = env.0.borrow().parent.clone();
        }
        self.define_variable(name, value);
    }

    /// Looks up a function through the scope chain.
    #[must_use]
    pub fn get_function(&self, name: &str) -> Option<Rc<Closure>> {
        self.find(|scope| scope.functions.get(name).cloned())
    }

    /// Registers a function in this scope. A later registration under the
    /// same name replaces the earlier one.
    pub fn define_function(&self, name: &str, function: Rc<Closure>) {
        self.0.borrow_mut().functions.insert(name.to_string(), function);
    }

    /// Number of scopes between this one and the global scope.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.0.borrow().parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.0.borrow().parent.clone();
        }
        depth
    }

    fn find<T>(&self, lookup: impl Fn(&Scope) -> Option<T>) -> Option<T> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            if let Some(found) = lookup(&scope) {
                return Some(found);
            }
            current = scope.parent.clone();
        }
        None
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Environment")
         .field("variables", &scope.variables.keys().collect::<Vec<_>>())
         .field("functions", &scope.functions.keys().collect::<Vec<_>>())
         .field("depth", &self.depth())
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_to_parents() {
        let global = Environment::new();
        global.define_variable("x", Value::Int(1));
        let inner = global.child().child();

        assert_eq!(inner.get_variable("x"), Some(Value::Int(1)));
        assert_eq!(inner.get_variable("y"), None);
        assert_eq!(inner.depth(), 2);
    }

    #[test]
    fn assignment_updates_nearest_binding() {
        let global = Environment::new();
        global.define_variable("x", Value::Int(1));
        let inner = global.child();

        inner.assign_variable("x", Value::Int(2));
        inner.assign_variable("y", Value::Int(3));

        assert_eq!(global.get_variable("x"), Some(Value::Int(2)));
        assert_eq!(global.get_variable("y"), None);
        assert_eq!(inner.get_variable("y"), Some(Value::Int(3)));
    }

    #[test]
    fn definitions_shadow_outer_bindings() {
        let global = Environment::new();
        global.define_variable("x", Value::Int(1));
        let inner = global.child();
        inner.define_variable("x", Value::Int(5));

        assert_eq!(inner.get_variable("x"), Some(Value::Int(5)));
        assert_eq!(global.get_variable("x"), Some(Value::Int(1)));
    }
}
