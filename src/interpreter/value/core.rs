use std::{collections::HashSet, rc::Rc};

use crate::interpreter::value::{function::Closure, heap::ArrayRef};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function results, and conditional evaluations. There is no
/// boolean type: comparisons and logical operators produce `Int(0)` or
/// `Int(1)`.
#[derive(Debug, Clone)]
pub enum Value {
    /// A signed 64 bit integer.
    Int(i64),
    /// An immutable string.
    Str(Rc<str>),
    /// A handle to a shared, growable array.
    Array(ArrayRef),
    /// A callable function value.
    Func(Rc<Closure>),
    /// The absence of a value: the result of an empty block, a `foreach`, or
    /// an `if` whose condition was false and that has no `else`.
    Void,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => Rc::ptr_eq(a, b),
            (Self::Void, Self::Void) => true,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl Value {
    /// The name of this value's kind, as used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Func(_) => "function",
            Self::Void => "void",
        }
    }

    /// Returns the truthiness of the value.
    ///
    /// Nonzero integers, nonempty strings, nonempty arrays, and all functions
    /// are truthy. `Void` and zero or empty values are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(array) => !array.is_empty(),
            Self::Func(_) => true,
            Self::Void => false,
        }
    }

    /// Renders the value as program output.
    ///
    /// Integers print in decimal, strings verbatim, and arrays as
    /// `[a, b, c]` with their elements rendered recursively. An array that
    /// contains itself renders the repeated reference as `[...]`.
    ///
    /// # Errors
    /// Returns the type name of the first value with no textual form (`Void`
    /// or a function), which may be nested inside an array.
    pub fn render(&self) -> Result<String, &'static str> {
        let mut out = String::new();
        self.render_into(&mut out, &mut HashSet::new())?;
        Ok(out)
    }

    fn render_into(&self,
                   out: &mut String,
                   open: &mut HashSet<usize>)
                   -> Result<(), &'static str> {
        match self {
            Self::Int(n) => out.push_str(&n.to_string()),
            Self::Str(s) => out.push_str(s),
            Self::Array(array) => {
                if !open.insert(array.id()) {
                    out.push_str("[...]");
                    return Ok(());
                }
                out.push('[');
                for (i, element) in array.elements().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    element.render_into(out, open)?;
                }
                out.push(']');
                open.remove(&array.id());
            },
            Self::Func(_) | Self::Void => return Err(self.type_name()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::ArrayHeap;

    #[test]
    fn truthiness() {
        let mut heap = ArrayHeap::new();
        let empty = Value::Array(heap.alloc(Vec::new()));
        let full = Value::Array(heap.alloc(vec![Value::Int(0)]));

        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!empty.is_truthy());
        assert!(full.is_truthy());
        assert!(!Value::Void.is_truthy());
    }

    #[test]
    fn renders_nested_and_cyclic_arrays() {
        let mut heap = ArrayHeap::new();
        let inner = heap.alloc(vec![Value::from("a"), Value::Int(2)]);
        let outer = heap.alloc(vec![Value::Int(1), Value::Array(inner)]);
        assert_eq!(Value::Array(outer.clone()).render().unwrap(), "[1, [a, 2]]");

        outer.extend([Value::Array(outer.clone())]);
        assert_eq!(Value::Array(outer).render().unwrap(), "[1, [a, 2], [...]]");
    }

    #[test]
    fn void_is_not_printable() {
        let mut heap = ArrayHeap::new();
        let array = heap.alloc(vec![Value::Void]);
        assert_eq!(Value::Void.render(), Err("void"));
        assert_eq!(Value::Array(array).render(), Err("void"));
    }
}
