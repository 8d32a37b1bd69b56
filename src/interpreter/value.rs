/// Array storage.
///
/// Arrays are reference values: every copy of a `Value::Array` refers to the
/// same elements. Handles are reference counted, and the evaluation context
/// keeps a weak registry of the arrays it created.
pub mod heap;

/// Function values.
///
/// A closure pairs a function declaration with the environment it was
/// declared in.
pub mod function;

pub mod core;

pub use self::{core::Value, function::Closure, heap::{ArrayHeap, ArrayRef}};
