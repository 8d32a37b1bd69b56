use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::interpreter::value::core::Value;

type Storage = RefCell<Vec<Value>>;

/// A handle to a shared, growable array.
///
/// Cloning a handle aliases the same elements. The elements are freed when
/// the last handle is dropped; an array that contains itself is only freed
/// with its context.
#[derive(Clone)]
pub struct ArrayRef(Rc<Storage>);

impl ArrayRef {
    fn new(elements: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(elements)))
    }

    /// The elements of the array.
    #[must_use]
    pub fn elements(&self) -> Ref<'_, [Value]> {
        Ref::map(self.0.borrow(), Vec::as_slice)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// The element at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Replaces the element at `index`. Returns `false` if out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    /// Appends values to the end of the array.
    pub fn extend(&self, values: impl IntoIterator<Item = Value>) {
        self.0.borrow_mut().extend(values);
    }

    /// An address identifying the storage, shared by all aliases.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0).addr()
    }
}

impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ArrayRef {}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayRef({:#x}, len {})", self.id(), self.len())
    }
}

/// Registry of the arrays created by one context.
///
/// The registry holds weak references only, so it never keeps an array
/// alive. Dead entries are pruned whenever the registry would grow.
#[derive(Debug, Default)]
pub struct ArrayHeap {
    arrays: Vec<Weak<Storage>>,
}

impl ArrayHeap {
    /// Creates an empty heap.
    #[must_use]
    pub const fn new() -> Self {
        Self { arrays: Vec::new() }
    }

    /// Creates a new array and returns its handle.
    pub fn alloc(&mut self, elements: Vec<Value>) -> ArrayRef {
        if self.arrays.len() == self.arrays.capacity() {
            self.arrays.retain(|array| array.strong_count() > 0);
        }
        let array = ArrayRef::new(elements);
        self.arrays.push(Rc::downgrade(&array.0));
        array
    }

    /// Number of arrays that are still reachable through some handle.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.arrays.iter().filter(|array| array.strong_count() > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_alias_the_same_storage() {
        let mut heap = ArrayHeap::new();
        let a = heap.alloc(vec![Value::Int(1)]);
        let alias = a.clone();

        alias.extend([Value::Int(2), Value::Int(3)]);

        assert_eq!(a.len(), 3);
        assert_eq!(a.get(2), Some(Value::Int(3)));
        assert!(a.set(0, Value::Int(9)));
        assert!(!a.set(3, Value::Int(9)));
        assert_eq!(alias.elements()[0], Value::Int(9));
    }

    #[test]
    fn separate_allocations_are_independent() {
        let mut heap = ArrayHeap::new();
        let a = heap.alloc(Vec::new());
        let b = heap.alloc(Vec::new());

        a.extend([Value::Int(1)]);

        assert_ne!(a, b);
        assert!(b.is_empty());
        assert_eq!(heap.allocated(), 2);
    }

    #[test]
    fn dropped_arrays_are_released() {
        let mut heap = ArrayHeap::new();
        let kept = heap.alloc(vec![Value::Int(1)]);

        for i in 0..1000 {
            let temporary = heap.alloc(vec![Value::Int(i)]);
            kept.extend([Value::Int(i64::try_from(temporary.len()).unwrap())]);
        }

        assert_eq!(heap.allocated(), 1);
        assert!(heap.arrays.len() < 100);
        assert_eq!(kept.len(), 1001);
    }
}
