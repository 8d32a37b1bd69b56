/// Default limit on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Tunable limits of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of user function calls that may be active at once.
    ///
    /// Exceeding it raises a stack overflow runtime error. The evaluator
    /// grows its own stack as calls nest, so any thread can run this many.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

impl Config {
    /// Returns a copy with a different call depth limit.
    #[must_use]
    pub const fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}
