/// Operator dispatch.
pub mod core;
/// Integer arithmetic, string concatenation and repetition.
pub mod scalar;
/// Equality and ordering.
pub mod comparison;
/// Short-circuit `&&` and `||`.
pub mod logic;
