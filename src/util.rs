/// Checked conversions between the interpreter's `i64` integers and host
/// `usize` lengths and indices.
pub mod num;
