/// The `print` and `println` builtins.
///
/// Write the textual form of their arguments to the host's output sink.
pub mod print;
/// The `args` builtin.
///
/// Returns the program arguments supplied by the host as a fresh array.
pub mod args;
/// Methods callable with `->` on arrays and strings.
pub mod method;
/// The builtin table and the calling convention shared by builtins and user
/// functions.
pub mod core;
