/// Converts a `usize` to an `i64`, failing if it does not fit.
///
/// Used for array lengths and loop keys, which are exposed to programs as
/// integers.
///
/// ## Example
/// ```
/// use phlite::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(42, "too big"), Ok(42));
/// assert_eq!(usize_to_i64_checked(usize::MAX, "too big"), Err("too big"));
/// ```
pub fn usize_to_i64_checked<E>(value: usize, error: E) -> Result<i64, E> {
    i64::try_from(value).map_err(|_| error)
}

/// Converts an `i64` to a `usize`, failing for negative or oversized values.
///
/// Used to turn program integers into indices and repeat counts.
///
/// ## Example
/// ```
/// use phlite::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(3, "bad index"), Ok(3));
/// assert_eq!(i64_to_usize_checked(-1, "bad index"), Err("bad index"));
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}
