//! Character-offset helpers.
//!
//! Every offset the engine deals in counts Unicode scalar values, while Rust
//! strings are indexed by bytes. These helpers translate between the two.

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the character at `offset`, clamped to `s.len()`.
///
/// ```
/// use mentions_core::text::byte_index;
///
/// let s = "a€b";
/// assert_eq!(byte_index(s, 1), 1);
/// assert_eq!(byte_index(s, 2), 4);
/// assert_eq!(byte_index(s, 9), 5);
/// ```
pub fn byte_index(s: &str, offset: usize) -> usize {
    s.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Substring between two character offsets.
pub fn slice(s: &str, start: usize, end: usize) -> &str {
    let start = byte_index(s, start);
    let end = byte_index(s, end).max(start);
    &s[start..end]
}
