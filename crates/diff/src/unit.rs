//! Code units the diff engine can run over.
//!
//! The public entry point diffs UTF-16 code units so that every offset
//! matches the delta model. Semantic cleanup runs over `char`s, where a
//! surrogate pair can never be split in the first place.

use std::fmt::Debug;

use rich_delta_util::utf16;

pub(crate) trait Unit: Copy + Eq + Debug {
    fn is_high_surrogate(self) -> bool;
    fn is_low_surrogate(self) -> bool;
}

impl Unit for u16 {
    #[inline]
    fn is_high_surrogate(self) -> bool {
        utf16::is_high_surrogate(self)
    }

    #[inline]
    fn is_low_surrogate(self) -> bool {
        utf16::is_low_surrogate(self)
    }
}

impl Unit for char {
    #[inline]
    fn is_high_surrogate(self) -> bool {
        false
    }

    #[inline]
    fn is_low_surrogate(self) -> bool {
        false
    }
}

/// Index of the first occurrence of `needle` in `haystack` at or after `from`.
pub(crate) fn find<T: Eq>(haystack: &[T], needle: &[T], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
