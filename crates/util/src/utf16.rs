//! UTF-16 code-unit helpers over Rust strings.
//!
//! Every length and offset in a delta is measured in UTF-16 code units, the
//! unit rich-text editors in the browser count in. Rust strings are UTF-8, so
//! these helpers translate between the two views without materialising a
//! `Vec<u16>` unless the caller asks for one.
//!
//! A boundary that falls inside a surrogate pair cannot be represented in a
//! Rust `String`; such a half is replaced with U+FFFD, which is itself a
//! single code unit, so lengths stay consistent.

/// Returns `true` for the leading (high) half of a surrogate pair.
#[inline]
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xd800..=0xdbff).contains(&unit)
}

/// Returns `true` for the trailing (low) half of a surrogate pair.
#[inline]
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xdc00..=0xdfff).contains(&unit)
}

/// Length of `s` in UTF-16 code units.
///
/// ```
/// use rich_delta_util::utf16;
///
/// assert_eq!(utf16::len("abc"), 3);
/// assert_eq!(utf16::len("a😀"), 3);
/// ```
pub fn len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Encodes `s` as UTF-16 code units.
pub fn units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Decodes UTF-16 code units, replacing lone surrogates with U+FFFD.
pub fn from_units(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Substring of `s` covering `len` code units starting at code unit `start`.
///
/// Out-of-range bounds are clamped rather than rejected.
///
/// ```
/// use rich_delta_util::utf16;
///
/// assert_eq!(utf16::slice("Hello", 1, 3), "ell");
/// assert_eq!(utf16::slice("a😀b", 1, 2), "😀");
/// assert_eq!(utf16::slice("abc", 2, 10), "c");
/// ```
pub fn slice(s: &str, start: usize, len: usize) -> String {
    if len == 0 {
        return String::new();
    }
    let end = start.saturating_add(len);
    let mut out = String::new();
    let mut pos = 0usize;
    for ch in s.chars() {
        if pos >= end {
            break;
        }
        let next = pos + ch.len_utf16();
        if next > start {
            if pos >= start && next <= end {
                out.push(ch);
            } else {
                // A surrogate pair cut by one of the bounds leaves one unit inside.
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
        pos = next;
    }
    out
}

/// Code-unit index of the first `needle` at or after code unit `from`.
///
/// ```
/// use rich_delta_util::utf16;
///
/// assert_eq!(utf16::find_char("a😀\nb\n", '\n', 0), Some(3));
/// assert_eq!(utf16::find_char("a😀\nb\n", '\n', 4), Some(5));
/// assert_eq!(utf16::find_char("abc", '\n', 0), None);
/// ```
pub fn find_char(s: &str, needle: char, from: usize) -> Option<usize> {
    let mut pos = 0usize;
    for ch in s.chars() {
        if pos >= from && ch == needle {
            return Some(pos);
        }
        pos += ch.len_utf16();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_code_units() {
        assert_eq!(len(""), 0);
        assert_eq!(len("héllo"), 5);
        assert_eq!(len("👍🏽"), 4);
    }

    #[test]
    fn surrogate_predicates() {
        let u = units("😀");
        assert_eq!(u.len(), 2);
        assert!(is_high_surrogate(u[0]));
        assert!(is_low_surrogate(u[1]));
        assert!(!is_high_surrogate(u[1]));
        assert!(!is_low_surrogate(u16::from(b'a')));
    }

    #[test]
    fn slice_clamps() {
        assert_eq!(slice("abc", 5, 2), "");
        assert_eq!(slice("abc", 0, 0), "");
        assert_eq!(slice("abc", 0, usize::MAX), "abc");
    }

    #[test]
    fn slice_inside_pair_keeps_length() {
        let s = "a😀b";
        let left = slice(s, 0, 2);
        let right = slice(s, 2, 2);
        assert_eq!(left, "a\u{fffd}");
        assert_eq!(right, "\u{fffd}b");
        assert_eq!(len(&left) + len(&right), len(s));
    }

    #[test]
    fn round_trip_units() {
        let s = "x😀y";
        assert_eq!(from_units(&units(s)), s);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn split_preserves_length(s in "[a-c😀\n]{0,12}", at in 0usize..30) {
                let total = len(&s);
                let head = slice(&s, 0, at);
                let tail = slice(&s, at, usize::MAX);
                prop_assert_eq!(len(&head) + len(&tail), total);
            }
        }
    }
}
