//! rich-delta-diff - Plain-text diff for rich-text deltas
//!
//! Myers' O(ND) difference algorithm over UTF-16 code units, with common
//! affix stripping, a half-match speedup, an optional cursor hint that
//! prefers the edit a user most likely typed, and a merge pass that never
//! returns a chunk starting or ending inside a surrogate pair.
//!
//! ```
//! use rich_delta_diff::{diff, EditKind};
//!
//! let script = diff("Hello World", "Hello World!", None);
//! assert_eq!(
//!     script,
//!     vec![
//!         (EditKind::Equal, "Hello World".to_string()),
//!         (EditKind::Insert, "!".to_string()),
//!     ]
//! );
//! ```

mod cleanup;
mod cursor;
mod myers;
mod unit;

use rich_delta_util::utf16;

pub use cleanup::cleanup_semantic;

/// Numeric code of [`EditKind::Insert`].
pub const INSERT: i8 = 1;
/// Numeric code of [`EditKind::Delete`].
pub const DELETE: i8 = -1;
/// Numeric code of [`EditKind::Equal`].
pub const EQUAL: i8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Delete = -1,
    Equal = 0,
    Insert = 1,
}

impl EditKind {
    /// The numeric code: `-1`, `0` or `1`.
    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            DELETE => Some(EditKind::Delete),
            EQUAL => Some(EditKind::Equal),
            INSERT => Some(EditKind::Insert),
            _ => None,
        }
    }
}

impl From<EditKind> for i8 {
    fn from(kind: EditKind) -> Self {
        kind.code()
    }
}

pub type Edit = (EditKind, String);
pub type EditScript = Vec<Edit>;

/// A span of text measured in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// A zero-length range, i.e. a caret.
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    pub fn end(&self) -> usize {
        self.index.saturating_add(self.length)
    }
}

/// Where the user's caret or selection was, used to pick the most plausible
/// of several equally short diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Caret position in the old text.
    Caret(usize),
    /// Selection before the edit and, if known, after it.
    Selection {
        old_range: Range,
        new_range: Option<Range>,
    },
}

impl From<usize> for Cursor {
    fn from(index: usize) -> Self {
        Cursor::Caret(index)
    }
}

/// Computes the edit script turning `old_text` into `new_text`.
///
/// Lengths and offsets, including the cursor, are UTF-16 code units. No
/// returned chunk is empty, and none starts or ends inside a surrogate pair.
pub fn diff(old_text: &str, new_text: &str, cursor: Option<Cursor>) -> EditScript {
    let old = utf16::units(old_text);
    let new = utf16::units(new_text);
    myers::diff_main(&old, &new, cursor, true)
        .into_iter()
        .map(|(kind, units)| (kind, utf16::from_units(&units)))
        .collect()
}

/// Merges consecutive chunks of the same kind and drops empty ones.
pub fn normalize(script: EditScript) -> EditScript {
    let mut result: EditScript = Vec::with_capacity(script.len());
    for (kind, text) in script {
        if text.is_empty() {
            continue;
        }
        match result.last_mut() {
            Some(last) if last.0 == kind => last.1.push_str(&text),
            _ => result.push((kind, text)),
        }
    }
    result
}

/// Reconstructs the old text from an edit script.
pub fn old_text(script: &[Edit]) -> String {
    script
        .iter()
        .filter(|(kind, _)| *kind != EditKind::Insert)
        .map(|(_, text)| text.as_str())
        .collect()
}

/// Reconstructs the new text from an edit script.
pub fn new_text(script: &[Edit]) -> String {
    script
        .iter()
        .filter(|(kind, _)| *kind != EditKind::Delete)
        .map(|(_, text)| text.as_str())
        .collect()
}

/// Swaps inserts and deletes so that the script turns the new text back
/// into the old one.
pub fn invert(script: &[Edit]) -> EditScript {
    script
        .iter()
        .map(|(kind, text)| {
            let kind = match kind {
                EditKind::Equal => EditKind::Equal,
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            };
            (kind, text.clone())
        })
        .collect()
}
