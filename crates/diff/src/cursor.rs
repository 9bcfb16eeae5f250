//! Cursor-biased shortcut for live typing.
//!
//! When the caller knows where the caret or selection was, a change like
//! "aaa" -> "aaaa" can be attributed to the keystroke at the caret instead of
//! whatever position the general algorithm happens to pick.

use crate::myers::Chunk;
use crate::unit::Unit;
use crate::{Cursor, EditKind, Range};

/// Explains the change between `old` and `new` as a single splice touching
/// the cursor, or returns `None` when no such explanation exists or it would
/// split a surrogate pair.
pub(crate) fn find_cursor_edit<T: Unit>(
    old: &[T],
    new: &[T],
    cursor: Cursor,
) -> Option<Vec<Chunk<T>>> {
    let (old_range, new_range) = match cursor {
        Cursor::Caret(index) => (Range::caret(index), None),
        Cursor::Selection {
            old_range,
            new_range,
        } => (old_range, new_range),
    };
    let old_len = old.len();
    let new_len = new.len();

    if old_range.length == 0 && new_range.map_or(true, |r| r.length == 0) {
        let old_cursor = old_range.index;
        if old_cursor > old_len {
            return None;
        }
        let (old_before, old_after) = old.split_at(old_cursor);
        let maybe_new_cursor = new_range.map(|r| r.index);

        // Insert or delete right before the cursor.
        'edit_before: {
            let new_cursor = old_cursor as isize + new_len as isize - old_len as isize;
            if new_cursor < 0 || new_cursor as usize > new_len {
                break 'edit_before;
            }
            let new_cursor = new_cursor as usize;
            if maybe_new_cursor.is_some_and(|c| c != new_cursor) {
                break 'edit_before;
            }
            let (new_before, new_after) = new.split_at(new_cursor);
            if new_after != old_after {
                break 'edit_before;
            }
            let prefix_len = old_cursor.min(new_cursor);
            let (old_prefix, old_middle) = old_before.split_at(prefix_len);
            let (new_prefix, new_middle) = new_before.split_at(prefix_len);
            if old_prefix != new_prefix {
                break 'edit_before;
            }
            return make_edit_splice(old_prefix, old_middle, new_middle, old_after);
        }

        // Insert or delete right after the cursor.
        'edit_after: {
            if maybe_new_cursor.is_some_and(|c| c != old_cursor) {
                break 'edit_after;
            }
            if old_cursor > new_len {
                break 'edit_after;
            }
            let (new_before, new_after) = new.split_at(old_cursor);
            if new_before != old_before {
                break 'edit_after;
            }
            let suffix_len = old_after.len().min(new_after.len());
            let (old_middle, old_suffix) = old_after.split_at(old_after.len() - suffix_len);
            let (new_middle, new_suffix) = new_after.split_at(new_after.len() - suffix_len);
            if old_suffix != new_suffix {
                break 'edit_after;
            }
            return make_edit_splice(old_before, old_middle, new_middle, old_suffix);
        }
    }

    if let Some(new_range) = new_range {
        if old_range.length > 0 && new_range.length == 0 {
            // Could be a splice of the old selection.
            let prefix_len = old_range.index.min(old_len);
            let suffix_start = old_range.end().min(old_len);
            let old_prefix = &old[..prefix_len];
            let old_suffix = &old[suffix_start..];
            let suffix_len = old_suffix.len();
            if new_len < prefix_len + suffix_len {
                return None;
            }
            let new_prefix = &new[..prefix_len];
            let new_suffix = &new[new_len - suffix_len..];
            if old_prefix != new_prefix || old_suffix != new_suffix {
                return None;
            }
            let old_middle = &old[prefix_len..old_len - suffix_len];
            let new_middle = &new[prefix_len..new_len - suffix_len];
            return make_edit_splice(old_prefix, old_middle, new_middle, old_suffix);
        }
    }

    None
}

fn make_edit_splice<T: Unit>(
    before: &[T],
    old_middle: &[T],
    new_middle: &[T],
    after: &[T],
) -> Option<Vec<Chunk<T>>> {
    if before.last().is_some_and(|u| u.is_high_surrogate())
        || after.first().is_some_and(|u| u.is_low_surrogate())
    {
        return None;
    }
    Some(
        [
            (EditKind::Equal, before),
            (EditKind::Delete, old_middle),
            (EditKind::Insert, new_middle),
            (EditKind::Equal, after),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(kind, text)| (kind, text.to_vec()))
        .collect(),
    )
}
