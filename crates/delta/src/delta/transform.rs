use crate::attributes;
use crate::iterator::OpIterator;
use crate::op::OpKind;

use super::Delta;

impl Delta {
    /// Rebases `other` so that it applies after `self`, both having been
    /// made against the same document.
    ///
    /// `priority` says `self` happened first: where both insert at the same
    /// position, `self`'s insert ends up before `other`'s.
    pub fn transform(&self, other: &Delta, priority: bool) -> Delta {
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        let mut delta = Delta::new();
        while this_iter.has_next() || other_iter.has_next() {
            if this_iter.peek_kind() == OpKind::Insert
                && (priority || other_iter.peek_kind() != OpKind::Insert)
            {
                let inserted = this_iter.next_op();
                delta.retain(inserted.len());
            } else if other_iter.peek_kind() == OpKind::Insert {
                delta.push(other_iter.next_op());
            } else {
                let length = this_iter.peek_length().min(other_iter.peek_length());
                let this_op = this_iter.next_len(length);
                let other_op = other_iter.next_len(length);
                if this_op.is_delete() {
                    // Our delete already removed what `other` touches here.
                    continue;
                }
                if other_op.is_delete() {
                    delta.push(other_op);
                } else {
                    let attributes = attributes::transform(
                        this_op.attributes(),
                        other_op.attributes(),
                        priority,
                    );
                    delta.retain_with(length, attributes);
                }
            }
        }
        delta.chop();
        delta
    }

    /// Where position `index` ends up once `self` is applied.
    ///
    /// An insert exactly at `index` pushes it forward unless `priority` is
    /// set, in which case the position stays in front of the insert.
    ///
    /// ```
    /// use rich_delta::Delta;
    ///
    /// let mut delta = Delta::new();
    /// delta.retain(2).insert("A");
    /// assert_eq!(delta.transform_position(2, true), 2);
    /// assert_eq!(delta.transform_position(2, false), 3);
    /// ```
    pub fn transform_position(&self, index: usize, priority: bool) -> usize {
        let mut iter = OpIterator::new(&self.ops);
        let mut index = index;
        let mut offset = 0usize;
        while iter.has_next() && offset <= index {
            let length = iter.peek_length();
            let kind = iter.peek_kind();
            iter.next_op();
            match kind {
                OpKind::Delete => {
                    index -= length.min(index - offset);
                    continue;
                }
                OpKind::Insert if offset < index || !priority => {
                    index = index.saturating_add(length);
                }
                _ => {}
            }
            offset = offset.saturating_add(length);
        }
        index
    }
}
