use crate::attributes;
use crate::iterator::OpIterator;
use crate::op::{Op, OpKind};

use super::Delta;

impl Delta {
    /// The single delta with the effect of applying `self` and then `other`.
    ///
    /// ```
    /// use rich_delta::Delta;
    ///
    /// let mut a = Delta::new();
    /// a.insert("A");
    /// let mut b = Delta::new();
    /// b.insert("B");
    ///
    /// let mut expected = Delta::new();
    /// expected.insert("BA");
    /// assert_eq!(a.compose(&b), expected);
    /// ```
    pub fn compose(&self, other: &Delta) -> Delta {
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        let mut ops = Vec::new();

        // Inserts fully covered by a leading plain retain pass through as is.
        let first_retain = match other_iter.peek() {
            Some(first @ Op::Retain { .. }) if first.attributes().is_none() => first.len(),
            _ => 0,
        };
        if first_retain > 0 {
            let mut first_left = first_retain;
            while this_iter.peek_kind() == OpKind::Insert && this_iter.peek_length() <= first_left {
                first_left -= this_iter.peek_length();
                ops.push(this_iter.next_op());
            }
            if first_retain > first_left {
                other_iter.next_len(first_retain - first_left);
            }
        }

        let mut delta = Delta::from(ops);
        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_kind() == OpKind::Insert {
                delta.push(other_iter.next_op());
            } else if this_iter.peek_kind() == OpKind::Delete {
                delta.push(this_iter.next_op());
            } else {
                let length = this_iter.peek_length().min(other_iter.peek_length());
                let this_op = this_iter.next_len(length);
                let other_op = other_iter.next_len(length);
                if other_op.is_retain() && !other_op.is_empty() {
                    let attributes = attributes::compose(
                        this_op.attributes(),
                        other_op.attributes(),
                        this_op.is_retain(),
                    );
                    let new_op = match this_op {
                        Op::Insert { value, .. } => Op::Insert { value, attributes },
                        _ => Op::Retain { length, attributes },
                    };
                    delta.push(new_op.clone());

                    // The rest of `other` is an implicit retain: copy what is left.
                    if !other_iter.has_next() && delta.ops.last() == Some(&new_op) {
                        let rest = Delta::from(this_iter.rest());
                        let mut composed = delta.concat(&rest);
                        composed.chop();
                        return composed;
                    }
                } else if other_op.is_delete() && this_op.is_retain() {
                    delta.push(other_op);
                }
            }
        }
        delta.chop();
        delta
    }
}
