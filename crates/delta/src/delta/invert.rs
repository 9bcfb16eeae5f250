use crate::attributes;
use crate::op::Op;

use super::Delta;

impl Delta {
    /// The delta that undoes `self` when applied after it, given the
    /// document `base` that `self` was applied to.
    ///
    /// ```
    /// use rich_delta::Delta;
    ///
    /// let mut base = Delta::new();
    /// base.insert("Hello World");
    /// let mut change = Delta::new();
    /// change.retain(5).insert("X");
    ///
    /// let mut expected = Delta::new();
    /// expected.retain(5).delete(1);
    /// assert_eq!(change.invert(&base), expected);
    /// ```
    pub fn invert(&self, base: &Delta) -> Delta {
        let mut inverted = Delta::new();
        let mut base_index = 0usize;
        for op in &self.ops {
            match op {
                Op::Insert { .. } => {
                    inverted.delete(op.len());
                }
                Op::Retain { length, .. } if op.attributes().is_none() => {
                    inverted.retain(*length);
                    base_index = base_index.saturating_add(*length);
                }
                Op::Retain { length, .. } | Op::Delete { length } => {
                    let end = base_index.saturating_add(*length);
                    for base_op in base.slice(base_index..end).ops {
                        if op.is_delete() {
                            inverted.push(base_op);
                        } else {
                            let restored =
                                attributes::invert(op.attributes(), base_op.attributes());
                            inverted.retain_with(base_op.len(), Some(restored));
                        }
                    }
                    base_index = end;
                }
            }
        }
        inverted.chop();
        inverted
    }
}
