mod compose;
mod diff;
mod invert;
mod lines;
mod transform;

use std::ops::{Bound, RangeBounds};

use rich_delta_util::{attributes_equal, utf16};

use crate::attributes::AttributeMap;
use crate::error::{DeltaError, Side};
use crate::iterator::OpIterator;
use crate::op::{InsertValue, Op};

/// Placeholder an embed renders as when a delta is viewed as plain text.
pub(crate) const EMBED_CHAR: char = '\0';

/// An ordered list of operations, kept in canonical form by the builder
/// methods: adjacent ops that can merge are merged, and an insert never
/// directly follows a delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    ops: Vec<Op>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn insert(&mut self, value: impl Into<InsertValue>) -> &mut Self {
        self.insert_with(value, None)
    }

    /// Appends an insert. Empty text is ignored.
    pub fn insert_with(
        &mut self,
        value: impl Into<InsertValue>,
        attributes: Option<AttributeMap>,
    ) -> &mut Self {
        let value = value.into();
        if matches!(&value, InsertValue::Text(text) if text.is_empty()) {
            return self;
        }
        self.push(Op::insert_with(value, attributes))
    }

    pub fn retain(&mut self, length: usize) -> &mut Self {
        self.retain_with(length, None)
    }

    /// Appends a retain. A zero length is ignored.
    pub fn retain_with(&mut self, length: usize, attributes: Option<AttributeMap>) -> &mut Self {
        if length == 0 {
            return self;
        }
        self.push(Op::retain_with(length, attributes))
    }

    /// Appends a delete. A zero length is ignored.
    pub fn delete(&mut self, length: usize) -> &mut Self {
        if length == 0 {
            return self;
        }
        self.push(Op::delete(length))
    }

    /// Appends `new_op`, merging it into the last op where possible.
    ///
    /// An insert pushed after a delete lands in front of it, since inserting
    /// before or after deleting at the same index has the same effect.
    pub fn push(&mut self, new_op: Op) -> &mut Self {
        let mut index = self.ops.len();
        if let Some(last) = self.ops.last_mut() {
            if let (Op::Delete { length }, Op::Delete { length: more }) = (&mut *last, &new_op) {
                *length = length.saturating_add(*more);
                return self;
            }
            if last.is_delete() && new_op.is_insert() {
                index -= 1;
                if index == 0 {
                    self.ops.insert(0, new_op);
                    return self;
                }
            }
            let prev = &mut self.ops[index - 1];
            if attributes_equal(prev.attributes(), new_op.attributes()) {
                match (prev, &new_op) {
                    (
                        Op::Insert {
                            value: InsertValue::Text(text),
                            ..
                        },
                        Op::Insert {
                            value: InsertValue::Text(more),
                            ..
                        },
                    ) => {
                        text.push_str(more);
                        return self;
                    }
                    (Op::Retain { length, .. }, Op::Retain { length: more, .. }) => {
                        *length = length.saturating_add(*more);
                        return self;
                    }
                    _ => {}
                }
            }
        }
        self.ops.insert(index, new_op);
        self
    }

    /// Drops a trailing retain without attributes.
    pub fn chop(&mut self) -> &mut Self {
        if let Some(last @ Op::Retain { .. }) = self.ops.last() {
            if last.attributes().is_none() {
                self.ops.pop();
            }
        }
        self
    }

    pub fn filter<F>(&self, mut predicate: F) -> Vec<Op>
    where
        F: FnMut(&Op, usize) -> bool,
    {
        self.ops
            .iter()
            .enumerate()
            .filter(|(i, op)| predicate(op, *i))
            .map(|(_, op)| op.clone())
            .collect()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Op, usize),
    {
        for (i, op) in self.ops.iter().enumerate() {
            f(op, i);
        }
    }

    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&Op, usize) -> T,
    {
        self.ops.iter().enumerate().map(|(i, op)| f(op, i)).collect()
    }

    /// Splits the ops into those passing `predicate` and those failing it.
    pub fn partition<F>(&self, mut predicate: F) -> (Vec<Op>, Vec<Op>)
    where
        F: FnMut(&Op, usize) -> bool,
    {
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for (i, op) in self.ops.iter().enumerate() {
            if predicate(op, i) {
                passed.push(op.clone());
            } else {
                failed.push(op.clone());
            }
        }
        (passed, failed)
    }

    pub fn reduce<T, F>(&self, mut f: F, initial: T) -> T
    where
        F: FnMut(T, &Op, usize) -> T,
    {
        self.ops
            .iter()
            .enumerate()
            .fold(initial, |acc, (i, op)| f(acc, op, i))
    }

    /// Total length of all ops.
    pub fn length(&self) -> usize {
        self.ops.iter().fold(0usize, |sum, op| sum.saturating_add(op.len()))
    }

    /// How much longer a document gets when this delta is applied to it.
    pub fn change_length(&self) -> isize {
        self.ops.iter().fold(0isize, |change, op| match op {
            Op::Insert { .. } => change.saturating_add_unsigned(op.len()),
            Op::Delete { length } => change.saturating_sub_unsigned(*length),
            Op::Retain { .. } => change,
        })
    }

    /// The ops covering `range`, split at its bounds.
    ///
    /// ```
    /// use rich_delta::Delta;
    ///
    /// let mut doc = Delta::new();
    /// doc.insert("Hello").insert("World");
    ///
    /// let mut expected = Delta::new();
    /// expected.insert("loWo");
    /// assert_eq!(doc.slice(3..7), expected);
    /// assert_eq!(doc.slice(..), doc);
    /// ```
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Delta {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => usize::MAX,
        };
        let mut ops = Vec::new();
        let mut iter = OpIterator::new(&self.ops);
        let mut index = 0usize;
        while index < end && iter.has_next() {
            let next_op = if index < start {
                iter.next_len(start - index)
            } else {
                let op = iter.next_len(end - index);
                ops.push(op.clone());
                op
            };
            index = index.saturating_add(next_op.len());
        }
        Delta::from(ops)
    }

    /// This delta followed by `other`, merging at the seam.
    pub fn concat(&self, other: &Delta) -> Delta {
        let mut delta = self.clone();
        if let Some((first, rest)) = other.ops.split_first() {
            delta.push(first.clone());
            delta.ops.extend_from_slice(rest);
        }
        delta
    }

    /// Applies this delta to plain `text`, with inserted embeds written as
    /// NUL so that lengths stay consistent.
    pub fn apply_to_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0usize;
        for op in &self.ops {
            match op {
                Op::Insert { value, .. } => push_value(&mut out, value),
                Op::Retain { length, .. } => {
                    out.push_str(&utf16::slice(text, pos, *length));
                    pos = pos.saturating_add(*length);
                }
                Op::Delete { length } => pos = pos.saturating_add(*length),
            }
        }
        out.push_str(&utf16::slice(text, pos, usize::MAX));
        out
    }

    /// Renders a document delta as plain text, embeds as NUL.
    pub fn to_plain_text(&self) -> Result<String, DeltaError> {
        self.render(Side::Receiver)
    }

    pub(crate) fn render(&self, side: Side) -> Result<String, DeltaError> {
        let mut out = String::new();
        for op in &self.ops {
            match op {
                Op::Insert { value, .. } => push_value(&mut out, value),
                _ => return Err(DeltaError::NotADocument(side)),
            }
        }
        Ok(out)
    }
}

fn push_value(out: &mut String, value: &InsertValue) {
    match value {
        InsertValue::Text(text) => out.push_str(text),
        InsertValue::Embed(_) => out.push(EMBED_CHAR),
    }
}

impl From<Vec<Op>> for Delta {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

/// Builds a delta by pushing each op, so the result is canonical.
impl FromIterator<Op> for Delta {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        let mut delta = Delta::new();
        for op in iter {
            delta.push(op);
        }
        delta
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn attrs(v: Value) -> Option<AttributeMap> {
        v.as_object().cloned()
    }

    #[test]
    fn insert_text_and_embed() {
        let mut delta = Delta::new();
        delta.insert("test").insert(json!({"image": "a.png"}));
        assert_eq!(
            delta.ops(),
            &[Op::insert("test"), Op::insert(json!({"image": "a.png"}))]
        );
    }

    #[test]
    fn empty_and_zero_are_ignored() {
        let mut delta = Delta::new();
        delta.insert("").retain(0).delete(0).insert_with("", attrs(json!({"bold": true})));
        assert!(delta.is_empty());
    }

    #[test]
    fn insert_after_delete_moves_in_front() {
        let mut delta = Delta::new();
        delta.insert("ab").delete(1);
        assert_eq!(delta.ops(), &[Op::insert("ab"), Op::delete(1)]);
        delta.insert("c");
        assert_eq!(delta.ops(), &[Op::insert("abc"), Op::delete(1)]);
    }

    #[test]
    fn insert_after_only_delete_goes_first() {
        let mut delta = Delta::new();
        delta.delete(1).insert("a");
        assert_eq!(delta.ops(), &[Op::insert("a"), Op::delete(1)]);
    }

    #[test]
    fn insert_after_delete_with_different_attributes() {
        let mut delta = Delta::new();
        delta.retain(1).delete(2).insert_with("x", attrs(json!({"bold": true})));
        assert_eq!(
            delta.ops(),
            &[
                Op::retain(1),
                Op::insert_with("x", attrs(json!({"bold": true}))),
                Op::delete(2),
            ]
        );
    }

    #[test]
    fn merges_like_ops() {
        let bold = attrs(json!({"bold": true}));
        let mut delta = Delta::new();
        delta
            .insert_with("a", bold.clone())
            .insert_with("b", bold.clone())
            .insert("c")
            .retain(2)
            .retain(3)
            .retain_with(1, bold.clone())
            .delete(1)
            .delete(2);
        assert_eq!(
            delta.ops(),
            &[
                Op::insert_with("ab", bold.clone()),
                Op::insert("c"),
                Op::retain(5),
                Op::retain_with(1, bold),
                Op::delete(3),
            ]
        );
    }

    #[test]
    fn embeds_never_merge() {
        let mut delta = Delta::new();
        delta.insert(json!({"image": 1})).insert(json!({"image": 1}));
        assert_eq!(delta.ops().len(), 2);
        assert_eq!(delta.length(), 2);
    }

    #[test]
    fn chop_only_plain_retain() {
        let mut delta = Delta::new();
        delta.insert("a").retain(4);
        delta.chop();
        assert_eq!(delta.ops(), &[Op::insert("a")]);

        let mut delta = Delta::new();
        delta.insert("a").retain_with(4, attrs(json!({"bold": true})));
        delta.chop();
        assert_eq!(delta.ops().len(), 2);
    }

    #[test]
    fn lengths() {
        let mut delta = Delta::new();
        delta.insert("AB").insert(json!({"image": 1})).retain(2).delete(5);
        assert_eq!(delta.length(), 10);
        assert_eq!(delta.change_length(), -2);
    }

    #[test]
    fn collection_helpers() {
        let mut delta = Delta::new();
        delta.insert("Hello").retain(2).insert(json!({"image": 1})).delete(3);

        let inserts = delta.filter(|op, _| op.is_insert());
        assert_eq!(inserts.len(), 2);

        let mut seen = Vec::new();
        delta.for_each(|op, i| seen.push((i, op.kind())));
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3].0, 3);

        assert_eq!(delta.map(|op, _| op.len()), vec![5, 2, 1, 3]);

        let (passed, failed) = delta.partition(|op, _| op.is_insert());
        assert_eq!(passed, inserts);
        assert_eq!(failed, vec![Op::retain(2), Op::delete(3)]);

        let total = delta.reduce(|sum, op, _| sum + op.len(), 0);
        assert_eq!(total, delta.length());
    }

    #[test]
    fn slice_splits_ops() {
        let bold = attrs(json!({"bold": true}));
        let mut delta = Delta::new();
        delta.retain(2).insert_with("ABC", bold.clone()).delete(4);

        let mut expected = Delta::new();
        expected.retain(1).insert_with("AB", bold.clone());
        assert_eq!(delta.slice(1..4), expected);

        let mut expected = Delta::new();
        expected.insert_with("C", bold).delete(4);
        assert_eq!(delta.slice(4..), expected);
        assert!(delta.slice(20..).is_empty());
        assert!(delta.slice(3..3).is_empty());
    }

    #[test]
    fn slice_inclusive_and_embeds() {
        let mut delta = Delta::new();
        delta.insert("0123").insert(json!({"image": 1})).insert("56");
        let sliced = delta.slice(3..=5);
        assert_eq!(
            sliced.ops(),
            &[Op::insert("3"), Op::insert(json!({"image": 1})), Op::insert("5")]
        );
    }

    #[test]
    fn concat_merges_at_seam() {
        let bold = attrs(json!({"bold": true}));
        let mut a = Delta::new();
        a.insert_with("Test", bold.clone());
        let mut b = Delta::new();
        b.insert_with("!", bold.clone()).insert("\n");

        let mut expected = Delta::new();
        expected.insert_with("Test!", bold).insert("\n");
        assert_eq!(a.concat(&b), expected);
        assert_eq!(a.concat(&Delta::new()), a);
        assert_eq!(Delta::new().concat(&a), a);
    }

    #[test]
    fn apply_to_text_and_render() {
        let mut change = Delta::new();
        change.retain(6).delete(5).insert("there").insert(json!({"image": 1}));
        assert_eq!(change.apply_to_text("Hello World"), "Hello there\0");
        assert!(change.to_plain_text().is_err());

        let mut doc = Delta::new();
        doc.insert("a").insert(json!({"image": 1})).insert("b");
        assert_eq!(doc.to_plain_text().unwrap(), "a\0b");
    }

    #[test]
    fn from_iter_canonicalizes() {
        let delta: Delta = vec![Op::insert("a"), Op::insert("b"), Op::delete(1), Op::retain(0)]
            .into_iter()
            .collect();
        assert_eq!(delta.ops(), &[Op::insert("ab"), Op::delete(1), Op::retain(0)]);
        let raw = Delta::from(vec![Op::insert("a"), Op::insert("b")]);
        assert_eq!(raw.ops().len(), 2);
    }
}
