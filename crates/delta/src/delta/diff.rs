use rich_delta_diff::{Cursor, EditKind};
use rich_delta_util::{deep_equal, utf16};
use tracing::debug;

use crate::attributes;
use crate::error::{DeltaError, Side};
use crate::iterator::OpIterator;
use crate::op::{InsertValue, Op};

use super::Delta;

fn same_insert(a: &Op, b: &Op) -> bool {
    match (a.insert_value(), b.insert_value()) {
        (Some(InsertValue::Text(a)), Some(InsertValue::Text(b))) => a == b,
        (Some(InsertValue::Embed(a)), Some(InsertValue::Embed(b))) => deep_equal(a, b),
        _ => false,
    }
}

impl Delta {
    /// The change that turns document `self` into document `other`.
    ///
    /// Both deltas must consist of inserts only. Text is compared with the
    /// plain-text diff, each embed standing in as a single NUL; equal spans
    /// become retains carrying the attribute difference, and embeds that
    /// differ are replaced.
    ///
    /// ```
    /// use rich_delta::Delta;
    ///
    /// let mut a = Delta::new();
    /// a.insert("Hello");
    /// let mut b = Delta::new();
    /// b.insert("Hallo");
    ///
    /// let mut expected = Delta::new();
    /// expected.retain(1).insert("a").delete(1);
    /// assert_eq!(a.diff(&b, None).unwrap(), expected);
    /// ```
    pub fn diff(&self, other: &Delta, cursor: Option<Cursor>) -> Result<Delta, DeltaError> {
        if std::ptr::eq(self, other) {
            return Ok(Delta::new());
        }
        let this_text = self
            .render(Side::Receiver)
            .inspect_err(|err| debug!(%err, "rejecting diff"))?;
        let other_text = other
            .render(Side::Argument)
            .inspect_err(|err| debug!(%err, "rejecting diff"))?;

        let mut delta = Delta::new();
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        for (kind, text) in rich_delta_diff::diff(&this_text, &other_text, cursor) {
            let mut length = utf16::len(&text);
            while length > 0 {
                let op_length = match kind {
                    EditKind::Insert => {
                        let op_length = other_iter.peek_length().min(length);
                        delta.push(other_iter.next_len(op_length));
                        op_length
                    }
                    EditKind::Delete => {
                        let op_length = this_iter.peek_length().min(length);
                        this_iter.next_len(op_length);
                        delta.delete(op_length);
                        op_length
                    }
                    EditKind::Equal => {
                        let op_length = this_iter
                            .peek_length()
                            .min(other_iter.peek_length())
                            .min(length);
                        let this_op = this_iter.next_len(op_length);
                        let other_op = other_iter.next_len(op_length);
                        if same_insert(&this_op, &other_op) {
                            let attributes =
                                attributes::diff(this_op.attributes(), other_op.attributes());
                            delta.retain_with(op_length, attributes);
                        } else {
                            delta.push(other_op).delete(op_length);
                        }
                        op_length
                    }
                };
                length -= op_length;
            }
        }
        delta.chop();
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeMap, Range};
    use serde_json::{json, Value};

    fn attrs(v: Value) -> Option<AttributeMap> {
        v.as_object().cloned()
    }

    fn delta(build: impl FnOnce(&mut Delta) -> &mut Delta) -> Delta {
        let mut delta = Delta::new();
        build(&mut delta);
        delta
    }

    #[test]
    fn insert() {
        let a = delta(|d| d.insert("A"));
        let b = delta(|d| d.insert("AB"));
        assert_eq!(a.diff(&b, None).unwrap(), delta(|d| d.retain(1).insert("B")));
    }

    #[test]
    fn delete() {
        let a = delta(|d| d.insert("AB"));
        let b = delta(|d| d.insert("A"));
        assert_eq!(a.diff(&b, None).unwrap(), delta(|d| d.retain(1).delete(1)));
    }

    #[test]
    fn retain() {
        let a = delta(|d| d.insert("A"));
        assert!(a.diff(&a.clone(), None).unwrap().is_empty());
    }

    #[test]
    fn format() {
        let a = delta(|d| d.insert("A"));
        let b = delta(|d| d.insert_with("A", attrs(json!({"bold": true}))));
        assert_eq!(
            a.diff(&b, None).unwrap(),
            delta(|d| d.retain_with(1, attrs(json!({"bold": true}))))
        );
    }

    #[test]
    fn object_attributes() {
        let a = attrs(json!({"font": {"family": "Helvetica", "size": "15px"}}));
        let b = attrs(json!({"font": {"size": "15px", "family": "Helvetica"}}));
        let a = delta(|d| d.insert_with("A", a));
        let b = delta(|d| d.insert_with("A", b));
        assert!(a.diff(&b, None).unwrap().is_empty());
    }

    #[test]
    fn embeds() {
        let a = delta(|d| d.insert(json!({"image": "a.png"})));
        let same = delta(|d| d.insert(json!({"image": "a.png"})));
        let other = delta(|d| d.insert(json!({"image": "b.png"})));
        assert!(a.diff(&same, None).unwrap().is_empty());
        assert_eq!(
            a.diff(&other, None).unwrap(),
            delta(|d| d.insert(json!({"image": "b.png"})).delete(1))
        );
    }

    #[test]
    fn embed_against_nul_text() {
        let a = delta(|d| d.insert(json!({"image": 1})));
        let b = delta(|d| d.insert("\0"));
        assert_eq!(a.diff(&b, None).unwrap(), delta(|d| d.insert("\0").delete(1)));
    }

    #[test]
    fn mixed_document() {
        let a = delta(|d| {
            d.insert_with("Bad", attrs(json!({"color": "red"})))
                .insert_with("cat", attrs(json!({"color": "blue"})))
        });
        let b = delta(|d| {
            d.insert_with("Good", attrs(json!({"bold": true})))
                .insert_with("dog", attrs(json!({"italic": true})))
        });
        let change = a.diff(&b, None).unwrap();
        assert_eq!(a.compose(&change), b);
    }

    #[test]
    fn same_ops_is_empty() {
        let a = delta(|d| d.insert("A").insert(json!({"image": 1})));
        assert!(a.diff(&a, None).unwrap().is_empty());
    }

    #[test]
    fn cursor_picks_typed_position() {
        let a = delta(|d| d.insert("aaa"));
        let b = delta(|d| d.insert("aaaa"));
        assert_eq!(a.diff(&b, None).unwrap(), delta(|d| d.retain(3).insert("a")));
        assert_eq!(
            a.diff(&b, Some(Cursor::Caret(1))).unwrap(),
            delta(|d| d.retain(1).insert("a"))
        );
        let selection = Cursor::Selection {
            old_range: Range::caret(2),
            new_range: Some(Range::caret(3)),
        };
        assert_eq!(a.diff(&b, Some(selection)).unwrap(), delta(|d| d.retain(2).insert("a")));
    }

    #[test]
    fn rejects_non_documents() {
        let doc = delta(|d| d.insert("A"));
        let change = delta(|d| d.retain(1).insert("B"));
        assert_eq!(
            change.diff(&doc, None),
            Err(DeltaError::NotADocument(Side::Receiver))
        );
        assert_eq!(
            doc.diff(&change, None),
            Err(DeltaError::NotADocument(Side::Argument))
        );
        assert_eq!(
            change.diff(&change.clone(), None),
            Err(DeltaError::NotADocument(Side::Receiver))
        );
    }
}
