use rich_delta_util::utf16;

use crate::attributes::AttributeMap;
use crate::iterator::OpIterator;
use crate::op::{InsertValue, OpKind};

use super::Delta;

impl Delta {
    /// Calls `predicate` with each `\n`-terminated line of a document, the
    /// newline's attributes and the line number.
    ///
    /// See [`Delta::each_line_with`].
    pub fn each_line<F>(&self, predicate: F)
    where
        F: FnMut(&Delta, &AttributeMap, usize) -> bool,
    {
        self.each_line_with('\n', predicate)
    }

    /// Splits a document into lines ending in `newline`.
    ///
    /// Each line is passed without its terminator, together with the
    /// terminator's attributes (line formats such as headers live there).
    /// Returning `false` stops the walk. Trailing content without a
    /// terminator is passed last with empty attributes. The walk also stops
    /// at the first op that is not an insert.
    ///
    /// ```
    /// use rich_delta::Delta;
    /// use serde_json::json;
    ///
    /// let mut doc = Delta::new();
    /// doc.insert("Title")
    ///     .insert_with("\n", json!({"header": 1}).as_object().cloned())
    ///     .insert("Body\nTail");
    ///
    /// let mut lines = Vec::new();
    /// doc.each_line(|line, attributes, i| {
    ///     lines.push((line.to_plain_text().unwrap(), attributes.len(), i));
    ///     true
    /// });
    /// assert_eq!(
    ///     lines,
    ///     vec![
    ///         ("Title".to_string(), 1, 0),
    ///         ("Body".to_string(), 0, 1),
    ///         ("Tail".to_string(), 0, 2),
    ///     ]
    /// );
    /// ```
    pub fn each_line_with<F>(&self, newline: char, mut predicate: F)
    where
        F: FnMut(&Delta, &AttributeMap, usize) -> bool,
    {
        let mut iter = OpIterator::new(&self.ops);
        let mut line = Delta::new();
        let mut i = 0;
        while iter.has_next() {
            if iter.peek_kind() != OpKind::Insert {
                return;
            }
            let Some(op) = iter.peek() else {
                return;
            };
            let start = op.len() - iter.peek_length();
            let found = match op.insert_value() {
                Some(InsertValue::Text(text)) => {
                    utf16::find_char(text, newline, start).map(|at| at - start)
                }
                _ => None,
            };
            match found {
                None => {
                    line.push(iter.next_op());
                }
                Some(0) => {
                    let terminator = iter.next_len(newline.len_utf16());
                    let attributes = terminator.attributes().cloned().unwrap_or_default();
                    if !predicate(&line, &attributes, i) {
                        return;
                    }
                    i += 1;
                    line = Delta::new();
                }
                Some(index) => {
                    line.push(iter.next_len(index));
                }
            }
        }
        if line.length() > 0 {
            predicate(&line, &AttributeMap::new(), i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn attrs(v: Value) -> Option<AttributeMap> {
        v.as_object().cloned()
    }

    fn delta(build: impl FnOnce(&mut Delta) -> &mut Delta) -> Delta {
        let mut delta = Delta::new();
        build(&mut delta);
        delta
    }

    fn collect(doc: &Delta, newline: char) -> Vec<(Delta, AttributeMap, usize)> {
        let mut lines = Vec::new();
        doc.each_line_with(newline, |line, attributes, i| {
            lines.push((line.clone(), attributes.clone(), i));
            true
        });
        lines
    }

    #[test]
    fn expected() {
        let doc = delta(|d| {
            d.insert("Hello\n\n")
                .insert_with("World", attrs(json!({"bold": true})))
                .insert(json!({"image": "octocat.png"}))
                .insert_with("\n", attrs(json!({"align": "right"})))
                .insert("!")
        });
        let lines = collect(&doc, '\n');
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], (delta(|d| d.insert("Hello")), AttributeMap::new(), 0));
        assert_eq!(lines[1], (Delta::new(), AttributeMap::new(), 1));
        assert_eq!(
            lines[2],
            (
                delta(|d| {
                    d.insert_with("World", attrs(json!({"bold": true})))
                        .insert(json!({"image": "octocat.png"}))
                }),
                attrs(json!({"align": "right"})).unwrap_or_default(),
                2
            )
        );
        assert_eq!(lines[3], (delta(|d| d.insert("!")), AttributeMap::new(), 3));
    }

    #[test]
    fn trailing_newline() {
        let doc = delta(|d| d.insert("Hello\nWorld!\n"));
        let lines = collect(&doc, '\n');
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, delta(|d| d.insert("World!")));
    }

    #[test]
    fn non_document_stops() {
        let doc = delta(|d| d.retain(1).delete(2));
        assert!(collect(&doc, '\n').is_empty());
        let doc = delta(|d| d.insert("a\nb").retain(1));
        assert_eq!(collect(&doc, '\n').len(), 1);
    }

    #[test]
    fn early_return() {
        let doc = delta(|d| d.insert("Hello\nNew\nWorld!"));
        let mut count = 0;
        doc.each_line(|_, _, i| {
            count += 1;
            i < 1
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn custom_newline() {
        let doc = delta(|d| d.insert("Hello¶World¶!"));
        let lines = collect(&doc, '¶');
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].0, delta(|d| d.insert("World")));
    }

    #[test]
    fn newline_after_emoji() {
        let doc = delta(|d| d.insert("😀\n😀"));
        let lines = collect(&doc, '\n');
        assert_eq!(lines[0].0, delta(|d| d.insert("😀")));
        assert_eq!(lines[1].0, delta(|d| d.insert("😀")));
    }
}
