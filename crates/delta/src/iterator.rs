use rich_delta_util::utf16;

use crate::op::{InsertValue, Op, OpKind};

/// A cursor over a slice of ops that can hand them out in pieces.
///
/// Past the end it behaves as an endless retain, which lets the delta
/// algorithms walk two op lists of different lengths in lockstep.
#[derive(Debug, Clone)]
pub struct OpIterator<'a> {
    ops: &'a [Op],
    index: usize,
    offset: usize,
}

impl<'a> OpIterator<'a> {
    pub fn new(ops: &'a [Op]) -> Self {
        Self {
            ops,
            index: 0,
            offset: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.ops.len()
    }

    /// Takes the rest of the current op.
    pub fn next_op(&mut self) -> Op {
        self.next_len(usize::MAX)
    }

    /// Takes at most `length` units of the current op.
    ///
    /// Text inserts are cut at UTF-16 offsets; a cut through a surrogate pair
    /// leaves U+FFFD in place of the orphaned half. Once exhausted this
    /// returns `Op::retain(usize::MAX)`.
    pub fn next_len(&mut self, length: usize) -> Op {
        let Some(op) = self.ops.get(self.index) else {
            return Op::retain(usize::MAX);
        };
        let offset = self.offset;
        let remaining = op.len().saturating_sub(offset);
        let length = if length >= remaining {
            self.index += 1;
            self.offset = 0;
            remaining
        } else {
            self.offset += length;
            length
        };
        match op {
            Op::Delete { .. } => Op::Delete { length },
            Op::Retain { attributes, .. } => Op::Retain {
                length,
                attributes: attributes.clone(),
            },
            Op::Insert { value, attributes } => {
                let value = match value {
                    InsertValue::Text(text) => {
                        InsertValue::Text(utf16::slice(text, offset, length))
                    }
                    InsertValue::Embed(embed) => InsertValue::Embed(embed.clone()),
                };
                Op::Insert {
                    value,
                    attributes: attributes.clone(),
                }
            }
        }
    }

    /// The op under the cursor, in full, regardless of how much of it has
    /// already been taken.
    pub fn peek(&self) -> Option<&'a Op> {
        self.ops.get(self.index)
    }

    /// Units left in the current op, or `usize::MAX` when exhausted.
    pub fn peek_length(&self) -> usize {
        match self.ops.get(self.index) {
            Some(op) => op.len().saturating_sub(self.offset),
            None => usize::MAX,
        }
    }

    /// Kind of the current op; an exhausted iterator reports `Retain`.
    pub fn peek_kind(&self) -> OpKind {
        self.ops.get(self.index).map_or(OpKind::Retain, Op::kind)
    }

    /// Everything not yet taken, starting with the remainder of the current
    /// op. Does not advance the iterator.
    pub fn rest(&self) -> Vec<Op> {
        if !self.has_next() {
            return Vec::new();
        }
        if self.offset == 0 {
            return self.ops[self.index..].to_vec();
        }
        let mut iter = self.clone();
        let mut rest = Vec::with_capacity(self.ops.len() - self.index);
        rest.push(iter.next_op());
        rest.extend_from_slice(&self.ops[iter.index..]);
        rest
    }
}

impl Iterator for OpIterator<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        self.has_next().then(|| self.next_op())
    }
}
