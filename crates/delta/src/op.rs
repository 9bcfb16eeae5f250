use rich_delta_util::{attributes_equal, deep_equal, utf16};
use serde_json::Value;

use crate::attributes::AttributeMap;

/// What an insert puts into the document.
#[derive(Debug, Clone)]
pub enum InsertValue {
    Text(String),
    /// Any non-text content, e.g. `{"image": "a.png"}`. Counts as length 1.
    Embed(Value),
}

impl InsertValue {
    /// Length in UTF-16 code units; an embed has length 1.
    pub fn len(&self) -> usize {
        match self {
            InsertValue::Text(text) => utf16::len(text),
            InsertValue::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InsertValue::Text(text) => Some(text),
            InsertValue::Embed(_) => None,
        }
    }

    pub fn as_embed(&self) -> Option<&Value> {
        match self {
            InsertValue::Text(_) => None,
            InsertValue::Embed(value) => Some(value),
        }
    }
}

impl PartialEq for InsertValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (InsertValue::Text(a), InsertValue::Text(b)) => a == b,
            (InsertValue::Embed(a), InsertValue::Embed(b)) => deep_equal(a, b),
            _ => false,
        }
    }
}

impl From<&str> for InsertValue {
    fn from(text: &str) -> Self {
        InsertValue::Text(text.to_string())
    }
}

impl From<String> for InsertValue {
    fn from(text: String) -> Self {
        InsertValue::Text(text)
    }
}

/// A JSON string becomes text; anything else is an embed.
impl From<Value> for InsertValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => InsertValue::Text(text),
            other => InsertValue::Embed(other),
        }
    }
}

impl From<InsertValue> for Value {
    fn from(value: InsertValue) -> Self {
        match value {
            InsertValue::Text(text) => Value::String(text),
            InsertValue::Embed(embed) => embed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Insert,
    Retain,
    Delete,
}

/// One step of a delta.
///
/// Lengths are UTF-16 code units. `usize::MAX` stands for an unbounded
/// retain, which is what [`crate::OpIterator`] yields once it is exhausted.
/// Two ops are equal when their attribute maps hold the same entries, with a
/// missing map equal to an empty one.
#[derive(Debug, Clone)]
pub enum Op {
    Insert {
        value: InsertValue,
        attributes: Option<AttributeMap>,
    },
    Retain {
        length: usize,
        attributes: Option<AttributeMap>,
    },
    Delete {
        length: usize,
    },
}

fn normalize(attributes: Option<AttributeMap>) -> Option<AttributeMap> {
    attributes.filter(|map| !map.is_empty())
}

impl Op {
    pub fn insert(value: impl Into<InsertValue>) -> Self {
        Op::Insert {
            value: value.into(),
            attributes: None,
        }
    }

    pub fn insert_with(value: impl Into<InsertValue>, attributes: Option<AttributeMap>) -> Self {
        Op::Insert {
            value: value.into(),
            attributes: normalize(attributes),
        }
    }

    pub fn retain(length: usize) -> Self {
        Op::Retain {
            length,
            attributes: None,
        }
    }

    pub fn retain_with(length: usize, attributes: Option<AttributeMap>) -> Self {
        Op::Retain {
            length,
            attributes: normalize(attributes),
        }
    }

    pub fn delete(length: usize) -> Self {
        Op::Delete { length }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Op::Insert { .. } => OpKind::Insert,
            Op::Retain { .. } => OpKind::Retain,
            Op::Delete { .. } => OpKind::Delete,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Op::Insert { .. })
    }

    pub fn is_retain(&self) -> bool {
        matches!(self, Op::Retain { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Op::Delete { .. })
    }

    /// How much content the op covers: the retain or delete count, or the
    /// length of the inserted value.
    pub fn len(&self) -> usize {
        match self {
            Op::Insert { value, .. } => value.len(),
            Op::Retain { length, .. } | Op::Delete { length } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The op's attributes, if it carries a non-empty map.
    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => {
                attributes.as_ref().filter(|map| !map.is_empty())
            }
            Op::Delete { .. } => None,
        }
    }

    pub fn insert_value(&self) -> Option<&InsertValue> {
        match self {
            Op::Insert { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Op {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Op::Insert { value: a, .. }, Op::Insert { value: b, .. }) => {
                a == b && attributes_equal(self.attributes(), other.attributes())
            }
            (Op::Retain { length: a, .. }, Op::Retain { length: b, .. }) => {
                a == b && attributes_equal(self.attributes(), other.attributes())
            }
            (Op::Delete { length: a }, Op::Delete { length: b }) => a == b,
            _ => false,
        }
    }
}
