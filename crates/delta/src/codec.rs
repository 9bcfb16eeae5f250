//! JSON wire format.
//!
//! An op is an object with exactly one of `insert`, `retain` or `delete`,
//! plus `attributes` when it has any:
//!
//! ```json
//! [{"insert": "Hello"}, {"retain": 5, "attributes": {"bold": true}}, {"delete": 3}]
//! ```
//!
//! A delta serializes as its op array and deserializes from either that
//! array or an object with an `ops` array.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::attributes::AttributeMap;
use crate::delta::Delta;
use crate::error::DeltaError;
use crate::op::{InsertValue, Op};

#[derive(Debug, Serialize, Deserialize)]
struct RawOp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insert: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retain: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<AttributeMap>,
}

impl From<&Op> for RawOp {
    fn from(op: &Op) -> Self {
        let attributes = op.attributes().cloned();
        match op {
            Op::Insert { value, .. } => RawOp {
                insert: Some(Value::from(value.clone())),
                retain: None,
                delete: None,
                attributes,
            },
            Op::Retain { length, .. } => RawOp {
                insert: None,
                retain: Some(*length as u64),
                delete: None,
                attributes,
            },
            Op::Delete { length } => RawOp {
                insert: None,
                retain: None,
                delete: Some(*length as u64),
                attributes: None,
            },
        }
    }
}

fn length(value: u64) -> Result<usize, DeltaError> {
    usize::try_from(value)
        .map_err(|_| DeltaError::InvalidOp(format!("length {value} out of range")))
}

impl TryFrom<RawOp> for Op {
    type Error = DeltaError;

    fn try_from(raw: RawOp) -> Result<Self, Self::Error> {
        let attributes = raw.attributes.filter(|map| !map.is_empty());
        match (raw.insert, raw.retain, raw.delete) {
            (Some(value), None, None) => Ok(Op::Insert {
                value: InsertValue::from(value),
                attributes,
            }),
            (None, Some(retain), None) => Ok(Op::Retain {
                length: length(retain)?,
                attributes,
            }),
            // Deletes carry no attributes; any given are ignored.
            (None, None, Some(delete)) => Ok(Op::Delete {
                length: length(delete)?,
            }),
            (None, None, None) => Err(DeltaError::InvalidOp(
                "expected one of insert, retain or delete".to_string(),
            )),
            _ => Err(DeltaError::InvalidOp(
                "more than one of insert, retain and delete".to_string(),
            )),
        }
    }
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawOp::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawOp::deserialize(deserializer)?;
        Op::try_from(raw).map_err(D::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeltaRepr {
    Ops(Vec<Op>),
    Object { ops: Vec<Op> },
}

impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ops())
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ops = match DeltaRepr::deserialize(deserializer)? {
            DeltaRepr::Ops(ops) | DeltaRepr::Object { ops } => ops,
        };
        Ok(Delta::from(ops))
    }
}
