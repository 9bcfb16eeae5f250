//! rich-delta - Rich-text deltas
//!
//! A [`Delta`] is an ordered list of insert / retain / delete operations. The
//! same type describes a document (inserts only) and a change to one, so
//! edits can be composed, transformed against concurrent edits, inverted for
//! undo and computed as the diff of two documents.
//!
//! All lengths and positions are UTF-16 code units; an embed counts as one.
//!
//! ```
//! use rich_delta::Delta;
//! use serde_json::json;
//!
//! let mut doc = Delta::new();
//! doc.insert("Hello World");
//!
//! let mut change = Delta::new();
//! change.retain(6).delete(5).insert("there");
//!
//! let updated = doc.compose(&change);
//! assert_eq!(updated.to_plain_text().unwrap(), "Hello there");
//! assert_eq!(
//!     serde_json::to_value(&change).unwrap(),
//!     json!([{"retain": 6}, {"insert": "there"}, {"delete": 5}])
//! );
//! ```

pub mod attributes;
mod codec;
mod delta;
mod error;
mod iterator;
mod op;

pub use attributes::AttributeMap;
pub use delta::Delta;
pub use error::{DeltaError, Side};
pub use iterator::OpIterator;
pub use op::{InsertValue, Op, OpKind};

pub use rich_delta_diff::{Cursor, Range};
