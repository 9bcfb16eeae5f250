//! JSON equality utilities.
//!
//! Attribute values and embeds are compared structurally: key order is
//! irrelevant and numbers compare by value.

mod deep_equal;

pub use deep_equal::{attributes_equal, deep_equal};
