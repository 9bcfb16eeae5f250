//! Formatting attribute maps and their algebra.
//!
//! A key mapped to `null` means "remove this attribute", which is different
//! from the key being absent ("leave it alone"). Every function treats a
//! missing map and an empty one alike and returns `None` rather than an empty
//! map, except [`invert`] whose result is always applied as a retain.

use rich_delta_util::deep_equal;
use serde_json::{Map, Value};

pub type AttributeMap = Map<String, Value>;

fn non_empty(map: AttributeMap) -> Option<AttributeMap> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Applies `b` on top of `a`.
///
/// Keys set in `b` win; keys only in `a` are kept. `null` values coming from
/// `b` are dropped unless `keep_null` is set, which is what composing two
/// retains needs so that the removal still reaches the document.
pub fn compose(
    a: Option<&AttributeMap>,
    b: Option<&AttributeMap>,
    keep_null: bool,
) -> Option<AttributeMap> {
    let mut attributes: AttributeMap = match b {
        Some(b) => b
            .iter()
            .filter(|(_, value)| keep_null || !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => Map::new(),
    };
    if let Some(a) = a {
        for (key, value) in a {
            if !b.is_some_and(|b| b.contains_key(key)) {
                attributes.insert(key.clone(), value.clone());
            }
        }
    }
    non_empty(attributes)
}

/// The attribute change that turns `a` into `b`: changed or added keys with
/// their new value, removed keys with `null`.
pub fn diff(a: Option<&AttributeMap>, b: Option<&AttributeMap>) -> Option<AttributeMap> {
    let empty = Map::new();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);

    let mut attributes = Map::new();
    for key in a.keys().chain(b.keys()) {
        if attributes.contains_key(key) {
            continue;
        }
        let changed = match (a.get(key), b.get(key)) {
            (Some(x), Some(y)) => !deep_equal(x, y),
            (None, None) => false,
            _ => true,
        };
        if changed {
            attributes.insert(key.clone(), b.get(key).cloned().unwrap_or(Value::Null));
        }
    }
    non_empty(attributes)
}

/// The attribute change that undoes applying `attr` to content formatted
/// with `base`.
///
/// Keys `attr` touched are restored to their `base` value, and keys `attr`
/// introduced are removed with `null`.
pub fn invert(attr: Option<&AttributeMap>, base: Option<&AttributeMap>) -> AttributeMap {
    let empty = Map::new();
    let attr = attr.unwrap_or(&empty);
    let base = base.unwrap_or(&empty);

    let mut inverted = Map::new();
    for (key, base_value) in base {
        if let Some(value) = attr.get(key) {
            if !deep_equal(value, base_value) {
                inverted.insert(key.clone(), base_value.clone());
            }
        }
    }
    for key in attr.keys() {
        if !base.contains_key(key) {
            inverted.insert(key.clone(), Value::Null);
        }
    }
    inverted
}

/// Rebases the attribute change `b` over a concurrent change `a`.
///
/// With `priority`, `a` happened first and wins every key both touch.
pub fn transform(
    a: Option<&AttributeMap>,
    b: Option<&AttributeMap>,
    priority: bool,
) -> Option<AttributeMap> {
    let b = b.filter(|b| !b.is_empty())?;
    let a = match a.filter(|a| !a.is_empty()) {
        Some(a) if priority => a,
        _ => return Some(b.clone()),
    };
    let attributes = b
        .iter()
        .filter(|(key, _)| !a.contains_key(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    non_empty(attributes)
}
