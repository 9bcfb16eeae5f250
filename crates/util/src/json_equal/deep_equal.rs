use serde_json::{Map, Value};

/// Performs a deep equality check between two JSON values.
///
/// This function compares values recursively, checking equality for:
/// - Primitives (null, bool, number, string)
/// - Arrays (element-by-element comparison)
/// - Objects (key-by-key comparison, order-insensitive)
///
/// Integers and floats holding the same number are equal.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use rich_delta_util::json_equal::deep_equal;
///
/// let a = json!({"link": {"href": "x", "target": "_blank"}});
/// let b = json!({"link": {"target": "_blank", "href": "x"}});
/// let c = json!({"link": {"href": "y", "target": "_blank"}});
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// assert!(deep_equal(&json!(1), &json!(1.0)));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            if a == b {
                return true;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::String(a), Value::String(b)) => a == b,

        // Arrays
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(x, y)| deep_equal(x, y))
        }

        // Objects
        (Value::Object(obj_a), Value::Object(obj_b)) => map_equal(obj_a, obj_b),

        // Different types are never equal
        _ => false,
    }
}

fn map_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    for (key, val_a) in a {
        match b.get(key) {
            Some(val_b) => {
                if !deep_equal(val_a, val_b) {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

/// Compares two optional attribute maps, treating a missing map and an empty
/// map as the same thing.
///
/// ```
/// use serde_json::{json, Map};
/// use rich_delta_util::json_equal::attributes_equal;
///
/// let bold = json!({"bold": true});
/// let bold = bold.as_object();
/// assert!(attributes_equal(bold, bold));
/// assert!(attributes_equal(None, Some(&Map::new())));
/// assert!(!attributes_equal(bold, None));
/// ```
pub fn attributes_equal(a: Option<&Map<String, Value>>, b: Option<&Map<String, Value>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => map_equal(a, b),
        (Some(m), None) | (None, Some(m)) => m.is_empty(),
        (None, None) => true,
    }
}
