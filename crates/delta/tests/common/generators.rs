#![allow(dead_code)]

use rich_delta::{AttributeMap, Delta};
use rich_delta_util::{utf16, Fuzzer};
use serde_json::{json, Value};

fn maybe_attributes(fuzzer: &Fuzzer, allow_null: bool) -> Option<AttributeMap> {
    let attributes = fuzzer.random_attributes(allow_null);
    (!attributes.is_empty()).then_some(attributes)
}

fn random_embed(fuzzer: &Fuzzer) -> Value {
    json!({ "image": *fuzzer.pick(&["a.png", "b.png"]) })
}

fn insert_something(fuzzer: &Fuzzer, delta: &mut Delta) {
    if fuzzer.random_bool(0.15) {
        delta.insert_with(random_embed(fuzzer), maybe_attributes(fuzzer, false));
    } else {
        let len = fuzzer.random_len(1, 5);
        delta.insert_with(fuzzer.random_text(len), maybe_attributes(fuzzer, false));
    }
}

/// A document of a few formatted text runs and embeds.
pub fn random_document(fuzzer: &Fuzzer) -> Delta {
    let mut doc = Delta::new();
    for _ in 0..fuzzer.random_len(0, 6) {
        insert_something(fuzzer, &mut doc);
    }
    doc
}

/// UTF-16 offsets of every character boundary of `doc`, end included.
pub fn boundaries(doc: &Delta) -> Vec<usize> {
    let text = doc.to_plain_text().unwrap_or_default();
    let mut offsets = vec![0];
    let mut pos = 0;
    for ch in text.chars() {
        pos += ch.len_utf16();
        offsets.push(pos);
    }
    debug_assert_eq!(pos, utf16::len(&text));
    offsets
}

/// A change applicable to `doc` that never cuts a character in half.
pub fn random_change(fuzzer: &Fuzzer, doc: &Delta) -> Delta {
    let offsets = boundaries(doc);
    let last = offsets.len() - 1;
    let mut change = Delta::new();
    let mut at = 0;
    while at < last {
        let step = fuzzer.random_len(1, (last - at).min(4));
        let length = offsets[at + step] - offsets[at];
        match fuzzer.random_int(0, 2) {
            0 => {
                let attributes = if fuzzer.random_bool(0.5) {
                    maybe_attributes(fuzzer, true)
                } else {
                    None
                };
                change.retain_with(length, attributes);
                at += step;
            }
            1 => {
                change.delete(length);
                at += step;
            }
            _ => insert_something(fuzzer, &mut change),
        }
    }
    if fuzzer.random_bool(0.3) {
        insert_something(fuzzer, &mut change);
    }
    change.chop();
    change
}
