#![allow(dead_code)]

use rich_delta::{Delta, Op};
use rich_delta_util::attributes_equal;

pub fn build(f: impl FnOnce(&mut Delta) -> &mut Delta) -> Delta {
    let mut delta = Delta::new();
    f(&mut delta);
    delta
}

fn mergeable(a: &Op, b: &Op) -> bool {
    match (a, b) {
        (Op::Delete { .. }, Op::Delete { .. }) => true,
        // An insert must never follow a delete.
        (Op::Delete { .. }, Op::Insert { .. }) => true,
        (Op::Insert { value: x, .. }, Op::Insert { value: y, .. }) => {
            x.as_text().is_some()
                && y.as_text().is_some()
                && attributes_equal(a.attributes(), b.attributes())
        }
        (Op::Retain { .. }, Op::Retain { .. }) => attributes_equal(a.attributes(), b.attributes()),
        _ => false,
    }
}

/// Panics if `delta` is not in the canonical form the builder maintains.
pub fn assert_canonical(delta: &Delta) {
    for (i, pair) in delta.ops().windows(2).enumerate() {
        assert!(
            !mergeable(&pair[0], &pair[1]),
            "ops {i} and {} should have been merged: {:?}",
            i + 1,
            delta.ops()
        );
    }
    for op in delta.ops() {
        assert!(!op.is_empty(), "zero-length op in {:?}", delta.ops());
    }
}

pub fn plain(delta: &Delta) -> String {
    match delta.to_plain_text() {
        Ok(text) => text,
        Err(err) => panic!("{err}: {:?}", delta.ops()),
    }
}
