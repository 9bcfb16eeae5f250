mod common;

use common::assertions::{assert_canonical, build, plain};
use common::generators::{random_change, random_document};
use rich_delta::{Delta, Op};
use rich_delta_util::Fuzzer;
use serde_json::json;

const ROUNDS: usize = 300;

#[test]
fn builder_keeps_canonical_form() {
    let fuzzer = Fuzzer::from_u64(7);
    for _ in 0..ROUNDS {
        let mut delta = Delta::new();
        for _ in 0..fuzzer.random_len(0, 12) {
            let length = fuzzer.random_len(0, 3);
            let attributes = fuzzer.random_attributes(true);
            let attributes =
                (!attributes.is_empty() && fuzzer.random_bool(0.5)).then_some(attributes);
            match fuzzer.random_int(0, 3) {
                0 => delta.insert_with(fuzzer.random_text(length), attributes),
                1 => delta.insert_with(json!({"image": length}), attributes),
                2 => delta.retain_with(length, attributes),
                _ => delta.delete(length),
            };
            assert_canonical(&delta);
        }
    }
}

#[test]
fn document_length_is_sum_of_inserts() {
    let fuzzer = Fuzzer::from_u64(11);
    for _ in 0..ROUNDS {
        let mut delta = Delta::new();
        let mut expected = 0;
        for _ in 0..fuzzer.random_len(0, 8) {
            let text = fuzzer.random_text(fuzzer.random_len(1, 6));
            expected += text.encode_utf16().count();
            delta.insert(text);
        }
        assert_eq!(delta.length(), expected);
        assert_eq!(delta.change_length(), expected as isize);
    }
}

#[test]
fn compose_matches_plain_text_application() {
    let fuzzer = Fuzzer::from_u64(0xC0FFEE);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let change = random_change(&fuzzer, &doc);
        let composed = doc.compose(&change);
        assert_canonical(&composed);
        assert_eq!(plain(&composed), change.apply_to_text(&plain(&doc)));
        assert_eq!(
            composed.length() as isize,
            doc.length() as isize + change.change_length()
        );
    }
}

#[test]
fn invert_restores_document() {
    let fuzzer = Fuzzer::from_u64(0xBADC0DE);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let change = random_change(&fuzzer, &doc);
        let inverted = change.invert(&doc);
        assert_eq!(
            doc.compose(&change).compose(&inverted),
            doc,
            "change {:?} inverted {:?}",
            change.ops(),
            inverted.ops()
        );
    }
}

#[test]
fn compose_is_associative() {
    let fuzzer = Fuzzer::from_u64(99);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let a = random_change(&fuzzer, &doc);
        let b = random_change(&fuzzer, &doc.compose(&a));
        let left = doc.compose(&a).compose(&b);
        let right = doc.compose(&a.compose(&b));
        assert_eq!(plain(&left), plain(&right));
        assert_eq!(left, right);
    }
}

#[test]
fn transform_converges() {
    let fuzzer = Fuzzer::from_u64(2024);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let a = random_change(&fuzzer, &doc);
        let b = random_change(&fuzzer, &doc);
        let via_a = doc.compose(&a).compose(&a.transform(&b, true));
        let via_b = doc.compose(&b).compose(&b.transform(&a, false));
        assert_eq!(plain(&via_a), plain(&via_b));
        assert_eq!(via_a, via_b, "a {:?} b {:?}", a.ops(), b.ops());
    }
}

#[test]
fn transformed_caret_stays_in_document() {
    let fuzzer = Fuzzer::from_u64(5);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let change = random_change(&fuzzer, &doc);
        let caret = fuzzer.random_len(0, doc.length());
        let moved = change.transform_position(caret, fuzzer.random_bool(0.5));
        assert!(moved <= doc.compose(&change).length());
    }
}

#[test]
fn diff_then_compose_reaches_target() {
    let fuzzer = Fuzzer::from_u64(31337);
    for _ in 0..ROUNDS {
        let a = random_document(&fuzzer);
        let b = if fuzzer.random_bool(0.5) {
            random_document(&fuzzer)
        } else {
            a.compose(&random_change(&fuzzer, &a))
        };
        let change = a.diff(&b, None).unwrap();
        assert_canonical(&change);
        assert_eq!(a.compose(&change), b, "diff {:?}", change.ops());
    }
}

#[test]
fn slices_concat_back() {
    let fuzzer = Fuzzer::from_u64(123);
    for _ in 0..ROUNDS {
        let doc = random_document(&fuzzer);
        let offsets = common::generators::boundaries(&doc);
        let split = *fuzzer.pick(&offsets);
        let joined = doc.slice(..split).concat(&doc.slice(split..));
        assert_eq!(joined, doc);
    }
}

#[test]
fn each_line_sees_every_line() {
    let doc = build(|d| {
        d.insert("one\ntwo")
            .insert_with("\n", json!({"list": "bullet"}).as_object().cloned())
            .insert(json!({"image": "a.png"}))
            .insert("\n")
    });
    let mut lines = Vec::new();
    doc.each_line(|line, attributes, i| {
        lines.push((line.ops().to_vec(), attributes.get("list").cloned(), i));
        true
    });
    assert_eq!(
        lines,
        vec![
            (vec![Op::insert("one")], None, 0),
            (vec![Op::insert("two")], Some(json!("bullet")), 1),
            (vec![Op::insert(json!({"image": "a.png"}))], None, 2),
        ]
    );
}
