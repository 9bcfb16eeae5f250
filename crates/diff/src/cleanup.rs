//! Semantic cleanup of edit scripts.
//!
//! Minimal diffs are often unreadable: "mouse" -> "sofas" comes out as a
//! scatter of one-letter edits. These passes trade minimality for edits that
//! line up with words and lines. They run over `char`s, so a surrogate pair
//! is never split.

use crate::myers::{cleanup_merge, common_overlap, common_suffix, Chunk};
use crate::{normalize, EditKind, EditScript};

/// Reduces the number of edits by eliminating semantically trivial
/// equalities, then aligns the remaining edits to word and line boundaries.
///
/// The old and new texts reconstructed from the script are unchanged.
///
/// ```
/// use rich_delta_diff::{cleanup_semantic, diff, new_text, old_text, EditKind};
///
/// let mut script = diff("mouse", "sofas", None);
/// cleanup_semantic(&mut script);
/// assert_eq!(
///     script,
///     vec![
///         (EditKind::Delete, "mouse".to_string()),
///         (EditKind::Insert, "sofas".to_string()),
///     ]
/// );
/// assert_eq!(old_text(&script), "mouse");
/// assert_eq!(new_text(&script), "sofas");
/// ```
pub fn cleanup_semantic(script: &mut EditScript) {
    let mut diffs: Vec<Chunk<char>> = script
        .drain(..)
        .map(|(kind, text)| (kind, text.chars().collect()))
        .collect();
    semantic(&mut diffs);
    let cleaned = diffs
        .into_iter()
        .map(|(kind, text)| (kind, text.into_iter().collect()))
        .collect();
    *script = normalize(cleaned);
}

fn semantic(diffs: &mut Vec<Chunk<char>>) {
    let mut changes = false;
    // Indices of equalities seen so far.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    let mut pointer = 0usize;
    // Edit lengths before and after the last equality.
    let mut insertions_before = 0usize;
    let mut deletions_before = 0usize;
    let mut insertions_after = 0usize;
    let mut deletions_after = 0usize;

    while pointer < diffs.len() {
        if diffs[pointer].0 == EditKind::Equal {
            equalities.push(pointer);
            insertions_before = insertions_after;
            deletions_before = deletions_after;
            insertions_after = 0;
            deletions_after = 0;
            last_equality = Some(diffs[pointer].1.len()).filter(|len| *len > 0);
        } else {
            if diffs[pointer].0 == EditKind::Insert {
                insertions_after += diffs[pointer].1.len();
            } else {
                deletions_after += diffs[pointer].1.len();
            }
            // An equality no longer than the edits on both sides of it is
            // cheaper to express as a delete plus an insert.
            let eliminate = last_equality.is_some_and(|len| {
                len <= insertions_before.max(deletions_before)
                    && len <= insertions_after.max(deletions_after)
            });
            if let (true, Some(&index)) = (eliminate, equalities.last()) {
                let text = diffs[index].1.clone();
                diffs.insert(index, (EditKind::Delete, text));
                diffs[index + 1].0 = EditKind::Insert;
                // Throw away the equality we just deleted and the one before
                // it, which may need reevaluating.
                equalities.pop();
                equalities.pop();
                insertions_before = 0;
                deletions_before = 0;
                insertions_after = 0;
                deletions_after = 0;
                last_equality = None;
                changes = true;
                match equalities.last() {
                    Some(&index) => pointer = index,
                    None => {
                        pointer = 0;
                        continue;
                    }
                }
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs, false);
    }
    semantic_lossless(diffs);
    extract_overlaps(diffs);
}

/// Finds overlaps between adjacent deletions and insertions, e.g.
/// `<del>abcxxx</del><ins>xxxdef</ins>` -> `<del>abc</del>xxx<ins>def</ins>`
/// and `<del>xxxabc</del><ins>defxxx</ins>` -> `<ins>def</ins>xxx<del>abc</del>`.
/// Only extracts an overlap as big as the edit ahead or behind it.
fn extract_overlaps(diffs: &mut Vec<Chunk<char>>) {
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if diffs[pointer - 1].0 == EditKind::Delete && diffs[pointer].0 == EditKind::Insert {
            let deletion = diffs[pointer - 1].1.clone();
            let insertion = diffs[pointer].1.clone();
            let overlap1 = common_overlap(&deletion, &insertion);
            let overlap2 = common_overlap(&insertion, &deletion);
            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    diffs.insert(pointer, (EditKind::Equal, insertion[..overlap1].to_vec()));
                    diffs[pointer - 1].1 = deletion[..deletion.len() - overlap1].to_vec();
                    diffs[pointer + 1].1 = insertion[overlap1..].to_vec();
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                diffs.insert(pointer, (EditKind::Equal, deletion[..overlap2].to_vec()));
                let kept = insertion[..insertion.len() - overlap2].to_vec();
                diffs[pointer - 1] = (EditKind::Insert, kept);
                diffs[pointer + 1] = (EditKind::Delete, deletion[overlap2..].to_vec());
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Shifts single edits surrounded by equalities sideways so that they align
/// with word, sentence or line boundaries, e.g.
/// `The c<ins>at c</ins>ame.` -> `The <ins>cat </ins>came.`
fn semantic_lossless(diffs: &mut Vec<Chunk<char>>) {
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].0 == EditKind::Equal && diffs[pointer + 1].0 == EditKind::Equal {
            let mut equality1 = diffs[pointer - 1].1.clone();
            let mut edit = diffs[pointer].1.clone();
            let mut equality2 = diffs[pointer + 1].1.clone();

            // First, shift the edit as far left as possible.
            let common = common_suffix(&equality1, &edit);
            if common > 0 {
                let shared = edit[edit.len() - common..].to_vec();
                equality1.truncate(equality1.len() - common);
                edit.truncate(edit.len() - common);
                edit.splice(0..0, shared.iter().copied());
                equality2.splice(0..0, shared);
            }

            // Second, step right one character at a time looking for the
            // best fit.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score = score(&equality1, &edit) + score(&edit, &equality2);
            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                let ch = edit.remove(0);
                equality1.push(ch);
                edit.push(equality2.remove(0));
                let score = score(&equality1, &edit) + score(&edit, &equality2);
                // The >= encourages trailing rather than leading whitespace on edits.
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].1 != best_equality1 {
                // We have an improvement, save it back to the diff.
                if best_equality1.is_empty() {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                } else {
                    diffs[pointer - 1].1 = best_equality1;
                }
                diffs[pointer].1 = best_edit;
                if best_equality2.is_empty() {
                    diffs.remove(pointer + 1);
                    pointer = pointer.saturating_sub(1);
                } else {
                    diffs[pointer + 1].1 = best_equality2;
                }
            }
        }
        pointer += 1;
    }
}

/// Scores the boundary between two texts from 6 (best) to 0 (worst). Edges
/// and blank lines score highest, then line breaks, ends of sentences,
/// whitespace and non-alphanumerics.
fn score(one: &[char], two: &[char]) -> u8 {
    let (Some(&char1), Some(&char2)) = (one.last(), two.first()) else {
        return 6;
    };
    let non_alphanumeric1 = !char1.is_ascii_alphanumeric();
    let non_alphanumeric2 = !char2.is_ascii_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\r' || char1 == '\n');
    let line_break2 = whitespace2 && (char2 == '\r' || char2 == '\n');
    let blank_line1 =
        line_break1 && (one.ends_with(&['\n', '\n']) || one.ends_with(&['\n', '\r', '\n']));
    let blank_line2 = line_break2
        && (two.starts_with(&['\n', '\n'])
            || two.starts_with(&['\r', '\n', '\n'])
            || two.starts_with(&['\n', '\r', '\n'])
            || two.starts_with(&['\r', '\n', '\r', '\n']));

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}
