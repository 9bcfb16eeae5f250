//! Myers O(ND) difference algorithm with common-affix stripping, half-match
//! speedup and a merge pass that keeps surrogate pairs whole.

use tracing::trace;

use crate::cursor::find_cursor_edit;
use crate::unit::{find, Unit};
use crate::{Cursor, EditKind};

pub(crate) type Chunk<T> = (EditKind, Vec<T>);

/// Diffs two unit sequences.
///
/// `fix_unicode` is only set by the public entry point; recursive calls on
/// sub-ranges may split surrogate pairs and rely on the outermost merge pass
/// to repair them.
pub(crate) fn diff_main<T: Unit>(
    a: &[T],
    b: &[T],
    cursor: Option<Cursor>,
    fix_unicode: bool,
) -> Vec<Chunk<T>> {
    if a == b {
        if a.is_empty() {
            return Vec::new();
        }
        return vec![(EditKind::Equal, a.to_vec())];
    }

    if let Some(cursor) = cursor {
        if let Some(edit) = find_cursor_edit(a, b, cursor) {
            trace!(?cursor, parts = edit.len(), "diff explained by a single edit at the cursor");
            return edit;
        }
    }

    let prefix_len = common_prefix(a, b);
    let (prefix, a) = a.split_at(prefix_len);
    let b = &b[prefix_len..];

    let suffix_len = common_suffix(a, b);
    let (a, suffix) = a.split_at(a.len() - suffix_len);
    let b = &b[..b.len() - suffix_len];

    let mut diffs = compute(a, b);
    if !prefix.is_empty() {
        diffs.insert(0, (EditKind::Equal, prefix.to_vec()));
    }
    if !suffix.is_empty() {
        diffs.push((EditKind::Equal, suffix.to_vec()));
    }
    cleanup_merge(&mut diffs, fix_unicode);
    diffs
}

/// Diffs two sequences known to share no common prefix or suffix.
fn compute<T: Unit>(a: &[T], b: &[T]) -> Vec<Chunk<T>> {
    if a.is_empty() {
        return vec![(EditKind::Insert, b.to_vec())];
    }
    if b.is_empty() {
        return vec![(EditKind::Delete, a.to_vec())];
    }

    let a_longer = a.len() > b.len();
    let (long, short) = if a_longer { (a, b) } else { (b, a) };
    if let Some(i) = find(long, short, 0) {
        let kind = if a_longer {
            EditKind::Delete
        } else {
            EditKind::Insert
        };
        return vec![
            (kind, long[..i].to_vec()),
            (EditKind::Equal, short.to_vec()),
            (kind, long[i + short.len()..].to_vec()),
        ];
    }

    if short.len() == 1 {
        return vec![
            (EditKind::Delete, a.to_vec()),
            (EditKind::Insert, b.to_vec()),
        ];
    }

    if let Some(hm) = half_match(a, b) {
        let mut diffs = diff_main(hm.a_head, hm.b_head, None, false);
        diffs.push((EditKind::Equal, hm.common.to_vec()));
        diffs.extend(diff_main(hm.a_tail, hm.b_tail, None, false));
        return diffs;
    }

    bisect(a, b)
}

/// A common middle shared by both texts, with the flanks on either side.
struct HalfMatch<'a, T> {
    a_head: &'a [T],
    a_tail: &'a [T],
    b_head: &'a [T],
    b_tail: &'a [T],
    common: &'a [T],
}

/// Looks for a substring at least half as long as the longer text that both
/// texts share. The result can be non-minimal.
fn half_match<'a, T: Unit>(a: &'a [T], b: &'a [T]) -> Option<HalfMatch<'a, T>> {
    let a_longer = a.len() > b.len();
    let (long, short) = if a_longer { (a, b) } else { (b, a) };
    if long.len() < 4 || short.len() * 2 < long.len() {
        return None;
    }

    // Seeds at the second and third quarters of the longer text.
    let hm1 = half_match_at(long, short, long.len().div_ceil(4));
    let hm2 = half_match_at(long, short, long.len().div_ceil(2));
    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) | (None, Some(hm)) => hm,
        (Some(hm1), Some(hm2)) => {
            if hm1.common.len() > hm2.common.len() {
                hm1
            } else {
                hm2
            }
        }
    };

    if a_longer {
        Some(hm)
    } else {
        Some(HalfMatch {
            a_head: hm.b_head,
            a_tail: hm.b_tail,
            b_head: hm.a_head,
            b_tail: hm.a_tail,
            common: hm.common,
        })
    }
}

/// Extends every occurrence of the quarter-length seed starting at `i` in
/// `long` and keeps the longest. `a_*` fields refer to `long`.
fn half_match_at<'a, T: Unit>(long: &'a [T], short: &'a [T], i: usize) -> Option<HalfMatch<'a, T>> {
    let seed_end = (i + long.len() / 4).min(long.len());
    let seed = &long[i..seed_end];
    let mut best: Option<HalfMatch<'a, T>> = None;
    let mut best_len = 0usize;
    let mut from = 0usize;
    while let Some(j) = find(short, seed, from) {
        let prefix_len = common_prefix(&long[i..], &short[j..]);
        let suffix_len = common_suffix(&long[..i], &short[..j]);
        if best_len < suffix_len + prefix_len {
            best_len = suffix_len + prefix_len;
            best = Some(HalfMatch {
                a_head: &long[..i - suffix_len],
                a_tail: &long[i + prefix_len..],
                b_head: &short[..j - suffix_len],
                b_tail: &short[j + prefix_len..],
                common: &short[j - suffix_len..j + prefix_len],
            });
        }
        from = j + 1;
    }
    best.filter(|hm| hm.common.len() * 2 >= long.len())
}

/// Finds the middle snake of a diff, splits the problem in two and recurses.
fn bisect<T: Unit>(a: &[T], b: &[T]) -> Vec<Chunk<T>> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let v_offset = max_d;
    let v_length = (2 * max_d + 2) as usize;
    let mut v1 = vec![-1isize; v_length];
    let mut v2 = vec![-1isize; v_length];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = n - m;
    // With an odd delta the forward path collides with the reverse path.
    let front = delta % 2 != 0;
    let mut k1start = 0isize;
    let mut k1end = 0isize;
    let mut k2start = 0isize;
    let mut k2end = 0isize;

    for d in 0..max_d {
        // Walk the front path one step.
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 >= 0 && y1 >= 0 && x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n {
                // Ran off the right of the graph.
                k1end += 2;
            } else if y1 > m {
                // Ran off the bottom of the graph.
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0
                    && (k2_offset as usize) < v_length
                    && v2[k2_offset as usize] != -1
                {
                    let x2 = n - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(a, b, x1, y1);
                    }
                }
            }
            k1 += 2;
        }

        // Walk the reverse path one step.
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 >= 0
                && y2 >= 0
                && x2 < n
                && y2 < m
                && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n {
                k2end += 2;
            } else if y2 > m {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0
                    && (k1_offset as usize) < v_length
                    && v1[k1_offset as usize] != -1
                {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    if x1 >= n - x2 {
                        return bisect_split(a, b, x1, y1);
                    }
                }
            }
            k2 += 2;
        }
    }

    trace!(old_len = a.len(), new_len = b.len(), "bisect found no common units");
    vec![
        (EditKind::Delete, a.to_vec()),
        (EditKind::Insert, b.to_vec()),
    ]
}

fn bisect_split<T: Unit>(a: &[T], b: &[T], x: isize, y: isize) -> Vec<Chunk<T>> {
    let x = x.clamp(0, a.len() as isize) as usize;
    let y = y.clamp(0, b.len() as isize) as usize;
    let mut diffs = diff_main(&a[..x], &b[..y], None, false);
    diffs.extend(diff_main(&a[x..], &b[y..], None, false));
    diffs
}

/// Length of the common prefix, never ending between the halves of a
/// surrogate pair.
pub(crate) fn common_prefix<T: Unit>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() || a[0] != b[0] {
        return 0;
    }
    // Binary search.
    let mut min = 0usize;
    let mut max = a.len().min(b.len());
    let mut mid = max;
    let mut start = 0usize;
    while min < mid {
        if a[start..mid] == b[start..mid] {
            min = mid;
            start = min;
        } else {
            max = mid;
        }
        mid = (max - min) / 2 + min;
    }
    if mid > 0 && a[mid - 1].is_high_surrogate() {
        mid -= 1;
    }
    mid
}

/// Length of the common suffix, never starting between the halves of a
/// surrogate pair.
pub(crate) fn common_suffix<T: Unit>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() || a[a.len() - 1] != b[b.len() - 1] {
        return 0;
    }
    let mut min = 0usize;
    let mut max = a.len().min(b.len());
    let mut mid = max;
    let mut end = 0usize;
    while min < mid {
        if a[a.len() - mid..a.len() - end] == b[b.len() - mid..b.len() - end] {
            min = mid;
            end = min;
        } else {
            max = mid;
        }
        mid = (max - min) / 2 + min;
    }
    if mid > 0 && a[a.len() - mid].is_low_surrogate() {
        mid -= 1;
    }
    mid
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
pub(crate) fn common_overlap<T: Unit>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let text_len = a.len().min(b.len());
    let a = &a[a.len() - text_len..];
    let b = &b[..text_len];
    if a == b {
        return text_len;
    }

    // Grow a candidate suffix of `a` and jump to wherever it next occurs in `b`.
    let mut best = 0usize;
    let mut length = 1usize;
    while length <= text_len {
        let pattern = &a[text_len - length..];
        let Some(found) = find(b, pattern, 0) else {
            return best;
        };
        length += found;
        if length > text_len {
            break;
        }
        if found == 0 || a[text_len - length..] == b[..length] {
            best = length;
            length += 1;
        }
    }
    best
}

/// Reorders and merges like edit sections, merges equalities and factors
/// out common prefixes and suffixes of delete/insert pairs. Any edit
/// section can move as long as it doesn't cross an equality.
///
/// With `fix_unicode`, stray surrogate halves are shaved off equalities and
/// moved into the neighbouring edits so that no chunk splits a pair.
pub(crate) fn cleanup_merge<T: Unit>(diffs: &mut Vec<Chunk<T>>, fix_unicode: bool) {
    // Sentinel so the last edit section gets flushed.
    diffs.push((EditKind::Equal, Vec::new()));
    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<T> = Vec::new();
    let mut text_insert: Vec<T> = Vec::new();

    while pointer < diffs.len() {
        if pointer < diffs.len() - 1 && diffs[pointer].1.is_empty() {
            diffs.remove(pointer);
            continue;
        }
        match diffs[pointer].0 {
            EditKind::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].1);
                pointer += 1;
            }
            EditKind::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].1);
                pointer += 1;
            }
            EditKind::Equal => {
                let mut previous_equality =
                    pointer as isize - count_insert as isize - count_delete as isize - 1;

                if fix_unicode {
                    if previous_equality >= 0 {
                        let prev = &mut diffs[previous_equality as usize].1;
                        if let Some(&stray) = prev.last().filter(|u| u.is_high_surrogate()) {
                            prev.pop();
                            text_delete.insert(0, stray);
                            text_insert.insert(0, stray);
                            if prev.is_empty() {
                                // The equality is gone; absorb the edits before it.
                                diffs.remove(previous_equality as usize);
                                pointer -= 1;
                                let mut k = previous_equality - 1;
                                if k >= 0 && diffs[k as usize].0 == EditKind::Insert {
                                    count_insert += 1;
                                    text_insert.splice(0..0, diffs[k as usize].1.iter().copied());
                                    k -= 1;
                                }
                                if k >= 0 && diffs[k as usize].0 == EditKind::Delete {
                                    count_delete += 1;
                                    text_delete.splice(0..0, diffs[k as usize].1.iter().copied());
                                    k -= 1;
                                }
                                previous_equality = k;
                            }
                        }
                    }
                    let current = &mut diffs[pointer].1;
                    if current.first().is_some_and(|u| u.is_low_surrogate()) {
                        let stray = current.remove(0);
                        text_delete.push(stray);
                        text_insert.push(stray);
                    }
                }

                if pointer < diffs.len() - 1 && diffs[pointer].1.is_empty() {
                    // Empty equality in the middle: keep collecting up to the next one.
                    diffs.remove(pointer);
                    continue;
                }

                if !text_delete.is_empty() || !text_insert.is_empty() {
                    if !text_delete.is_empty() && !text_insert.is_empty() {
                        let common = common_prefix(&text_insert, &text_delete);
                        if common != 0 {
                            let head = text_insert[..common].to_vec();
                            if previous_equality >= 0 {
                                diffs[previous_equality as usize].1.extend(head);
                            } else {
                                diffs.insert(0, (EditKind::Equal, head));
                                pointer += 1;
                            }
                            text_insert.drain(..common);
                            text_delete.drain(..common);
                        }
                        let common = common_suffix(&text_insert, &text_delete);
                        if common != 0 {
                            let tail = text_insert.split_off(text_insert.len() - common);
                            text_delete.truncate(text_delete.len() - common);
                            diffs[pointer].1.splice(0..0, tail);
                        }
                    }

                    let n = count_insert + count_delete;
                    let start = pointer - n;
                    let replacement = match (text_delete.is_empty(), text_insert.is_empty()) {
                        (true, true) => vec![],
                        (true, false) => vec![(EditKind::Insert, std::mem::take(&mut text_insert))],
                        (false, true) => vec![(EditKind::Delete, std::mem::take(&mut text_delete))],
                        (false, false) => vec![
                            (EditKind::Delete, std::mem::take(&mut text_delete)),
                            (EditKind::Insert, std::mem::take(&mut text_insert)),
                        ],
                    };
                    pointer = start + replacement.len();
                    diffs.splice(start..start + n, replacement);
                }

                if pointer != 0 && diffs[pointer - 1].0 == EditKind::Equal {
                    let (_, current) = diffs.remove(pointer);
                    diffs[pointer - 1].1.extend(current);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }
    if diffs.last().is_some_and(|(_, text)| text.is_empty()) {
        diffs.pop();
    }

    // Second pass: single edits surrounded by equalities that can be
    // shifted sideways to eliminate an equality, e.g. A<ins>BA</ins>C -> <ins>AB</ins>AC
    let mut changes = false;
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].0 == EditKind::Equal && diffs[pointer + 1].0 == EditKind::Equal {
            if diffs[pointer].1.ends_with(&diffs[pointer - 1].1) {
                // Shift the edit over the previous equality.
                let (_, prev) = diffs.remove(pointer - 1);
                let edit = &mut diffs[pointer - 1].1;
                edit.truncate(edit.len() - prev.len());
                edit.splice(0..0, prev.iter().copied());
                diffs[pointer].1.splice(0..0, prev);
                changes = true;
            } else if diffs[pointer].1.starts_with(&diffs[pointer + 1].1) {
                // Shift the edit over the next equality.
                let (_, next) = diffs.remove(pointer + 1);
                diffs[pointer - 1].1.extend_from_slice(&next);
                let edit = &mut diffs[pointer].1;
                edit.drain(..next.len());
                edit.extend(next);
                changes = true;
            }
        }
        pointer += 1;
    }
    if changes {
        cleanup_merge(diffs, fix_unicode);
    }
}
