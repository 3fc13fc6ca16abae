//! Diff/patch codec
//!
//! [`compute_diff`] finds a shortest Insert/Delete script between two strings
//! with a full dynamic-programming table over character prefixes.
//! [`apply_diff`] replays a script in one forward scan.
//!
//! Time and memory are both O(|a|·|b|), which suits interactive documents and
//! nothing much larger.

use crate::shared::error::OtError;
use crate::shared::ops::{EditScript, Operation};

/// Which transition reached a cell of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Insert,
    Delete,
    Keep,
}

/// Shortest Insert/Delete script turning `a` into `b`.
///
/// When several transitions reach a cell at the same cost, Insert wins over
/// Delete, and Delete wins over keeping a matching character. The choice is
/// deterministic, so equal inputs always produce identical scripts.
pub fn compute_diff(a: &str, b: &str) -> EditScript {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let width = b.len() + 1;

    // cost[i * width + j]: operations needed to turn a[..i] into b[..j]
    let mut cost = vec![0usize; (a.len() + 1) * width];
    let mut step = vec![Step::Keep; (a.len() + 1) * width];

    for j in 1..=b.len() {
        cost[j] = j;
        step[j] = Step::Insert;
    }
    for i in 1..=a.len() {
        cost[i * width] = i;
        step[i * width] = Step::Delete;
        for j in 1..=b.len() {
            let here = i * width + j;
            let mut best = (cost[here - 1] + 1, Step::Insert);
            let delete = cost[here - width] + 1;
            if delete < best.0 {
                best = (delete, Step::Delete);
            }
            if a[i - 1] == b[j - 1] {
                let keep = cost[here - width - 1];
                if keep < best.0 {
                    best = (keep, Step::Keep);
                }
            }
            cost[here] = best.0;
            step[here] = best.1;
        }
    }

    let mut reversed = Vec::with_capacity(cost[a.len() * width + b.len()]);
    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        match step[i * width + j] {
            Step::Insert => {
                reversed.push(Operation::insert(i, b[j - 1].to_string()));
                j -= 1;
            }
            Step::Delete => {
                reversed.push(Operation::delete(i - 1, 1));
                i -= 1;
            }
            Step::Keep => {
                i -= 1;
                j -= 1;
            }
        }
    }

    reversed.into_iter().rev().collect()
}

/// Apply `script` to `content`.
///
/// Operations must be in non-decreasing index order and must not start inside
/// a preceding delete; any index or size past the end of `content` is
/// rejected.
pub fn apply_diff(content: &str, script: &EditScript) -> Result<String, OtError> {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;

    for (pos, op) in script.iter().enumerate() {
        let index = op.index();
        if index < cursor {
            return Err(OtError::malformed(
                pos,
                format!("index {} is behind the cursor at {}", index, cursor),
            ));
        }
        if index > chars.len() {
            return Err(OtError::malformed(
                pos,
                format!("index {} is past the end of {} characters", index, chars.len()),
            ));
        }
        out.extend(&chars[cursor..index]);
        cursor = index;

        match op {
            Operation::Insert { value, .. } => out.push_str(value),
            Operation::Delete { size, .. } => {
                let end = index + size;
                if end > chars.len() {
                    return Err(OtError::malformed(
                        pos,
                        format!("delete of {} at {} runs past {} characters", size, index, chars.len()),
                    ));
                }
                cursor = end;
            }
        }
    }

    out.extend(&chars[cursor..]);
    Ok(out)
}
