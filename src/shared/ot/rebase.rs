//! Transform engine
//!
//! `rebase(d1, d2)` re-expresses `d2` so that it applies after `d1`, where
//! both were computed against the same base. `d1` has priority: whatever it
//! deleted stays deleted, and `d2`'s operations are shifted, clipped, or
//! dropped around it.
//!
//! Both scripts are laid over the base text and walked together, one
//! breakpoint at a time. `pos` maps the current base position into the text
//! after `d1`.
//!
//! A delete is judged by its whole base span, no matter how the other script
//! cuts it: an insert landing strictly inside the other script's delete is
//! dropped, in either direction, and one at the span's edge survives. Every
//! base character removed by either script stays removed. Only inserts at
//! the same base position depend on which script goes first.

use super::SENTINEL;
use crate::shared::error::OtError;
use crate::shared::ops::{EditScript, Operation};

/// One script laid over the base text
struct Layout<'a> {
    /// `(position, text)` in script order
    inserts: Vec<(usize, &'a str)>,
    /// Deleted base spans `[start, end)`, touching spans merged
    deletes: Vec<(usize, usize)>,
}

impl<'a> Layout<'a> {
    fn of(script: &'a EditScript) -> Self {
        let mut inserts = Vec::new();
        let mut deletes: Vec<(usize, usize)> = Vec::new();
        for op in script {
            match op {
                Operation::Insert { index, value } => inserts.push((*index, value.as_str())),
                Operation::Delete { index, size } => {
                    let end = index + size;
                    match deletes.last_mut() {
                        Some(last) if last.1 == *index => last.1 = end,
                        _ => deletes.push((*index, end)),
                    }
                }
            }
        }
        Self { inserts, deletes }
    }

    fn breakpoints(&self) -> impl Iterator<Item = usize> + '_ {
        let inserts = self.inserts.iter().map(|(at, _)| *at);
        let deletes = self.deletes.iter().flat_map(|&(start, end)| [start, end]);
        inserts.chain(deletes)
    }

    /// The delete span holding base character `at`, if any
    fn span_at(&self, at: usize) -> Option<(usize, usize)> {
        let i = self.deletes.partition_point(|&(_, end)| end <= at);
        self.deletes.get(i).copied().filter(|&(start, _)| start <= at)
    }

    /// Whether base character `at` is deleted
    fn removes(&self, at: usize) -> bool {
        self.span_at(at).is_some()
    }

    /// Whether the gap before base character `at` lies strictly inside a
    /// deleted span
    fn swallows(&self, at: usize) -> bool {
        self.span_at(at).is_some_and(|(start, _)| start < at)
    }
}

/// Rebase `d2` over `d1`.
///
/// Fails with [`OtError::MalformedScript`] when either script is out of
/// order or overlaps itself.
pub fn rebase(d1: &EditScript, d2: &EditScript) -> Result<EditScript, OtError> {
    d1.validate_order()?;
    d2.validate_order()?;

    let old = Layout::of(d1);
    let new = Layout::of(d2);

    let mut points: Vec<usize> = std::iter::once(0)
        .chain(old.breakpoints())
        .chain(new.breakpoints())
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut old_inserts = old.inserts.iter().peekable();
    let mut new_inserts = new.inserts.iter().peekable();
    let mut pos = 0;
    let mut out = EditScript::new();

    for (k, &at) in points.iter().enumerate() {
        // d1's text at this gap is already in place
        while let Some((_, value)) = old_inserts.next_if(|(index, _)| *index == at) {
            let len = value.chars().count();
            if new.swallows(at) {
                out.push(Operation::delete(pos, len));
            }
            pos += len;
        }

        while let Some((_, value)) = new_inserts.next_if(|(index, _)| *index == at) {
            if old.swallows(at) {
                // cursor markers outlive the text around them
                let markers: String = value.chars().filter(|c| *c == SENTINEL).collect();
                out.push(Operation::insert(pos, markers));
            } else {
                out.push(Operation::insert(pos, *value));
            }
        }

        // base characters up to the next breakpoint share one fate
        let Some(&next) = points.get(k + 1) else {
            break;
        };
        if old.removes(at) {
            continue;
        }
        let len = next - at;
        if new.removes(at) {
            out.push(Operation::delete(pos, len));
        }
        pos += len;
    }

    Ok(out)
}
