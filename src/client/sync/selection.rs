//! Selection sentinels
//!
//! Before a merge the selection bounds are written into the text as two
//! [`SENTINEL`] characters. The merge moves them like any other text, and
//! reading them back out yields the selection's new position. The sentinel
//! never appears in committed content.

use crate::client::surface::LiveState;
use crate::shared::ot::SENTINEL;

/// Insert sentinels at the selection bounds of `state`
pub fn mark_selection(state: &LiveState) -> String {
    let len = state.text.chars().count();
    let start = state.selection_start.min(state.selection_end).min(len);
    let end = state.selection_start.max(state.selection_end).min(len);

    let mut marked = String::with_capacity(state.text.len() + 2 * SENTINEL.len_utf8());
    for (i, c) in state.text.chars().enumerate() {
        if i == start {
            marked.push(SENTINEL);
        }
        if i == end {
            marked.push(SENTINEL);
        }
        marked.push(c);
    }
    if start == len {
        marked.push(SENTINEL);
    }
    if end == len {
        marked.push(SENTINEL);
    }
    marked
}

/// Strip sentinels from `marked`, recovering the selection they delimit.
///
/// The selection runs from the first sentinel to the last. A single sentinel
/// gives a collapsed cursor. With none left, `fallback` is clamped to the
/// stripped text.
pub fn unmark_selection(marked: &str, fallback: (usize, usize)) -> LiveState {
    let mut text = String::with_capacity(marked.len());
    let mut len = 0;
    let mut first = None;
    let mut last = None;

    for c in marked.chars() {
        if c == SENTINEL {
            first.get_or_insert(len);
            last = Some(len);
        } else {
            text.push(c);
            len += 1;
        }
    }

    let (start, end) = match (first, last) {
        (Some(start), Some(end)) => (start, end),
        _ => (fallback.0.min(len), fallback.1.min(len)),
    };
    LiveState::with_selection(text, start, end)
}
