//! # Editing Surface
//!
//! The contract between the sync machine and whatever displays the text.
//! Both calls are synchronous; the machine trusts a reply only as of the
//! moment it is made.
//!
//! ## Provided Surfaces
//!
//! - [`TextBuffer`] - a plain in-memory buffer
//! - [`SharedBuffer`] - a `TextBuffer` behind a mutex, so an editor thread
//!   and a sync session can both hold it
//!
//! Selection bounds are character offsets with `start <= end`.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Text and selection as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveState {
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl LiveState {
    /// Text with the cursor at the start
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection_start: 0,
            selection_end: 0,
        }
    }

    pub fn with_selection(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            selection_start: start,
            selection_end: end,
        }
    }
}

/// Something the sync machine can read from and write to
pub trait EditingSurface: Send {
    fn live_state(&self) -> LiveState;

    fn set_live_state(&mut self, state: LiveState);

    /// Replace the live state with `next` only if it still equals `expected`.
    ///
    /// Returns false, leaving the surface untouched, when the user changed
    /// anything since `expected` was read. Implementations shared across
    /// threads must make the check and the write one atomic step.
    fn adopt_if_unchanged(&mut self, expected: &LiveState, next: LiveState) -> bool {
        if self.live_state() != *expected {
            return false;
        }
        self.set_live_state(next);
        true
    }
}

/// In-memory text with a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    state: LiveState,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: LiveState::new(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.state.selection_start, self.state.selection_end)
    }

    fn char_len(&self) -> usize {
        self.state.text.chars().count()
    }

    /// Select `[start, end)`, clamped to the text
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.state.selection_start = start.min(len);
        self.state.selection_end = end.min(len);
    }

    /// Collapse the selection to a cursor at `at`
    pub fn move_cursor(&mut self, at: usize) {
        self.select(at, at);
    }

    /// Replace the selection with `text`, leaving the cursor after it
    pub fn type_text(&mut self, text: &str) {
        let (start, end) = self.selection();
        let mut next: String = self.state.text.chars().take(start).collect();
        next.push_str(text);
        next.extend(self.state.text.chars().skip(end));
        self.state.text = next;
        self.move_cursor(start + text.chars().count());
    }

    /// Delete the selection, or the character before a collapsed cursor
    pub fn backspace(&mut self) {
        let (start, end) = self.selection();
        if start == end {
            if start == 0 {
                return;
            }
            self.select(start - 1, start);
        }
        self.type_text("");
    }
}

impl EditingSurface for TextBuffer {
    fn live_state(&self) -> LiveState {
        self.state.clone()
    }

    fn set_live_state(&mut self, state: LiveState) {
        self.state = state;
    }
}

/// A [`TextBuffer`] shared between an editor and a sync session
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<TextBuffer>>);

impl SharedBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(TextBuffer::new(text))))
    }

    pub fn lock(&self) -> MutexGuard<'_, TextBuffer> {
        self.0.lock()
    }

    pub fn text(&self) -> String {
        self.0.lock().text().to_string()
    }

    /// Run an edit while holding the buffer
    pub fn edit<R>(&self, f: impl FnOnce(&mut TextBuffer) -> R) -> R {
        f(&mut self.0.lock())
    }
}

impl EditingSurface for SharedBuffer {
    fn live_state(&self) -> LiveState {
        self.0.lock().live_state()
    }

    fn set_live_state(&mut self, state: LiveState) {
        self.0.lock().set_live_state(state);
    }

    fn adopt_if_unchanged(&mut self, expected: &LiveState, next: LiveState) -> bool {
        self.0.lock().adopt_if_unchanged(expected, next)
    }
}
