//! Edit Operations
//!
//! An [`EditScript`] is an ordered list of [`Operation`]s read as a single
//! left-to-right patch against one fixed base string. Indices are character
//! offsets into that base, never into partially patched text.
//!
//! Scripts built with [`EditScript::push`] stay coalesced: two inserts at the
//! same index become one run, as do two deletes that touch end to start.
//!
//! # Wire Format
//!
//! ```json
//! [
//!   { "kind": "Delete", "index": 0, "size": 1 },
//!   { "kind": "Insert", "index": 1, "value": "b" }
//! ]
//! ```

use crate::shared::error::OtError;
use serde::{Deserialize, Serialize};

/// A single primitive edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operation {
    /// Insert `value` before the base character at `index`
    Insert { index: usize, value: String },
    /// Remove `size` base characters starting at `index`
    Delete { index: usize, size: usize },
}

impl Operation {
    pub fn insert(index: usize, value: impl Into<String>) -> Self {
        Self::Insert {
            index,
            value: value.into(),
        }
    }

    pub fn delete(index: usize, size: usize) -> Self {
        Self::Delete { index, size }
    }

    /// Position in the base string
    pub fn index(&self) -> usize {
        match self {
            Self::Insert { index, .. } | Self::Delete { index, .. } => *index,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    /// Number of characters inserted or removed
    pub fn len(&self) -> usize {
        match self {
            Self::Insert { value, .. } => value.chars().count(),
            Self::Delete { size, .. } => *size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First base index not covered by this operation
    fn end(&self) -> usize {
        match self {
            Self::Insert { index, .. } => *index,
            Self::Delete { index, size } => index + size,
        }
    }
}

/// Ordered, non-overlapping list of operations against one base string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript(Vec<Operation>);

impl EditScript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn ops(&self) -> &[Operation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_ops(self) -> Vec<Operation> {
        self.0
    }

    /// Append an operation, merging it into the previous one when the two are
    /// adjacent runs of the same kind. Empty operations are dropped.
    pub fn push(&mut self, op: Operation) {
        if op.is_empty() {
            return;
        }
        if let Some(last) = self.0.last_mut() {
            match (last, &op) {
                (
                    Operation::Insert { index: at, value: text },
                    Operation::Insert { index, value },
                ) if *at == *index => {
                    text.push_str(value);
                    return;
                }
                (
                    Operation::Delete { index: at, size },
                    Operation::Delete { index, size: more },
                ) if *at + *size == *index => {
                    *size += *more;
                    return;
                }
                _ => {}
            }
        }
        self.0.push(op);
    }

    /// Number of base characters consumed and text produced, as
    /// `(deleted, inserted)`
    pub fn footprint(&self) -> (usize, usize) {
        self.iter().fold((0, 0), |(deleted, inserted), op| match op {
            Operation::Insert { .. } => (deleted, inserted + op.len()),
            Operation::Delete { size, .. } => (deleted + size, inserted),
        })
    }

    /// Check ordering only: indices never move backwards and no operation
    /// starts inside a preceding delete.
    pub fn validate_order(&self) -> Result<(), OtError> {
        self.check(None)
    }

    /// Full check against a base of `base_len` characters: ordering, bounds,
    /// and no empty operations.
    pub fn validate(&self, base_len: usize) -> Result<(), OtError> {
        self.check(Some(base_len))
    }

    fn check(&self, base_len: Option<usize>) -> Result<(), OtError> {
        let mut cursor = 0;
        for (pos, op) in self.iter().enumerate() {
            if op.index() < cursor {
                return Err(OtError::malformed(
                    pos,
                    format!("index {} precedes the end of the previous operation ({})", op.index(), cursor),
                ));
            }
            if let Some(len) = base_len {
                if op.is_empty() {
                    return Err(OtError::malformed(pos, "empty operation"));
                }
                if op.end() > len {
                    return Err(OtError::malformed(
                        pos,
                        format!("operation reaches {} but the base has {} characters", op.end(), len),
                    ));
                }
            }
            cursor = op.end();
        }
        Ok(())
    }
}

impl From<Vec<Operation>> for EditScript {
    fn from(ops: Vec<Operation>) -> Self {
        Self(ops)
    }
}

impl FromIterator<Operation> for EditScript {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        let mut script = Self::new();
        for op in iter {
            script.push(op);
        }
        script
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
