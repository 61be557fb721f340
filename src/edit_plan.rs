//! The edit plan collects byte-range splices against an original text buffer.
//!
//! Edits are computed from syntax-tree coordinates and never overlap by construction. They
//! are applied from the highest offset to the lowest, so applying one edit never shifts the
//! offsets of the edits still waiting. All offsets are byte offsets into the UTF-8 buffer.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Replace `length` bytes at `offset` with `replacement`.
pub struct Edit {
    /// Byte offset where the edit begins.
    pub offset: usize,
    /// Number of bytes removed (zero for a pure insertion).
    pub length: usize,
    /// Text spliced in place of the removed bytes.
    pub replacement: String,
}

impl Edit {
    /// Replace the bytes in `start..end`.
    #[must_use]
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset: start,
            length: end.saturating_sub(start),
            replacement: replacement.into(),
        }
    }

    /// Insert `text` at `offset` without removing anything.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            length: 0,
            replacement: text.into(),
        }
    }

    /// Remove the bytes in `start..end`.
    #[must_use]
    pub fn remove(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    fn fits(&self, buffer: &str) -> bool {
        self.offset
            .checked_add(self.length)
            .is_some_and(|end| {
                end <= buffer.len()
                    && buffer.is_char_boundary(self.offset)
                    && buffer.is_char_boundary(end)
            })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Serialisable set of non-overlapping edits against one buffer.
pub struct EditPlan {
    /// Edits in the order they were collected.
    pub edits: Vec<Edit>,
}

impl EditPlan {
    /// Add an edit to the plan.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every edit to `original` and return the spliced text.
    ///
    /// Edits run in descending offset order. Insertions sharing an offset keep their
    /// collection order in the output. Edits that fall outside the buffer or would split a
    /// UTF-8 character are skipped.
    #[must_use]
    pub fn apply(&self, original: &str) -> String {
        let mut order: Vec<(usize, &Edit)> = self.edits.iter().enumerate().collect();
        order.sort_by(|(a_seq, a), (b_seq, b)| b.offset.cmp(&a.offset).then(b_seq.cmp(a_seq)));

        let mut text = original.to_string();
        // Bytes at or past `limit` have already been rewritten.
        let mut limit = original.len();
        for (_, edit) in order {
            if !edit.fits(original) || edit.offset + edit.length > limit {
                warn!(
                    offset = edit.offset,
                    length = edit.length,
                    buffer_len = original.len(),
                    "Skipping edit outside the buffer"
                );
                continue;
            }
            text.replace_range(edit.offset..edit.offset + edit.length, &edit.replacement);
            limit = edit.offset;
        }
        text
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
