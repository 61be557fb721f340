//! Section representation for heading-delimited documents.
//!
//! A section is a heading and the content it introduces. Sections are kept as a flat list in
//! document order; the hierarchy is implicit in their levels, and the line range a section
//! owns (its branch, including all nested subsections) is derived on demand rather than
//! stored. Heading-like lines inside fenced regions are never sections.

use crate::formats::Format;
use std::ops::RangeInclusive;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Heading position and identity within a document.
pub struct Section {
    /// Zero-based line index of the heading.
    pub start_line: usize,
    /// Nesting depth (1 for top-level).
    pub level: usize,
    /// Heading line exactly as it appears in the document.
    pub heading: String,
    /// Normalised heading text used to match sections across documents.
    pub key: String,
}

impl Section {
    /// Inclusive line range owned by the section at `index`, descendants included.
    #[must_use]
    pub fn branch(sections: &[Section], index: usize, total_lines: usize) -> RangeInclusive<usize> {
        sections[index].start_line..=branch_end(sections, index, total_lines)
    }
}

/// Scan `lines` once and collect heading sections outside fenced regions.
///
/// Fence state is a single toggle; an unterminated fence leaves the rest of the document
/// opaque.
pub fn build_sections<F: Format + ?Sized>(lines: &[&str], format: &F) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut in_fence = false;

    for (index, line) in lines.iter().enumerate() {
        if format.is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, text)) = format.heading(line) {
            sections.push(Section {
                start_line: index,
                level,
                heading: (*line).to_string(),
                key: heading_key(text),
            });
        }
    }

    sections
}

/// The fence line left open at the end of `lines`, if any.
pub fn unclosed_fence<'a, F: Format + ?Sized>(lines: &[&'a str], format: &F) -> Option<&'a str> {
    lines
        .iter()
        .filter(|line| format.is_fence(line))
        .fold(None, |open, line| match open {
            Some(_) => None,
            None => Some(*line),
        })
}

/// Last line (inclusive) of the branch of `sections[index]`.
///
/// This is the line before the next section at the same or a shallower level, or the last
/// line of the document when no such section follows.
#[must_use]
pub fn branch_end(sections: &[Section], index: usize, total_lines: usize) -> usize {
    let level = sections[index].level;
    sections[index + 1..]
        .iter()
        .find(|next| next.level <= level)
        .map_or(total_lines.saturating_sub(1), |next| {
            next.start_line.saturating_sub(1)
        })
}

/// Normalise heading text into a lookup key.
///
/// Leading and trailing decoration (emphasis markers, emoji, brackets) is stripped, then the
/// text is lower-cased with internal whitespace collapsed to single spaces.
#[must_use]
pub fn heading_key(text: &str) -> String {
    text.trim_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Index of the first section with the given key, if any.
#[must_use]
pub fn find_section(sections: &[Section], key: &str) -> Option<usize> {
    sections.iter().position(|section| section.key == key)
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
