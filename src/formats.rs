//! Format trait and implementations for heading-delimited document types.
//!
//! This module defines the `Format` trait which abstracts over the line conventions of
//! different document formats (markdown today, org-mode or restructuredtext later) by
//! recognising heading lines and the fence lines that open and close opaque regions.

pub mod markdown;

/// Line-level conventions of a heading-delimited document.
pub trait Format {
    /// Recognise a heading line, returning its nesting level and raw heading text.
    fn heading<'a>(&self, line: &'a str) -> Option<(usize, &'a str)>;
    /// Whether this line toggles an opaque (fenced) region on or off.
    fn is_fence(&self, line: &str) -> bool;
    /// Line that closes the fenced region opened by `opener`.
    fn closing_fence(&self, opener: &str) -> String;
}
