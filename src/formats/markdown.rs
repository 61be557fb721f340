//! Markdown format implementation for ATX-style headings (# syntax).
//!
//! Setext headings are not recognised: template documents only ever use ATX headings, and
//! a `---` underline is far more likely to be a thematic break in a changelog.

use crate::formats::Format;
use once_cell::sync::Lazy;
use regex::Regex;

static ATX_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").unwrap());

/// Line conventions for ATX-style markdown headings and backtick/tilde fences.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn heading<'a>(&self, line: &'a str) -> Option<(usize, &'a str)> {
        let captures = ATX_HEADING_RE.captures(line)?;
        let level = captures.get(1)?.as_str().len();
        let text = captures.get(2)?.as_str();
        if text.is_empty() {
            return None;
        }
        Some((level, text))
    }

    fn is_fence(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with("```") || trimmed.starts_with("~~~")
    }

    fn closing_fence(&self, opener: &str) -> String {
        let trimmed = opener.trim_start();
        let indent = &opener[..opener.len() - trimmed.len()];
        let marker = trimmed.chars().next().unwrap_or('`');
        let run = trimmed.chars().take_while(|c| *c == marker).count().max(3);
        format!("{indent}{}", marker.to_string().repeat(run))
    }
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
