//! Categorised merge for "Keep a Changelog" style documents.
//!
//! Only the named section (usually `## [Unreleased]`) is rebuilt. The template dictates the
//! header above it and the canonical category order; the destination supplies the list items
//! under each category and every release entry below the section, which is carried over
//! untouched.

use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::{branch_end, build_sections};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Canonical category sub-headings, in the order they are emitted.
pub const CATEGORIES: [&str; 6] = [
    "Added",
    "Changed",
    "Deprecated",
    "Removed",
    "Fixed",
    "Security",
];

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ \t]*)[-*+][ \t]+\S").unwrap());
static RELEASE_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##[ \t]+\[").unwrap());
static VERSION_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##[ \t]+\[\d+\.\d+\.\d+[^\]]*\]").unwrap());
static HORIZONTAL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

#[derive(Debug, Clone)]
/// Rebuilds one named changelog section from template structure and destination items.
pub struct ChangelogMerger {
    section: String,
}

impl Default for ChangelogMerger {
    fn default() -> Self {
        Self::new("Unreleased")
    }
}

/// A bullet line plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemBlock {
    lines: Vec<String>,
}

impl ItemBlock {
    /// Lines to emit, without trailing blank lines.
    fn trimmed(&self) -> &[String] {
        let keep = self
            .lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |last| last + 1);
        &self.lines[..keep]
    }
}

/// Item blocks bucketed by canonical category, in destination order.
#[derive(Debug, Default)]
struct Buckets {
    items: [Vec<ItemBlock>; CATEGORIES.len()],
}

/// A fence opened inside an item block.
struct ItemFence {
    /// Line that closes the fence.
    closer: String,
    /// Whether a closing fence follows somewhere in the section body.
    terminated: bool,
}

struct OpenItem {
    category: usize,
    indent: usize,
    fence: Option<ItemFence>,
    block: ItemBlock,
}

impl OpenItem {
    /// The finished block, with a fence left open at the end of the item closed.
    fn finish(self) -> ItemBlock {
        let mut block = self.block;
        if let Some(fence) = self.fence {
            let keep = block.trimmed().len();
            block.lines.truncate(keep);
            block.lines.push(fence.closer);
        }
        block
    }
}

impl ChangelogMerger {
    /// Merge the section headed `## [<section>]` (matched case-insensitively).
    #[must_use]
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }

    /// Merge `destination`'s items and history into `template`'s structure.
    ///
    /// Returns the template unchanged when the destination is empty, and the template with
    /// only release headings normalised when the template lacks the named section.
    #[must_use]
    pub fn merge(&self, template: &str, destination: &str) -> String {
        if destination.trim().is_empty() {
            return template.to_string();
        }

        let template_lines: Vec<&str> = template.lines().collect();
        let Some(heading_index) = self.find_heading(&template_lines) else {
            debug!(section = %self.section, "Template has no such changelog section");
            return normalize_release_headings(template);
        };
        let template_body = section_body(&template_lines, heading_index);

        let dest_lines: Vec<&str> = destination.lines().collect();
        let (dest_body, tail): (&[&str], &[&str]) = match self.find_heading(&dest_lines) {
            Some(index) => {
                let body = section_body(&dest_lines, index);
                let after = index + 1 + body.len();
                (body, &dest_lines[after.min(dest_lines.len())..])
            }
            None => {
                let history = dest_lines
                    .iter()
                    .position(|line| RELEASE_HEADING_RE.is_match(line))
                    .unwrap_or(dest_lines.len());
                (&[], &dest_lines[history..])
            }
        };

        let buckets = parse_buckets(dest_body);

        let mut output: Vec<String> = template_lines[..=heading_index]
            .iter()
            .map(|line| (*line).to_string())
            .collect();
        for (category, label) in CATEGORIES.iter().enumerate() {
            let subheading = template_body
                .iter()
                .find(|line| category_of(line) == Some(category))
                .map_or_else(|| format!("### {label}"), |line| (*line).to_string());
            output.push(subheading);
            for item in &buckets.items[category] {
                output.extend(item.trimmed().iter().cloned());
            }
        }

        join_with_tail(&output, tail)
    }

    fn find_heading(&self, lines: &[&str]) -> Option<usize> {
        let wanted = self.section.to_lowercase();
        let format = MarkdownFormat;
        let mut in_fence = false;
        lines.iter().position(|line| {
            if format.is_fence(line) {
                in_fence = !in_fence;
                return false;
            }
            !in_fence
                && format.heading(line).is_some_and(|(_, text)| {
                    text.trim()
                        .strip_prefix('[')
                        .and_then(|rest| rest.split_once(']'))
                        .is_some_and(|(name, _)| name.trim().to_lowercase() == wanted)
                })
        })
    }
}

/// Lines after the heading at `index` up to the end of its branch.
///
/// The body also stops at the next release heading, so a fence left open inside the
/// section cannot swallow the release history below it.
fn section_body<'a>(lines: &'a [&'a str], index: usize) -> &'a [&'a str] {
    let sections = build_sections(lines, &MarkdownFormat);
    let Some(position) = sections.iter().position(|section| section.start_line == index) else {
        return &[];
    };
    let end = branch_end(&sections, position, lines.len());
    if end <= index {
        return &[];
    }
    let body = &lines[index + 1..=end];
    let release = body
        .iter()
        .position(|line| RELEASE_HEADING_RE.is_match(line))
        .unwrap_or(body.len());
    &body[..release]
}

fn join_with_tail(section: &[String], tail: &[&str]) -> String {
    let first = tail.iter().position(|line| !line.trim().is_empty());
    let last = tail.iter().rposition(|line| !line.trim().is_empty());

    let mut text = section.join("\n");
    text.push('\n');
    if let (Some(first), Some(last)) = (first, last) {
        text.push('\n');
        text.push_str(&tail[first..=last].join("\n"));
        text.push('\n');
    }
    normalize_release_headings(&text)
}

/// Index into [`CATEGORIES`] if `line` is a canonical category sub-heading.
fn category_of(line: &str) -> Option<usize> {
    let (level, text) = MarkdownFormat.heading(line)?;
    if level < 3 {
        return None;
    }
    let name = text.trim_matches(|c: char| !c.is_alphanumeric());
    CATEGORIES
        .iter()
        .position(|label| label.eq_ignore_ascii_case(name))
}

fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Bucket the destination section body's list items by category.
fn parse_buckets(body: &[&str]) -> Buckets {
    let mut buckets = Buckets::default();
    let mut category: Option<usize> = None;
    let mut open: Option<OpenItem> = None;
    let mut stray_fence = false;

    for (index, line) in body.iter().enumerate() {
        let closed_later = || {
            body[index + 1..]
                .iter()
                .any(|next| MarkdownFormat.is_fence(next))
        };

        if let Some(item) = open.as_mut() {
            if continues(item, line) {
                if MarkdownFormat.is_fence(line) {
                    item.fence = match item.fence {
                        Some(_) => None,
                        None => Some(ItemFence {
                            closer: MarkdownFormat.closing_fence(line),
                            terminated: closed_later(),
                        }),
                    };
                }
                item.block.lines.push((*line).to_string());
                continue;
            }
            if let Some(done) = open.take() {
                buckets.items[done.category].push(done.finish());
            }
        }

        if MarkdownFormat.is_fence(line) {
            // A fence that never closes would hide every category below it.
            if stray_fence || closed_later() {
                stray_fence = !stray_fence;
            }
            debug!(line, "Dropping fence outside a list item");
            continue;
        }
        if stray_fence {
            continue;
        }

        if MarkdownFormat.heading(line).is_some() {
            category = category_of(line);
            if category.is_none() {
                debug!(line, "Dropping unrecognised changelog sub-heading");
            }
            continue;
        }

        if let Some(captures) = BULLET_RE.captures(line) {
            match category {
                Some(category) => {
                    let indent = captures.get(1).map_or(0, |m| indent_of(m.as_str()));
                    open = Some(OpenItem {
                        category,
                        indent,
                        fence: None,
                        block: ItemBlock {
                            lines: vec![(*line).to_string()],
                        },
                    });
                }
                None => debug!(line, "Dropping item outside a known category"),
            }
        } else if !line.trim().is_empty() {
            debug!(line, "Dropping content outside a list item");
        }
    }

    if let Some(done) = open {
        buckets.items[done.category].push(done.finish());
    }
    buckets
}

/// Whether `line` belongs to the open item block.
///
/// Inside a fence that closes later everything belongs to the item. Inside a fence that
/// never closes, a canonical category sub-heading still ends the item.
fn continues(item: &OpenItem, line: &str) -> bool {
    if let Some(fence) = &item.fence {
        return fence.terminated || category_of(line).is_none();
    }
    if line.trim().is_empty() {
        return true;
    }
    if MarkdownFormat.heading(line).is_some() {
        return false;
    }
    let indent = indent_of(line);
    if MarkdownFormat.is_fence(line) {
        return indent >= item.indent;
    }
    indent > item.indent
}

/// Collapse runs of horizontal whitespace inside version-release headings (`## [x.y.z]`).
#[must_use]
pub fn normalize_release_headings(text: &str) -> String {
    let mut output: Vec<String> = text
        .lines()
        .map(|line| {
            if VERSION_HEADING_RE.is_match(line) {
                HORIZONTAL_RUN_RE.replace_all(line.trim_end(), " ").into_owned()
            } else {
                line.to_string()
            }
        })
        .collect();
    if text.ends_with('\n') {
        output.push(String::new());
    }
    output.join("\n")
}

#[cfg(test)]
#[path = "tests/changelog.rs"]
mod tests;
