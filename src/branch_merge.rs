//! Branch-preserving merge for heading-delimited documents.
//!
//! The template supplies the document structure. Sections the user is known to customise
//! (by key, or by a key predicate such as a `note` prefix) keep the destination's branch:
//! everything under the heading, nested subsections included, is taken verbatim from the
//! destination. The first top-level heading line is also taken from the destination so that
//! decoration the author added to the title survives.

use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::{branch_end, build_sections, find_section, unclosed_fence, Section};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Decides which section keys keep the destination's content.
pub struct PreservePolicy {
    keys: BTreeSet<String>,
    predicate: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl fmt::Debug for PreservePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreservePolicy")
            .field("keys", &self.keys)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl PreservePolicy {
    /// Preserve sections whose normalised key is one of `keys`.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|key| crate::section::heading_key(key.as_ref()))
                .collect(),
            predicate: None,
        }
    }

    #[must_use]
    /// Additionally preserve any section whose key satisfies `predicate`.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    #[must_use]
    /// Additionally preserve sections whose key starts with any of `prefixes`, ignoring case.
    pub fn with_prefixes<I, S>(self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|prefix| prefix.as_ref().to_lowercase())
            .filter(|prefix| !prefix.is_empty())
            .collect();
        if prefixes.is_empty() {
            return self;
        }
        self.with_predicate(move |key| {
            let key = key.to_lowercase();
            prefixes.iter().any(|prefix| key.starts_with(prefix.as_str()))
        })
    }

    /// Whether the section with this key keeps the destination's branch.
    #[must_use]
    pub fn preserves(&self, key: &str) -> bool {
        self.keys.contains(key) || self.predicate.as_ref().is_some_and(|pred| pred(key))
    }
}

/// Merge `destination` into the already-merged `template`, keeping preserved branches.
///
/// An empty destination returns the template unchanged. A preserved section missing from
/// the destination is emptied to its heading plus two blank lines rather than keeping stale
/// template content.
#[must_use]
pub fn merge_branches(template: &str, destination: &str, policy: &PreservePolicy) -> String {
    if destination.trim().is_empty() {
        return template.to_string();
    }

    let format = MarkdownFormat;
    let dest_lines: Vec<&str> = destination.lines().collect();
    let dest_sections = build_sections(&dest_lines, &format);

    let mut merged: Vec<String> = template.lines().map(str::to_string).collect();
    let template_sections = {
        let borrowed: Vec<&str> = merged.iter().map(String::as_str).collect();
        build_sections(&borrowed, &format)
    };

    for (start, end, section) in preserved_targets(&template_sections, merged.len(), policy)
        .into_iter()
        .rev()
    {
        let replacement = match find_section(&dest_sections, &section.key) {
            Some(index) => {
                let found = &dest_sections[index];
                if found.level != section.level {
                    debug!(
                        key = %section.key,
                        template_level = section.level,
                        destination_level = found.level,
                        "Preserved section changes level"
                    );
                }
                let branch = Section::branch(&dest_sections, index, dest_lines.len());
                destination_body(&dest_lines[branch], &format)
            }
            None => {
                debug!(key = %section.key, "Preserved section absent from destination");
                vec![String::new(), String::new()]
            }
        };
        merged.splice(start + 1..=end, replacement);
    }

    replace_title(&mut merged, &dest_sections, &dest_lines);

    let mut output = merged.join("\n");
    if template.ends_with('\n') && !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Body lines of a destination branch (heading excluded), ending outside any fence.
///
/// A fence left open would hide every template heading spliced in after it.
fn destination_body<F: Format>(branch: &[&str], format: &F) -> Vec<String> {
    let body = branch.get(1..).unwrap_or_default();
    let mut lines: Vec<String> = body.iter().map(|line| (*line).to_string()).collect();
    if let Some(opener) = unclosed_fence(body, format) {
        debug!(opener, "Closing fence left open in preserved section");
        lines.push(format.closing_fence(opener));
    }
    lines
}

/// Preserved sections as `(start, end, section)` in document order, outermost only.
fn preserved_targets<'a>(
    sections: &'a [Section],
    total_lines: usize,
    policy: &PreservePolicy,
) -> Vec<(usize, usize, &'a Section)> {
    let mut targets: Vec<(usize, usize, &Section)> = Vec::new();
    for (index, section) in sections.iter().enumerate() {
        if !policy.preserves(&section.key) {
            continue;
        }
        if targets
            .last()
            .is_some_and(|(_, end, _)| section.start_line <= *end)
        {
            continue;
        }
        let end = branch_end(sections, index, total_lines).max(section.start_line);
        targets.push((section.start_line, end, section));
    }
    targets
}

/// Swap in the destination's first top-level heading line verbatim.
fn replace_title(merged: &mut [String], dest_sections: &[Section], dest_lines: &[&str]) {
    let Some(dest_title) = dest_sections.iter().find(|section| section.level == 1) else {
        return;
    };
    let merged_sections = {
        let borrowed: Vec<&str> = merged.iter().map(String::as_str).collect();
        build_sections(&borrowed, &MarkdownFormat)
    };
    if let Some(title) = merged_sections.iter().find(|section| section.level == 1) {
        merged[title.start_line] = dest_lines[dest_title.start_line].to_string();
    }
}

#[cfg(test)]
#[path = "tests/branch_merge.rs"]
mod tests;
