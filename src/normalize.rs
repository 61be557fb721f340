//! Light line-level clean-up applied to merged output before it is written.

use once_cell::sync::Lazy;
use regex::Regex;

static MAGIC_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[ \t]*[A-Za-z][\w-]*:[ \t]*\S+[ \t]*$").unwrap());

/// End `text` with exactly one newline. Empty text stays empty.
#[must_use]
pub fn ensure_trailing_newline(text: &str) -> String {
    let trimmed = text.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{trimmed}\n")
}

/// Drop repeated magic comments from the leading comment block.
///
/// Merging two scripts that both start with `# frozen_string_literal: true` tends to stack
/// the pragma; only its first occurrence is kept, and blank lines directly after the block
/// collapse to one.
#[must_use]
pub fn collapse_magic_comments(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut seen: Vec<&str> = Vec::new();
    let mut output: Vec<&str> = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        if MAGIC_COMMENT_RE.is_match(line) {
            let normalized = line.trim();
            if !seen.contains(&normalized) {
                seen.push(normalized);
                output.push(line);
            }
        } else if line.trim().is_empty() && !seen.is_empty() {
            let next = lines[index..]
                .iter()
                .position(|line| !line.trim().is_empty())
                .map_or(lines.len(), |offset| index + offset);
            let more_magic = next < lines.len() && MAGIC_COMMENT_RE.is_match(lines[next]);
            if !more_magic {
                output.push("");
                output.extend_from_slice(&lines[next..]);
                break;
            }
            index = next;
            continue;
        } else {
            output.extend_from_slice(&lines[index..]);
            break;
        }
        index += 1;
    }

    let mut result = output.join("\n");
    if text.ends_with('\n') && !result.is_empty() {
        result.push('\n');
    }
    result
}

#[cfg(test)]
#[path = "tests/normalize.rs"]
mod tests;
