//! Per-run record of what each merge did.
//!
//! The library's merge functions hold no state between calls; the caller owns one `Report`
//! for the lifetime of a run and records an outcome per file, which the CLI prints as JSON.

use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Merge strategy applied to a file.
pub enum Strategy {
    /// Branch-preserving markdown merge.
    Markdown,
    /// Categorised changelog merge.
    Changelog,
    /// Field-level script splice.
    Script,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// Result of merging one file.
pub struct Outcome {
    /// Destination path as given on the command line.
    pub path: String,
    /// Strategy used.
    pub strategy: Strategy,
    /// Whether the written content differs from the destination's previous content.
    pub changed: bool,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
/// Outcomes accumulated over one run.
pub struct Report {
    /// One entry per merged file, in processing order.
    pub outcomes: Vec<Outcome>,
}

impl Report {
    /// Record the outcome of merging `path`.
    pub fn record(
        &mut self,
        path: impl Into<String>,
        strategy: Strategy,
        before: &str,
        after: &str,
    ) {
        self.outcomes.push(Outcome {
            path: path.into(),
            strategy,
            changed: before != after,
        });
    }

    /// Number of files whose content changed.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.changed).count()
    }
}

#[cfg(test)]
#[path = "tests/report.rs"]
mod tests;
