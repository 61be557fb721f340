//! reapply: re-apply scaffolding templates without clobbering local edits.
//!
//! A template document is reconciled with a previously customised destination of the same
//! kind. Markdown documents adopt the template's sections while keeping the branches the
//! user owns, changelogs have their unreleased section rebuilt in canonical category order,
//! and gemspec-style scripts have individual field declarations spliced in place.

pub mod branch_merge;
pub mod changelog;
pub mod config;
pub mod edit_plan;
pub mod error;
pub mod formats;
pub mod normalize;
pub mod report;
pub mod ruby;
pub mod script;
pub mod section;
pub mod splice;

pub use branch_merge::{merge_branches, PreservePolicy};
pub use changelog::ChangelogMerger;
pub use error::Error;
pub use splice::{remove_dependency, splice_fields, splice_script, FieldUpdate, SplicePolicy};
