//! Configuration to acknowledge project preferences as well as set defaults.
//!
//! Specifically, we try to find a reapply.toml, and if present we load settings from there.
//! This decides which markdown sections and script fields belong to the user.

use crate::branch_merge::PreservePolicy;
use crate::changelog::ChangelogMerger;
use crate::error::Error;
use crate::splice::SplicePolicy;
use facet::Facet;
use std::fs;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "reapply.toml";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// Merge preferences loaded from reapply.toml or falling back to defaults.
pub struct Config {
    #[facet(default = default_preserved_sections())]
    /// Markdown section keys whose branches keep the destination's content.
    pub preserved_sections: Vec<String>,
    #[facet(default = vec!["note".to_string()])]
    /// Key prefixes (case-insensitive) that also keep the destination's content.
    pub preserved_prefixes: Vec<String>,
    #[facet(default = "Unreleased".to_string())]
    /// Bracketed changelog section rebuilt from the template.
    pub changelog_section: String,
    #[facet(default = vec!["summary".to_string(), "description".to_string()])]
    /// Script fields whose template placeholders are never inserted.
    pub freeform_fields: Vec<String>,
    #[facet(default = "version".to_string())]
    /// Script field after which new fields are inserted; empty to append at the end.
    pub anchor_field: String,
}

fn default_preserved_sections() -> Vec<String> {
    ["synopsis", "configuration", "basic usage"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    /// Every field at its `#[facet(default)]` value.
    fn default() -> Self {
        facet_toml::from_str::<Self>("").unwrap_or_else(|error| {
            tracing::warn!(%error, "Default configuration did not deserialise");
            Self {
                preserved_sections: Vec::new(),
                preserved_prefixes: Vec::new(),
                changelog_section: String::new(),
                freeform_fields: Vec::new(),
                anchor_field: String::new(),
            }
        })
    }
}

impl Config {
    #[must_use]
    /// Load configuration from reapply.toml if present and valid.
    pub fn load() -> Self {
        if Path::new(CONFIG_FILE).exists() {
            match Self::load_from(CONFIG_FILE) {
                Ok(config) => return config,
                Err(error) => tracing::warn!(%error, "Falling back to default configuration"),
            }
        }
        Self::default()
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for this schema.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        facet_toml::from_str::<Self>(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    #[must_use]
    /// Section preservation rules for markdown merges.
    pub fn preserve_policy(&self) -> PreservePolicy {
        PreservePolicy::new(&self.preserved_sections).with_prefixes(&self.preserved_prefixes)
    }

    #[must_use]
    /// Changelog merger for the configured section.
    pub fn changelog_merger(&self) -> ChangelogMerger {
        ChangelogMerger::new(self.changelog_section.clone())
    }

    #[must_use]
    /// Field splicing rules for script merges.
    pub fn splice_policy(&self) -> SplicePolicy {
        SplicePolicy {
            freeform_fields: self.freeform_fields.clone(),
            anchor_field: Some(self.anchor_field.clone()).filter(|field| !field.is_empty()),
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
