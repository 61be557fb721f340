//! Error types surfaced to callers.
//!
//! The merge operations themselves never fail: malformed input degrades to returning one of
//! the inputs unchanged. Errors only arise at the edges, when reading files, loading
//! configuration, parsing a script to find its declaration block, or interpreting CLI input.

use std::path::PathBuf;
use thiserror::Error;

/// Failures at the I/O, configuration and parsing edges of the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read or written.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but is not valid.
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The script grammar could not be loaded into the parser.
    #[error("Failed to load script grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser produced no syntax tree for the script.
    #[error("Failed to parse script")]
    Unparseable,

    /// The script has no declaration block to splice into.
    #[error("No declaration block found in script")]
    MissingBlock,

    /// A `field=value` argument was malformed.
    #[error("Invalid field assignment {0:?}, expected FIELD=VALUE")]
    InvalidAssignment(String),
}

impl Error {
    /// Wrap an I/O failure with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
