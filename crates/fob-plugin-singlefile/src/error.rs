//! Error types for the single-file plugin
//!
//! Inlining itself never fails: every problem during a run degrades to a
//! [`Notice`](crate::Notice). These errors only surface while building the
//! plugin from its configuration.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SingleFileError>;

/// Errors raised while configuring the single-file plugin
#[derive(Error, Debug, Diagnostic)]
pub enum SingleFileError {
    /// An entry of `inlinePattern` is not a valid glob
    #[error("invalid inline pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(fob::singlefile::invalid_pattern),
        help("Inline patterns are globs, e.g. \"*.js\", \"**/*.css\", \"*.@(js|css)\" or \"!*.map\"")
    )]
    InvalidPattern { pattern: String, reason: String },

    /// Options could not be extracted from the configuration sources
    #[error("failed to load single-file options: {0}")]
    #[diagnostic(
        code(fob::singlefile::config),
        help("Check the `useRecommendedBuildConfig`, `inlinePattern` and `deleteInlinedFiles` keys")
    )]
    Config(#[from] Box<figment::Error>),
}

impl SingleFileError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<figment::Error> for SingleFileError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}
