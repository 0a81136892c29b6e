//! Inlining diagnostics
//!
//! The inliner never fails on a bad asset; it tells a [`Reporter`] instead.
//! Reporters are handed to each run explicitly, so hosts and tests can collect
//! notices without touching a global log.

use std::fmt;

use tracing::debug;

/// Why an asset was not inlined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Did not match any `inlinePattern`
    Excluded,
    /// The document has no canonical reference tag for the asset
    TagNotFound,
    /// Content is binary and cannot be embedded as text
    BinaryContent,
    /// Neither a script nor a stylesheet
    UnsupportedKind,
    /// The output contains no markup document to inline into
    NoDocument,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Excluded => "excluded by inline pattern",
            SkipReason::TagNotFound => "reference tag not found",
            SkipReason::BinaryContent => "binary content",
            SkipReason::UnsupportedKind => "unsupported asset kind",
            SkipReason::NoDocument => "no html document",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic emitted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// `asset` was embedded into `document`
    Inlined { asset: String, document: String },
    /// `asset` was not embedded into `document`
    Skipped {
        asset: String,
        document: String,
        reason: SkipReason,
    },
    /// `asset` ended the run without being embedded anywhere
    NotInlined { asset: String, reason: SkipReason },
}

impl Notice {
    pub fn asset(&self) -> &str {
        match self {
            Notice::Inlined { asset, .. }
            | Notice::Skipped { asset, .. }
            | Notice::NotInlined { asset, .. } => asset,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Inlined { asset, document } => write!(f, "Inlining: {asset} -> {document}"),
            Notice::Skipped {
                asset,
                document,
                reason,
            } => write!(f, "Skipped {asset} in {document}: {reason}"),
            Notice::NotInlined { asset, reason } => {
                write!(f, "NOTE: asset not inlined: {asset} ({reason})")
            }
        }
    }
}

/// Sink for inlining notices
pub trait Reporter {
    fn notice(&mut self, notice: Notice);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn notice(&mut self, notice: Notice) {
        (**self).notice(notice)
    }
}

const TARGET: &str = "fob::singlefile";

/// Forwards notices to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn notice(&mut self, notice: Notice) {
        match &notice {
            Notice::Inlined { asset, document } => {
                debug!(target: TARGET, asset = %asset, document = %document, "inlined asset");
            }
            Notice::Skipped {
                asset,
                document,
                reason,
            } => {
                debug!(
                    target: TARGET,
                    asset = %asset,
                    document = %document,
                    reason = %reason,
                    "skipped asset"
                );
            }
            Notice::NotInlined { asset, reason } => {
                debug!(target: TARGET, asset = %asset, reason = %reason, "asset not inlined");
            }
        }
    }
}

/// Keeps every notice in order
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    notices: Vec<Notice>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Names reported as [`Notice::NotInlined`], in report order
    pub fn not_inlined(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::NotInlined { asset, .. } => Some(asset.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names reported as [`Notice::Inlined`], in report order
    pub fn inlined(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Inlined { asset, .. } => Some(asset.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
