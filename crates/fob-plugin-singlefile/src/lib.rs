//! Rolldown plugin that produces single-file HTML builds
//!
//! After bundling, every HTML document in the output gets its module scripts
//! and stylesheets embedded inline, and the embedded files are dropped from
//! the output. The result is one self-contained `.html` file per entry point.
//!
//! ## Architecture
//!
//! ```text
//! generate_bundle() → OutputSet → classify → per document: match → embed
//!                                          → prune → report → Rolldown bundle
//! ```
//!
//! The core works on an in-memory [`OutputSet`] and never touches the
//! filesystem, so it can be driven without Rolldown as well.
//!
//! ## Matching references
//!
//! Scripts and stylesheets are found by exact text match on the tags the
//! bundler emits:
//!
//! ```html
//! <script type="module" crossorigin src="app.js"></script>
//! <link rel="stylesheet" crossorigin href="style.css">
//! ```
//!
//! Hand-written or reformatted tags are left alone and the asset is reported
//! as not inlined.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_singlefile::{FobSingleFilePlugin, SingleFileOptions};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = SingleFileOptions::new().with_inline_pattern("*.{js,css}");
//! let plugin = Arc::new(FobSingleFilePlugin::new(options)?);
//! // Add to your Rolldown bundler configuration
//! # Ok(())
//! # }
//! ```
//!
//! Driving the core directly:
//!
//! ```rust
//! use fob_plugin_singlefile::{
//!     CollectingReporter, Inliner, OutputEntry, OutputSet, SingleFileOptions,
//! };
//!
//! let mut set: OutputSet = [
//!     OutputEntry::asset(
//!         "index.html",
//!         r#"<script type="module" crossorigin src="app.js"></script>"#,
//!     ),
//!     OutputEntry::chunk("app.js", "console.log(1)"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let inliner = Inliner::new(&SingleFileOptions::default()).unwrap();
//! let summary = inliner.run(&mut set, &mut CollectingReporter::new());
//!
//! assert_eq!(summary.deleted, vec!["app.js"]);
//! assert_eq!(
//!     set.get("index.html").and_then(OutputEntry::text),
//!     Some(r#"<script type="module">console.log(1)</script>"#)
//! );
//! ```

mod classify;
mod config;
mod embed;
mod error;
mod matcher;
mod output;
mod pipeline;
mod plugin;
mod recommended;
mod report;

pub use classify::{AssetKind, Classification, classify};
pub use config::{ENV_PREFIX, SingleFileOptions};
pub use embed::{
    embed_css, embed_script, sanitize_script, script_reference_tag, strip_charset,
    stylesheet_reference_tag,
};
pub use error::{Result, SingleFileError};
pub use matcher::{InlineMatcher, is_eligible};
pub use output::{AssetSource, OutputEntry, OutputSet};
pub use pipeline::{InlineSummary, Inliner, prune};
pub use plugin::{FobSingleFilePlugin, inline_bundle};
pub use recommended::RecommendedBuildConfig;
pub use report::{CollectingReporter, Notice, Reporter, SkipReason, TracingReporter};
