//! Build settings that make a bundle fully inlinable
//!
//! The plugin only rewrites finished output; whether that output consists of
//! one script and one stylesheet per document is decided earlier by the build
//! configuration. Hosts that honour `useRecommendedBuildConfig` read these
//! settings and apply them to their bundler before building.

use serde::{Deserialize, Serialize};

/// Recommended bundler settings for single-file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedBuildConfig {
    /// Inline every imported asset into the JavaScript, regardless of size
    pub inline_all_assets: bool,

    /// Chunk size warning threshold in kB; `None` disables the warning
    pub chunk_size_warning_limit: Option<u64>,

    /// Emit all CSS as a single stylesheet instead of one per chunk
    pub css_code_split: bool,

    /// Public base path; relative so files copied from `public/` still resolve
    pub base: String,

    /// Directory for emitted assets, relative to the output dir; empty means the root
    pub assets_dir: String,

    /// Inject the module preload polyfill
    pub module_preload_polyfill: bool,

    /// Fold dynamic imports into their importing chunk
    pub inline_dynamic_imports: bool,

    /// Clear custom entry/chunk/asset file name templates
    pub reset_file_name_templates: bool,
}

impl Default for RecommendedBuildConfig {
    fn default() -> Self {
        Self {
            inline_all_assets: true,
            chunk_size_warning_limit: None,
            css_code_split: false,
            base: "./".to_string(),
            assets_dir: String::new(),
            module_preload_polyfill: false,
            inline_dynamic_imports: true,
            reset_file_name_templates: true,
        }
    }
}
