//! Single-file plugin configuration
//!
//! Options can be built in Rust with the `with_*` builders or extracted from a
//! [`Figment`], which lets hosts layer TOML/JSON files and `FOB_SINGLEFILE_*`
//! environment variables over the defaults.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::recommended::RecommendedBuildConfig;

/// Environment variable prefix read by [`SingleFileOptions::figment`]
pub const ENV_PREFIX: &str = "FOB_SINGLEFILE_";

/// Configuration for [`FobSingleFilePlugin`](crate::FobSingleFilePlugin)
///
/// Keys are camelCase (`inlinePattern`); snake_case spellings
/// (`inline_pattern`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleFileOptions {
    /// Ask the host to apply [`RecommendedBuildConfig`] before bundling
    #[serde(alias = "use_recommended_build_config")]
    pub use_recommended_build_config: bool,

    /// Only inline assets matching these globs (`!glob` excludes); empty inlines everything
    #[serde(alias = "inline_pattern")]
    pub inline_pattern: Vec<String>,

    /// Remove inlined assets from the bundle once embedded
    #[serde(alias = "delete_inlined_files")]
    pub delete_inlined_files: bool,
}

impl Default for SingleFileOptions {
    fn default() -> Self {
        Self {
            use_recommended_build_config: true,
            inline_pattern: Vec::new(),
            delete_inlined_files: true,
        }
    }
}

impl SingleFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glob to the inline allow-list
    pub fn with_inline_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.inline_pattern.push(pattern.into());
        self
    }

    /// Replace the inline allow-list
    pub fn with_inline_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inline_pattern = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delete_inlined_files(mut self, enabled: bool) -> Self {
        self.delete_inlined_files = enabled;
        self
    }

    pub fn with_recommended_build_config(mut self, enabled: bool) -> Self {
        self.use_recommended_build_config = enabled;
        self
    }

    /// Default figment: built-in defaults overlaid with `FOB_SINGLEFILE_*` env vars
    ///
    /// Hosts can merge further providers (a `fob.toml` section, CLI flags)
    /// before calling [`SingleFileOptions::from_figment`].
    pub fn figment() -> Figment {
        let env = Env::prefixed(ENV_PREFIX)
            .map(|key| env_key_to_field(key.as_str()).into())
            .lowercase(false);
        Figment::from(Serialized::defaults(Self::default())).merge(env)
    }

    /// Extract options from an arbitrary figment
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Parse options from a TOML document, falling back to defaults for missing keys
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(source));
        Self::from_figment(&figment)
    }

    /// Build settings the host should apply, if requested
    pub fn recommended_build_config(&self) -> Option<RecommendedBuildConfig> {
        self.use_recommended_build_config
            .then(RecommendedBuildConfig::default)
    }
}

/// `DELETE_INLINED_FILES` -> `deleteInlinedFiles`
fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !field.is_empty();
        } else if upper_next {
            field.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            field.push(ch.to_ascii_lowercase());
        }
    }
    field
}
