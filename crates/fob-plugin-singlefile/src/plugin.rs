//! Rolldown integration
//!
//! [`FobSingleFilePlugin`] runs the [`Inliner`] from the `generate_bundle`
//! hook, after every other plugin has produced its output. The bundle is
//! mirrored into an [`OutputSet`], rewritten, and the changes are applied back
//! to Rolldown's output list in place.

use std::borrow::Cow;
use std::sync::Arc;

use rolldown_common::{Output, OutputAsset, StrOrBytes};
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, HookUsage, Plugin, PluginContext};

use crate::config::SingleFileOptions;
use crate::error::Result;
use crate::output::{AssetSource, OutputEntry, OutputSet};
use crate::pipeline::{InlineSummary, Inliner};
use crate::recommended::RecommendedBuildConfig;
use crate::report::{Reporter, TracingReporter};

/// Rolldown plugin that inlines scripts and stylesheets into HTML outputs
#[derive(Debug, Clone)]
pub struct FobSingleFilePlugin {
    options: SingleFileOptions,
    inliner: Inliner,
}

impl FobSingleFilePlugin {
    /// Create the plugin, validating `inlinePattern`
    pub fn new(options: SingleFileOptions) -> Result<Self> {
        let inliner = Inliner::new(&options)?;
        Ok(Self { options, inliner })
    }

    pub fn options(&self) -> &SingleFileOptions {
        &self.options
    }

    pub fn inliner(&self) -> &Inliner {
        &self.inliner
    }

    /// Settings the host should apply to its build, when enabled
    pub fn recommended_build_config(&self) -> Option<RecommendedBuildConfig> {
        self.options.recommended_build_config()
    }
}

impl Default for FobSingleFilePlugin {
    fn default() -> Self {
        Self {
            options: SingleFileOptions::default(),
            inliner: Inliner::with_matcher(Default::default(), true),
        }
    }
}

impl Plugin for FobSingleFilePlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-singlefile".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::GenerateBundle
    }

    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        // Pure in-memory rewrite; finish before handing back the future.
        inline_bundle(args.bundle, &self.inliner, &mut TracingReporter);
        async { Ok(()) }
    }
}

/// Run `inliner` over a Rolldown output list
///
/// Rewritten HTML assets are replaced with new assets carrying the inlined
/// source, removed entries are dropped, and everything else keeps its
/// position.
pub fn inline_bundle(
    bundle: &mut Vec<Output>,
    inliner: &Inliner,
    reporter: &mut dyn Reporter,
) -> InlineSummary {
    let mut set: OutputSet = bundle.iter().map(to_entry).collect();
    let summary = inliner.run(&mut set, reporter);

    bundle.retain(|output| set.contains(output_file_name(output)));
    for output in bundle.iter_mut() {
        let Output::Asset(asset) = output else {
            continue;
        };
        if !summary.documents.iter().any(|name| name == asset.filename.as_str()) {
            continue;
        }
        let Some(html) = set.get(asset.filename.as_str()).and_then(OutputEntry::text) else {
            continue;
        };
        let rewritten = OutputAsset {
            names: asset.names.clone(),
            original_file_names: asset.original_file_names.clone(),
            filename: asset.filename.clone(),
            source: html.to_string().into(),
        };
        *output = Output::Asset(Arc::new(rewritten));
    }

    summary
}

fn output_file_name(output: &Output) -> &str {
    match output {
        Output::Chunk(chunk) => chunk.filename.as_str(),
        Output::Asset(asset) => asset.filename.as_str(),
    }
}

fn to_entry(output: &Output) -> OutputEntry {
    match output {
        Output::Chunk(chunk) => OutputEntry::chunk(chunk.filename.as_str(), chunk.code.as_str()),
        Output::Asset(asset) => {
            let source = match &asset.source {
                StrOrBytes::Str(text) => AssetSource::Text(text.to_string()),
                StrOrBytes::Bytes(bytes) => AssetSource::Binary(bytes.to_vec()),
            };
            OutputEntry::asset(asset.filename.as_str(), source)
        }
    }
}
