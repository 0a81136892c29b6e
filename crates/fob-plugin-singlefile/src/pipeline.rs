//! The inlining pass over a finished output set
//!
//! ```text
//! classify ─▶ for each document:
//!               scripts: match ─▶ embed_script ─▶ record
//!               styles:  match ─▶ embed_css    ─▶ record
//!               commit
//!          ─▶ prune inlined assets ─▶ report leftovers
//! ```
//!
//! Deletion is deferred until every document has been processed, so an asset
//! inlined into one document is still available to the next.

use indexmap::{IndexMap, IndexSet};
use tracing::{info, warn};

use crate::classify::{AssetKind, classify};
use crate::config::SingleFileOptions;
use crate::embed::{embed_css, embed_script};
use crate::error::Result;
use crate::matcher::InlineMatcher;
use crate::output::{OutputEntry, OutputSet};
use crate::report::{Notice, Reporter, SkipReason};

/// What a run did to the output set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSummary {
    /// Documents whose content was rewritten
    pub documents: Vec<String>,
    /// Assets embedded into at least one document
    pub inlined: Vec<String>,
    /// Assets removed from the output set
    pub deleted: Vec<String>,
    /// Assets left standalone, with the last reason they were skipped
    pub not_inlined: Vec<(String, SkipReason)>,
}

impl InlineSummary {
    pub fn is_inlined(&self, asset: &str) -> bool {
        self.inlined.iter().any(|name| name == asset)
    }
}

/// Inlines scripts and stylesheets into every markup document of an output set
#[derive(Debug, Clone)]
pub struct Inliner {
    matcher: InlineMatcher,
    delete_inlined_files: bool,
}

impl Inliner {
    /// Build an inliner, compiling the inline patterns
    pub fn new(options: &SingleFileOptions) -> Result<Self> {
        Ok(Self {
            matcher: InlineMatcher::new(&options.inline_pattern)?,
            delete_inlined_files: options.delete_inlined_files,
        })
    }

    pub fn with_matcher(matcher: InlineMatcher, delete_inlined_files: bool) -> Self {
        Self {
            matcher,
            delete_inlined_files,
        }
    }

    pub fn matcher(&self) -> &InlineMatcher {
        &self.matcher
    }

    /// Rewrite every document in `set`, then prune and report
    ///
    /// Never fails: assets that cannot be inlined stay in the set and are
    /// reported as [`Notice::NotInlined`].
    pub fn run(&self, set: &mut OutputSet, reporter: &mut dyn Reporter) -> InlineSummary {
        let classification = classify(set.file_names());
        let mut summary = InlineSummary::default();
        let mut inlined: IndexSet<String> = IndexSet::new();
        let mut last_skip: IndexMap<String, SkipReason> = IndexMap::new();

        for document in &classification.markup {
            let Some(original) = set.get(document).and_then(OutputEntry::text) else {
                warn!(
                    document = %document,
                    "html document is not valid UTF-8, leaving it untouched"
                );
                continue;
            };
            let mut html = original.to_string();

            let candidates = classification
                .scripts
                .iter()
                .map(|name| (name, AssetKind::Script))
                .chain(classification.styles.iter().map(|name| (name, AssetKind::Style)));

            for (asset, kind) in candidates {
                match self.try_inline(set, &html, asset, kind) {
                    Ok(rewritten) => {
                        html = rewritten;
                        inlined.insert(asset.clone());
                        last_skip.shift_remove(asset);
                        reporter.notice(Notice::Inlined {
                            asset: asset.clone(),
                            document: document.clone(),
                        });
                    }
                    Err(reason) => {
                        if !inlined.contains(asset) {
                            last_skip.insert(asset.clone(), reason);
                        }
                        reporter.notice(Notice::Skipped {
                            asset: asset.clone(),
                            document: document.clone(),
                            reason,
                        });
                    }
                }
            }

            let changed = set.get(document).and_then(OutputEntry::text) != Some(html.as_str());
            if changed {
                set.set_text(document, html);
                summary.documents.push(document.clone());
            }
        }

        summary.deleted = prune(set, &inlined, self.delete_inlined_files);
        summary.inlined = inlined.iter().cloned().collect();

        for asset in classification.scripts.iter().chain(&classification.styles) {
            if inlined.contains(asset) {
                continue;
            }
            let reason = last_skip
                .get(asset)
                .copied()
                .unwrap_or(SkipReason::NoDocument);
            report_not_inlined(reporter, &mut summary, asset, reason);
        }
        for asset in &classification.other {
            report_not_inlined(reporter, &mut summary, asset, SkipReason::UnsupportedKind);
        }

        info!(
            documents = summary.documents.len(),
            inlined = summary.inlined.len(),
            deleted = summary.deleted.len(),
            not_inlined = summary.not_inlined.len(),
            "single-file inlining complete"
        );

        summary
    }

    /// Embed one asset into `html`, or say why not
    fn try_inline(
        &self,
        set: &OutputSet,
        html: &str,
        asset: &str,
        kind: AssetKind,
    ) -> std::result::Result<String, SkipReason> {
        if !self.matcher.is_eligible(asset) {
            return Err(SkipReason::Excluded);
        }

        let entry = set.get(asset).ok_or(SkipReason::TagNotFound)?;
        let code = entry.text().ok_or(SkipReason::BinaryContent)?;

        let rewritten = match kind {
            AssetKind::Script => embed_script(html, entry.file_name(), code),
            AssetKind::Style => embed_css(html, entry.file_name(), code),
            AssetKind::Markup | AssetKind::Other => return Err(SkipReason::UnsupportedKind),
        };

        if rewritten == html {
            Err(SkipReason::TagNotFound)
        } else {
            Ok(rewritten)
        }
    }
}

/// Remove inlined assets from `set` unless deletion is disabled
///
/// Returns the names actually removed.
pub fn prune(set: &mut OutputSet, inlined: &IndexSet<String>, enabled: bool) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    inlined
        .iter()
        .filter(|name| set.remove(name).is_some())
        .cloned()
        .collect()
}

fn report_not_inlined(
    reporter: &mut dyn Reporter,
    summary: &mut InlineSummary,
    asset: &str,
    reason: SkipReason,
) {
    reporter.notice(Notice::NotInlined {
        asset: asset.to_string(),
        reason,
    });
    summary.not_inlined.push((asset.to_string(), reason));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{script_reference_tag, stylesheet_reference_tag};
    use crate::report::CollectingReporter;

    fn html_with(tags: &[String]) -> String {
        format!("<html><head>{}</head><body></body></html>", tags.concat())
    }

    fn run(
        options: SingleFileOptions,
        set: &mut OutputSet,
    ) -> (InlineSummary, CollectingReporter) {
        let mut reporter = CollectingReporter::new();
        let summary = Inliner::new(&options).unwrap().run(set, &mut reporter);
        (summary, reporter)
    }

    fn document_text<'a>(set: &'a OutputSet, name: &str) -> &'a str {
        set.get(name).and_then(OutputEntry::text).unwrap()
    }

    #[test]
    fn test_inline_script_and_delete() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", script_reference_tag("app.js")),
            OutputEntry::chunk("app.js", "console.log(1)"),
        ]
        .into_iter()
        .collect();

        let (summary, reporter) = run(SingleFileOptions::default(), &mut set);

        assert_eq!(
            document_text(&set, "index.html"),
            r#"<script type="module">console.log(1)</script>"#
        );
        assert!(!set.contains("app.js"));
        assert_eq!(summary.inlined, vec!["app.js"]);
        assert_eq!(summary.deleted, vec!["app.js"]);
        assert_eq!(summary.documents, vec!["index.html"]);
        assert!(reporter.not_inlined().is_empty());
    }

    #[test]
    fn test_keep_inlined_files_when_deletion_disabled() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", script_reference_tag("app.js")),
            OutputEntry::chunk("app.js", "console.log(1)"),
        ]
        .into_iter()
        .collect();
        let before: Vec<String> = set.file_names().map(String::from).collect();

        let (summary, _) = run(
            SingleFileOptions::default().with_delete_inlined_files(false),
            &mut set,
        );

        assert_eq!(
            document_text(&set, "index.html"),
            r#"<script type="module">console.log(1)</script>"#
        );
        let after: Vec<String> = set.file_names().map(String::from).collect();
        assert_eq!(before, after);
        assert!(summary.deleted.is_empty());
        assert!(summary.is_inlined("app.js"));
    }

    #[test]
    fn test_inline_css_strips_charset() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", stylesheet_reference_tag("style.css")),
            OutputEntry::asset("style.css", "@charset \"UTF-8\";body{color:red}"),
        ]
        .into_iter()
        .collect();

        run(SingleFileOptions::default(), &mut set);

        assert_eq!(document_text(&set, "index.html"), "<style>body{color:red}</style>");
        assert!(!set.contains("style.css"));
    }

    #[test]
    fn test_inline_pattern_excludes() {
        let html = html_with(&[
            script_reference_tag("app.js"),
            stylesheet_reference_tag("vendor.css"),
        ]);
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", html),
            OutputEntry::chunk("app.js", "run()"),
            OutputEntry::asset("vendor.css", "a{}"),
        ]
        .into_iter()
        .collect();

        let options = SingleFileOptions::default().with_inline_pattern("*.js");
        let (summary, reporter) = run(options, &mut set);

        let document = document_text(&set, "index.html");
        assert!(document.contains(r#"<script type="module">run()</script>"#));
        assert!(document.contains(&stylesheet_reference_tag("vendor.css")));
        assert!(!set.contains("app.js"));
        assert_eq!(set.get("vendor.css"), Some(&OutputEntry::asset("vendor.css", "a{}")));
        assert_eq!(reporter.not_inlined(), vec!["vendor.css"]);
        assert_eq!(
            summary.not_inlined,
            vec![("vendor.css".to_string(), SkipReason::Excluded)]
        );
    }

    #[test]
    fn test_other_assets_always_reported() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", "<img src=\"logo.svg\">"),
            OutputEntry::asset("logo.svg", "<svg></svg>"),
        ]
        .into_iter()
        .collect();

        let (summary, reporter) = run(SingleFileOptions::default(), &mut set);

        assert!(set.contains("logo.svg"));
        assert_eq!(document_text(&set, "index.html"), "<img src=\"logo.svg\">");
        assert_eq!(
            reporter.notices(),
            [Notice::NotInlined {
                asset: "logo.svg".into(),
                reason: SkipReason::UnsupportedKind,
            }]
        );
        assert!(summary.documents.is_empty());
    }

    #[test]
    fn test_missing_tag_reports_and_keeps_file() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", "<html></html>"),
            OutputEntry::chunk("lazy.js", "export default 1"),
            OutputEntry::asset("unused.css", "a{}"),
        ]
        .into_iter()
        .collect();

        let (summary, reporter) = run(SingleFileOptions::default(), &mut set);

        assert!(set.contains("lazy.js"));
        assert!(set.contains("unused.css"));
        assert_eq!(reporter.not_inlined(), vec!["lazy.js", "unused.css"]);
        assert!(summary.inlined.is_empty());
        assert!(
            summary
                .not_inlined
                .iter()
                .all(|(_, reason)| *reason == SkipReason::TagNotFound)
        );
    }

    #[test]
    fn test_scripts_before_styles() {
        // The script's code contains the stylesheet tag, so embedding the
        // script first gives the style a second occurrence to replace.
        let link = stylesheet_reference_tag("main.css");
        let html = html_with(&[script_reference_tag("app.js")]);
        let mut set: OutputSet = [
            OutputEntry::asset("main.css", "p{}"),
            OutputEntry::asset("index.html", html),
            OutputEntry::chunk("app.js", format!("document.head.innerHTML = '{link}'")),
        ]
        .into_iter()
        .collect();

        let (summary, _) = run(SingleFileOptions::default(), &mut set);

        assert!(summary.is_inlined("app.js"));
        assert!(summary.is_inlined("main.css"));
        assert!(document_text(&set, "index.html").contains("innerHTML = '<style>p{}</style>'"));
    }

    #[test]
    fn test_shared_asset_across_documents() {
        let tag = script_reference_tag("shared.js");
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", html_with(&[tag.clone()])),
            OutputEntry::asset("about.html", html_with(&[tag])),
            OutputEntry::chunk("shared.js", "shared()"),
        ]
        .into_iter()
        .collect();

        let (summary, reporter) = run(SingleFileOptions::default(), &mut set);

        for document in ["index.html", "about.html"] {
            let text = document_text(&set, document);
            assert!(text.contains(r#"<script type="module">shared()</script>"#));
        }
        assert_eq!(summary.documents, vec!["index.html", "about.html"]);
        assert_eq!(summary.deleted, vec!["shared.js"]);
        assert_eq!(reporter.inlined(), vec!["shared.js", "shared.js"]);
        assert!(!set.contains("shared.js"));
    }

    #[test]
    fn test_inlined_in_one_document_only() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", script_reference_tag("app.js")),
            OutputEntry::asset("404.html", "<h1>Not found</h1>"),
            OutputEntry::chunk("app.js", "boot()"),
        ]
        .into_iter()
        .collect();

        let (summary, reporter) = run(SingleFileOptions::default(), &mut set);

        assert!(!set.contains("app.js"));
        assert!(summary.not_inlined.is_empty());
        assert!(reporter.notices().contains(&Notice::Skipped {
            asset: "app.js".into(),
            document: "404.html".into(),
            reason: SkipReason::TagNotFound,
        }));
    }

    #[test]
    fn test_no_documents() {
        let mut set: OutputSet = [OutputEntry::chunk("lib.js", "export {}")].into_iter().collect();

        let (summary, _) = run(SingleFileOptions::default(), &mut set);

        assert!(set.contains("lib.js"));
        assert_eq!(
            summary.not_inlined,
            vec![("lib.js".to_string(), SkipReason::NoDocument)]
        );
    }

    #[test]
    fn test_binary_script_is_skipped() {
        let mut set: OutputSet = [
            OutputEntry::asset("index.html", script_reference_tag("blob.js")),
            OutputEntry::asset("blob.js", vec![0xff, 0xfe, 0x00]),
        ]
        .into_iter()
        .collect();

        let (summary, _) = run(SingleFileOptions::default(), &mut set);

        assert!(set.contains("blob.js"));
        assert_eq!(
            summary.not_inlined,
            vec![("blob.js".to_string(), SkipReason::BinaryContent)]
        );
    }

    #[test]
    fn test_binary_document_untouched() {
        let mut set: OutputSet = [
            OutputEntry::asset("broken.html", vec![0xff, 0xfe]),
            OutputEntry::chunk("app.js", "x"),
        ]
        .into_iter()
        .collect();

        let (summary, _) = run(SingleFileOptions::default(), &mut set);

        assert_eq!(
            set.get("broken.html"),
            Some(&OutputEntry::asset("broken.html", vec![0xff, 0xfe]))
        );
        assert!(set.contains("app.js"));
        assert!(summary.documents.is_empty());
    }

    #[test]
    fn test_prune_disabled() {
        let mut set: OutputSet = [OutputEntry::chunk("a.js", "")].into_iter().collect();
        let inlined: IndexSet<String> = ["a.js".to_string()].into_iter().collect();

        assert!(prune(&mut set, &inlined, false).is_empty());
        assert!(set.contains("a.js"));
        assert_eq!(prune(&mut set, &inlined, true), vec!["a.js"]);
        assert!(set.is_empty());
    }
}
