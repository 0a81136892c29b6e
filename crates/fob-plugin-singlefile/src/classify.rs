//! Output file classification by file name suffix

/// What an output file is, as far as inlining is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `.html` / `.htm`: an inlining target
    Markup,
    /// `.css`
    Style,
    /// `.js` / `.mjs` / `.cjs`
    Script,
    /// Anything else; never inlined
    Other,
}

const MARKUP_SUFFIXES: &[&str] = &[".html", ".htm"];
const STYLE_SUFFIXES: &[&str] = &[".css"];
const SCRIPT_SUFFIXES: &[&str] = &[".js", ".mjs", ".cjs"];

impl AssetKind {
    /// Classify a file name. Suffixes are matched case-sensitively, markup first.
    pub fn from_file_name(file_name: &str) -> Self {
        let has_suffix = |suffixes: &[&str]| suffixes.iter().any(|s| file_name.ends_with(s));

        if has_suffix(MARKUP_SUFFIXES) {
            AssetKind::Markup
        } else if has_suffix(STYLE_SUFFIXES) {
            AssetKind::Style
        } else if has_suffix(SCRIPT_SUFFIXES) {
            AssetKind::Script
        } else {
            AssetKind::Other
        }
    }
}

/// Output file names partitioned by [`AssetKind`]
///
/// Every input name lands in exactly one bucket; each bucket keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub markup: Vec<String>,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub other: Vec<String>,
}

impl Classification {
    pub fn bucket(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Markup => &self.markup,
            AssetKind::Style => &self.styles,
            AssetKind::Script => &self.scripts,
            AssetKind::Other => &self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.markup.len() + self.styles.len() + self.scripts.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition file names into markup, styles, scripts and other
pub fn classify<'a, I>(file_names: I) -> Classification
where
    I: IntoIterator<Item = &'a str>,
{
    let mut classification = Classification::default();
    for name in file_names {
        let bucket = match AssetKind::from_file_name(name) {
            AssetKind::Markup => &mut classification.markup,
            AssetKind::Style => &mut classification.styles,
            AssetKind::Script => &mut classification.scripts,
            AssetKind::Other => &mut classification.other,
        };
        bucket.push(name.to_string());
    }
    classification
}
