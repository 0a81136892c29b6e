//! In-memory view of a finished build's output files
//!
//! [`OutputSet`] is the table the inliner reads and rewrites. It is owned by a
//! single run and mutated in place: markup entries get new content, inlined
//! entries get removed.

use indexmap::IndexMap;

/// Content of a non-executable output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Text(String),
    Binary(Vec<u8>),
}

impl AssetSource {
    /// Borrow the content as text, decoding UTF-8 binaries when possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AssetSource::Text(text) => Some(text),
            AssetSource::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }
}

impl From<String> for AssetSource {
    fn from(text: String) -> Self {
        AssetSource::Text(text)
    }
}

impl From<&str> for AssetSource {
    fn from(text: &str) -> Self {
        AssetSource::Text(text.to_string())
    }
}

impl From<Vec<u8>> for AssetSource {
    fn from(bytes: Vec<u8>) -> Self {
        AssetSource::Binary(bytes)
    }
}

/// A single output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEntry {
    /// Executable script emitted by the bundler
    Chunk { file_name: String, code: String },
    /// Markup, stylesheet or any other emitted file
    Asset {
        file_name: String,
        source: AssetSource,
    },
}

impl OutputEntry {
    pub fn chunk(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        OutputEntry::Chunk {
            file_name: file_name.into(),
            code: code.into(),
        }
    }

    pub fn asset(file_name: impl Into<String>, source: impl Into<AssetSource>) -> Self {
        OutputEntry::Asset {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            OutputEntry::Chunk { file_name, .. } | OutputEntry::Asset { file_name, .. } => {
                file_name
            }
        }
    }

    /// Textual content: chunk code or a text(-decodable) asset source
    pub fn text(&self) -> Option<&str> {
        match self {
            OutputEntry::Chunk { code, .. } => Some(code),
            OutputEntry::Asset { source, .. } => source.as_text(),
        }
    }
}

/// Output files keyed by file name, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    entries: IndexMap<String, OutputEntry>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under its own file name, replacing any previous entry
    pub fn insert(&mut self, entry: OutputEntry) -> Option<OutputEntry> {
        self.entries.insert(entry.file_name().to_string(), entry)
    }

    pub fn get(&self, file_name: &str) -> Option<&OutputEntry> {
        self.entries.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.entries.contains_key(file_name)
    }

    /// Remove an entry, keeping the relative order of the rest
    pub fn remove(&mut self, file_name: &str) -> Option<OutputEntry> {
        self.entries.shift_remove(file_name)
    }

    /// File names in emission order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the content of an existing entry with text
    ///
    /// Chunks keep their variant and get new code; assets become text assets.
    /// Returns `false` if no entry has that name.
    pub fn set_text(&mut self, file_name: &str, text: String) -> bool {
        match self.entries.get_mut(file_name) {
            Some(OutputEntry::Chunk { code, .. }) => {
                *code = text;
                true
            }
            Some(OutputEntry::Asset { source, .. }) => {
                *source = AssetSource::Text(text);
                true
            }
            None => false,
        }
    }
}

impl FromIterator<OutputEntry> for OutputSet {
    fn from_iter<I: IntoIterator<Item = OutputEntry>>(iter: I) -> Self {
        let mut set = OutputSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}
