//! Inline eligibility via glob allow-lists

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Result, SingleFileError};

/// Compiled `inlinePattern` allow-list
///
/// With no patterns every file is eligible. Otherwise a file is eligible when
/// it matches none of the negated patterns (`!*.map`) and matches at least one
/// of the positive patterns, if there are any.
///
/// Syntax: `*` and `?` stop at `/`, `**` crosses directories, `[...]` classes,
/// `{a,b}` alternation and the `@(a|b)` extglob group. The other extglob
/// operators (`+(..)`, `*(..)`, `?(..)`, `!(..)`) are rejected at
/// construction. Unlike micromatch, wildcards also match names that start
/// with a dot, so `*.js` matches `.hidden.js`.
#[derive(Debug, Clone, Default)]
pub struct InlineMatcher {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl InlineMatcher {
    /// Compile the given glob patterns
    ///
    /// # Errors
    ///
    /// Returns [`SingleFileError::InvalidPattern`] for the first pattern that
    /// is not a valid glob or uses an unsupported extglob operator.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            match negated(pattern) {
                Some(rest) => exclude.push((pattern, rest)),
                None => include.push((pattern, pattern)),
            }
        }

        Ok(Self {
            include: compile(&include)?,
            exclude: compile(&exclude)?,
        })
    }

    /// Matcher that accepts every file
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_eligible(&self, file_name: &str) -> bool {
        if self
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(file_name))
        {
            return false;
        }
        match &self.include {
            None => true,
            Some(set) => set.is_match(file_name),
        }
    }

    /// Whether this matcher restricts anything at all
    pub fn is_restricted(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }
}

/// One-shot eligibility check against uncompiled patterns
pub fn is_eligible<S: AsRef<str>>(file_name: &str, patterns: &[S]) -> Result<bool> {
    Ok(InlineMatcher::new(patterns)?.is_eligible(file_name))
}

/// `!*.map` -> `Some("*.map")`; `!(..)` is an extglob group, not a negation
fn negated(pattern: &str) -> Option<&str> {
    pattern
        .strip_prefix('!')
        .filter(|rest| !rest.starts_with('('))
}

/// Compile `(original, glob)` pairs; `None` when there are none
fn compile(patterns: &[(&str, &str)]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for (original, glob) in patterns {
        let translated =
            translate_extglob(glob).map_err(|e| SingleFileError::invalid_pattern(*original, e))?;
        // Use literal_separator so * doesn't match path separators
        let glob = GlobBuilder::new(&translated)
            .literal_separator(true)
            .build()
            .map_err(|e| SingleFileError::invalid_pattern(*original, e))?;
        builder.add(glob);
    }

    let set = builder.build().map_err(|e| {
        let originals: Vec<&str> = patterns.iter().map(|(original, _)| *original).collect();
        SingleFileError::invalid_pattern(originals.join(", "), e)
    })?;
    Ok(Some(set))
}

/// Rewrite `@(a|b)` groups into `{a,b}` alternation
///
/// Escapes and `[...]` classes are copied verbatim. Any other extglob
/// operator is an error, since globset would read it as literal text.
fn translate_extglob(pattern: &str) -> std::result::Result<String, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                out.extend(&chars[i..(i + 2).min(chars.len())]);
                i += 2;
            }
            '[' => {
                let end = class_end(&chars, i).unwrap_or(chars.len() - 1);
                out.extend(&chars[i..=end]);
                i = end + 1;
            }
            '@' | '+' | '*' | '?' | '!' if chars.get(i + 1) == Some(&'(') => {
                if ch != '@' {
                    return Err(format!("extglob group `{ch}(...)` is not supported"));
                }
                let close = group_end(&chars, i + 1)
                    .ok_or_else(|| "unclosed extglob group `@(`".to_string())?;
                let alternatives = split_alternatives(&chars[i + 2..close])
                    .into_iter()
                    .map(|alternative| translate_extglob(&alternative))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if alternatives.iter().any(|alt| alt.contains([',', '{', '}'])) {
                    return Err("alternatives inside `@(...)` cannot contain `,` or braces".into());
                }
                out.push('{');
                out.push_str(&alternatives.join(","));
                out.push('}');
                i = close + 1;
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Index of the `]` closing the class opened at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!' | '^')) {
        i += 1;
    }
    // A `]` right after the opener is a literal member
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    chars[i.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| i + offset)
}

/// Index of the `)` matching the `(` at `open`
fn group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split a group body on `|` outside nested parentheses
fn split_alternatives(body: &[char]) -> Vec<String> {
    let mut alternatives = vec![String::new()];
    let mut depth = 0usize;
    let mut i = 0;
    while i < body.len() {
        let ch = body[i];
        match ch {
            '\\' => {
                if let Some(alt) = alternatives.last_mut() {
                    alt.extend(&body[i..(i + 2).min(body.len())]);
                }
                i += 2;
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                alternatives.push(String::new());
                i += 1;
                continue;
            }
            _ => {}
        }
        if let Some(alt) = alternatives.last_mut() {
            alt.push(ch);
        }
        i += 1;
    }
    alternatives
}
