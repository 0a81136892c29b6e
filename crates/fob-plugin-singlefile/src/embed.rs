//! Textual embedding of scripts and stylesheets into markup
//!
//! Embedding is exact substring replacement of the reference tag the bundler
//! emits. There is no HTML parsing: if the markup does not contain the tag in
//! its canonical form the markup comes back unchanged, and callers detect the
//! no-op by comparing the result with the input.

/// Escaped form of a closing script tag inside inlined code
const ESCAPED_SCRIPT_CLOSE: &str = "\\x3c/script>";
const SCRIPT_CLOSE: &str = "</script>";
const CHARSET_DECLARATION: &str = "@charset \"UTF-8\";";

/// The module script tag emitted for `file_name`
pub fn script_reference_tag(file_name: &str) -> String {
    format!(r#"<script type="module" crossorigin src="{file_name}"></script>"#)
}

/// The stylesheet link tag emitted for `file_name`
pub fn stylesheet_reference_tag(file_name: &str) -> String {
    format!(r#"<link rel="stylesheet" crossorigin href="{file_name}">"#)
}

/// Escape every `</script>` so inlined code cannot close its own element
///
/// `\x3c` is `<` in a JS string or template literal, so string contents are
/// unchanged at runtime.
pub fn sanitize_script(code: &str) -> String {
    code.replace(SCRIPT_CLOSE, ESCAPED_SCRIPT_CLOSE)
}

/// Drop a leading `@charset "UTF-8";`, which is invalid inside `<style>`
pub fn strip_charset(code: &str) -> &str {
    code.strip_prefix(CHARSET_DECLARATION).unwrap_or(code)
}

/// Replace the script tag referencing `file_name` with an inline module script
pub fn embed_script(markup: &str, file_name: &str, code: &str) -> String {
    let inline = format!(r#"<script type="module">{}</script>"#, sanitize_script(code));
    replace_first(markup, &script_reference_tag(file_name), &inline)
}

/// Replace the stylesheet link referencing `file_name` with an inline `<style>`
pub fn embed_css(markup: &str, file_name: &str, code: &str) -> String {
    let inline = format!("<style>{}</style>", strip_charset(code));
    replace_first(markup, &stylesheet_reference_tag(file_name), &inline)
}

fn replace_first(haystack: &str, needle: &str, replacement: &str) -> String {
    haystack.replacen(needle, replacement, 1)
}
