// src/utils.rs
use unicode_normalization::UnicodeNormalization;

/// Glyphs the résumé page uses as contact icons.
pub const ICON_GLYPHS: &[char] = &['📞', '✉', '\u{FE0F}', '📍', '💼', '💻'];

/// Flatten multi-line source text into a single line
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decompose accented characters, drop the combining marks, lowercase and trim
pub fn normalize_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Collapse every run outside `[a-z0-9]` to one hyphen, without edge hyphens
pub fn hyphenate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    out
}

/// Filesystem-safe segment for a page field
pub fn slug_segment(text: &str) -> String {
    hyphenate(&normalize_text(text))
}

/// Remove contact icon glyphs and trim
pub fn strip_icon_glyphs(text: &str) -> String {
    text.chars()
        .filter(|c| !ICON_GLYPHS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Join the non-empty parts with a separator
pub fn join_present<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
