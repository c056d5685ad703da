//! Slug generation for marks and derived permalinks.

use deunicode::deunicode;

/// Turn arbitrary text into a lowercase, dash-separated slug.
///
/// Non-ASCII text is transliterated first, so `"Café Ölçü"` becomes
/// `"cafe-olcu"`. Returns an empty string when nothing survives.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
