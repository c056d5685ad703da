//! Small shared helpers.
//!
//! - [`date`]: calendar date/time values used by literal conversion
//! - [`slug`]: URL-safe identifiers for marks and permalinks

pub mod date;
pub mod slug;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "content")` -> `"0 contents"`
/// - `plural_count(1, "content")` -> `"1 content"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "marker"), "0 markers");
        assert_eq!(plural_count(1, "marker"), "1 marker");
        assert_eq!(plural_count(7, "url"), "7 urls");
    }
}
