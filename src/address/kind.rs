//! Document kind of a content URL.

use serde::Serialize;

/// What a URL points at.
///
/// HTML kinds force a trailing slash and map to `<path>/index.html` on disk.
/// `Unspecified` is for lookup-only URLs that are never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    HtmlDocument,
    TextDocument,
    BinaryDocument,
    GeneratedHtmlDocument,
    GeneratedTextDocument,
    GeneratedBinaryDocument,
    Directory,
    #[default]
    Unspecified,
}

impl DocumentKind {
    #[inline]
    pub const fn is_html(self) -> bool {
        matches!(self, Self::HtmlDocument | Self::GeneratedHtmlDocument)
    }

    /// HTML documents are text documents too.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(
            self,
            Self::HtmlDocument
                | Self::TextDocument
                | Self::GeneratedHtmlDocument
                | Self::GeneratedTextDocument
        )
    }

    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::BinaryDocument | Self::GeneratedBinaryDocument)
    }

    #[inline]
    pub const fn is_generated(self) -> bool {
        matches!(
            self,
            Self::GeneratedHtmlDocument | Self::GeneratedTextDocument | Self::GeneratedBinaryDocument
        )
    }

    #[inline]
    pub const fn is_file(self) -> bool {
        self.is_text() || self.is_binary()
    }

    #[inline]
    pub const fn is_specified(self) -> bool {
        !matches!(self, Self::Unspecified)
    }

    /// Generated counterpart of a file kind, used for pagination pages.
    pub const fn to_generated(self) -> Self {
        match self {
            Self::HtmlDocument => Self::GeneratedHtmlDocument,
            Self::TextDocument => Self::GeneratedTextDocument,
            Self::BinaryDocument => Self::GeneratedBinaryDocument,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(DocumentKind::HtmlDocument.is_html());
        assert!(DocumentKind::HtmlDocument.is_text());
        assert!(DocumentKind::GeneratedHtmlDocument.is_generated());
        assert!(!DocumentKind::Directory.is_file());
        assert!(!DocumentKind::Unspecified.is_specified());
        assert!(DocumentKind::GeneratedBinaryDocument.is_binary());
    }

    #[test]
    fn test_to_generated() {
        assert_eq!(
            DocumentKind::HtmlDocument.to_generated(),
            DocumentKind::GeneratedHtmlDocument
        );
        assert_eq!(DocumentKind::Directory.to_generated(), DocumentKind::Directory);
    }
}
