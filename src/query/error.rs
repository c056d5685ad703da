//! Query errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid query at byte {offset}: {message}")]
    Syntax {
        offset: usize,
        text: String,
        message: String,
    },
}

impl QueryError {
    pub(crate) fn syntax(text: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            text: text.to_string(),
            message: message.into(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } => *offset,
        }
    }

    /// The query with a caret under the offending position.
    ///
    /// ```text
    /// type ~ post
    ///      ^ expected an operator
    /// ```
    pub fn render_diagnostic(&self) -> String {
        let Self::Syntax {
            offset,
            text,
            message,
        } = self;
        let column = text
            .get(..*offset)
            .map_or(text.chars().count(), |before| before.chars().count());
        format!("{text}\n{}^ {message}", " ".repeat(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_diagnostic() {
        let err = QueryError::syntax("type ~ post", 5, "expected an operator");
        assert_eq!(
            err.render_diagnostic(),
            "type ~ post\n     ^ expected an operator"
        );
        assert_eq!(err.offset(), 5);
        assert_eq!(
            err.to_string(),
            "invalid query at byte 5: expected an operator"
        );
    }
}
