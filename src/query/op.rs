//! Comparison operators.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::content::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Contains,
    NotContains,
    In,
    NotIn,
    Eq,
    NotEq,
    Gte,
    Lte,
    Gt,
    Lt,
}

impl Operator {
    /// Matching order: longer symbols first, so `>=` never lexes as `>`.
    const LEXING_ORDER: [Self; 10] = [
        Self::NotContains,
        Self::Contains,
        Self::NotIn,
        Self::Gte,
        Self::Lte,
        Self::Eq,
        Self::NotEq,
        Self::In,
        Self::Gt,
        Self::Lt,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::NotContains => "!contains",
            Self::In => "in",
            Self::NotIn => "!in",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    const fn is_word(self) -> bool {
        matches!(
            self,
            Self::Contains | Self::NotContains | Self::In | Self::NotIn
        )
    }

    /// Operator at the start of `text`.
    ///
    /// Word operators must be followed by whitespace or the end of input.
    pub fn lex(text: &str) -> Option<Self> {
        Self::LEXING_ORDER.into_iter().find(|op| {
            let Some(rest) = text.strip_prefix(op.symbol()) else {
                return false;
            };
            !op.is_word() || rest.is_empty() || rest.starts_with(char::is_whitespace)
        })
    }

    /// Test a present field value against the right operand.
    pub fn apply(self, field: &Value, operand: &Value) -> bool {
        match self {
            Self::Contains => field.contains(operand) == Some(true),
            Self::NotContains => field.contains(operand) == Some(false),
            Self::In => is_member(field, operand),
            Self::NotIn => !is_member(field, operand),
            Self::Eq => field.loose_eq(operand),
            Self::NotEq => comparable(field, operand) && !field.loose_eq(operand),
            Self::Gte => field.loose_cmp(operand).is_some_and(|ord| ord.is_ge()),
            Self::Lte => field.loose_cmp(operand).is_some_and(|ord| ord.is_le()),
            Self::Gt => field.loose_cmp(operand).is_some_and(|ord| ord.is_gt()),
            Self::Lt => field.loose_cmp(operand).is_some_and(|ord| ord.is_lt()),
        }
    }
}

/// `field in operand`. Marks are members when any of them is listed.
fn is_member(field: &Value, operand: &Value) -> bool {
    let items = operand.clone().into_sequence();
    match field {
        Value::Marks(marks) => marks
            .iter()
            .any(|mark| items.iter().any(|item| mark.matches(&item.to_string()))),
        _ => items.iter().any(|item| field.loose_eq(item)),
    }
}

/// Whether `!=` may compare the two values at all.
fn comparable(a: &Value, b: &Value) -> bool {
    a.type_name() == b.type_name()
        || a.loose_cmp(b).is_some()
        || matches!(
            (a, b),
            (Value::Marks(_), Value::Str(_)) | (Value::Str(_), Value::Marks(_))
        )
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}
