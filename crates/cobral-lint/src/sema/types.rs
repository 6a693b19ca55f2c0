//! Inferred value types

use std::fmt;

use crate::lexer::{Token, TokenKind};

/// Best-effort type of a declared value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// `inteiro`
    Integer,
    /// `real`
    Float,
    /// `lógico`
    Boolean,
    /// `cadeia`
    String,
    #[default]
    Unknown,
}

impl ValueType {
    /// Type named by an annotation identifier such as `declare x inteiro`
    pub fn from_annotation(name: &str) -> Self {
        match name {
            "inteiro" => ValueType::Integer,
            "real" => ValueType::Float,
            "logico" | "lógico" => ValueType::Boolean,
            "cadeia" => ValueType::String,
            _ => ValueType::Unknown,
        }
    }

    /// Type of a literal token, `None` for anything that is not a literal
    pub fn of_literal(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::String => Some(ValueType::String),
            TokenKind::Number if token.text.contains('.') => Some(ValueType::Float),
            TokenKind::Number => Some(ValueType::Integer),
            TokenKind::Keyword(k) if k.is_boolean_literal() => Some(ValueType::Boolean),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != ValueType::Unknown
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Float)
    }

    /// Whether two known types may be compared. Integers and floats coerce.
    pub fn is_comparable_with(&self, other: ValueType) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "inteiro",
            ValueType::Float => "real",
            ValueType::Boolean => "lógico",
            ValueType::String => "cadeia",
            ValueType::Unknown => "desconhecido",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
