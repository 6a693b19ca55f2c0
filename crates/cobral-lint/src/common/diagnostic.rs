//! Diagnostic values handed to the editor

use std::fmt;

use super::Position;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Machine-readable diagnostic code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticCode {
    LexicalError,
    UndefinedIdentifier,
    UnusedVariable,
    UnusedFunction,
    IncompleteComparison,
    IncompatibleComparison,
    ImportError,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::LexicalError => "cobral.lexicalError",
            DiagnosticCode::UndefinedIdentifier => "cobral.undefinedIdentifier",
            DiagnosticCode::UnusedVariable => "cobral.unusedVariable",
            DiagnosticCode::UnusedFunction => "cobral.unusedFunction",
            DiagnosticCode::IncompleteComparison => "cobral.incompleteComparison",
            DiagnosticCode::IncompatibleComparison => "cobral.incompatibleComparison",
            DiagnosticCode::ImportError => "cobral.importError",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding with a position range. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub start: Position,
    pub end: Position,
    pub message: String,
    pub code: DiagnosticCode,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            severity: Severity::Error,
            start,
            end,
            message: message.into(),
            code,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            severity: Severity::Warning,
            start,
            end,
            message: message.into(),
            code,
        }
    }

    pub fn start_line(&self) -> usize {
        self.start.line
    }

    pub fn start_column(&self) -> usize {
        self.start.column
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }

    pub fn end_column(&self) -> usize {
        self.end.column
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]: {}", self.start, self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_editor_names() {
        assert_eq!(DiagnosticCode::UndefinedIdentifier.as_str(), "cobral.undefinedIdentifier");
        assert_eq!(DiagnosticCode::ImportError.to_string(), "cobral.importError");
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::warning(
            DiagnosticCode::UnusedVariable,
            "Variável 'x' é declarada mas não é usada.",
            Position::new(1, 9),
            Position::new(1, 10),
        );
        assert!(!d.is_error());
        assert_eq!(
            d.to_string(),
            "1:9: warning [cobral.unusedVariable]: Variável 'x' é declarada mas não é usada."
        );
    }
}
