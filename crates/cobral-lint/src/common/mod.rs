//! Common infrastructure shared by the lexer, the scope builder and the rules

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::{DiagnosticReporter, LintError, LintResult};
pub use span::{LineIndex, Position, Span};
