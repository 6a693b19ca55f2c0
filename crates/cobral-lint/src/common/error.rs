//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::{Diagnostic, LineIndex, Severity, Span};

/// Errors that stop analysis of a document
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }
}

pub type LintResult<T> = Result<T, LintError>;

struct SourceFile {
    name: String,
    source: String,
    lines: LineIndex,
}

/// Renders diagnostics against their source text
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    sources: Vec<SourceFile>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            sources: Vec::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        let name = name.into();
        let source = source.into();
        self.sources.push(SourceFile {
            name: name.clone(),
            lines: LineIndex::new(&source),
            source: source.clone(),
        });
        self.files.add(name, source)
    }

    /// Byte range covered by a diagnostic in the given file
    fn byte_range(&self, file_id: usize, diagnostic: &Diagnostic) -> std::ops::Range<usize> {
        let file = &self.sources[file_id];
        let start = file.lines.offset(&file.source, diagnostic.start);
        let end = file.lines.offset(&file.source, diagnostic.end).max(start);
        start..end
    }

    pub fn report(&self, file_id: usize, diagnostic: &Diagnostic) {
        let report = match diagnostic.severity {
            Severity::Error => Report::error(),
            Severity::Warning => Report::warning(),
        };
        let report = report
            .with_message(diagnostic.message.clone())
            .with_code(diagnostic.code.as_str())
            .with_labels(vec![Label::primary(file_id, self.byte_range(file_id, diagnostic))]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &report);
    }

    /// One line per diagnostic: `file:line:col: severity [code]: message`
    pub fn format_short(&self, file_id: usize, diagnostic: &Diagnostic) -> String {
        format!("{}:{}", self.sources[file_id].name, diagnostic)
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
