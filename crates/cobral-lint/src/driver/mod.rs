//! Linter orchestration
//!
//! One run: tokenize, build scopes, resolve imports, run the enabled rules
//! concurrently, merge their diagnostics.

use tracing::debug;

use crate::common::{Diagnostic, DiagnosticCode, LineIndex, LintError, Position};
use crate::imports::{FileSystem, ImportResolver};
use crate::lexer::{tokenize, TokenBuffer};
use crate::rules::{
    ImportError, IncompatibleComparison, Rule, RuleContext, UndefinedIdentifier, UnusedDeclaration,
};
use crate::sema::{analyze, Analysis};

/// Which rules run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinterConfig {
    pub check_imports: bool,
    /// Comparison operands and types
    pub check_types: bool,
    pub check_unused: bool,
    pub check_undefined: bool,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            check_imports: true,
            check_types: true,
            check_unused: true,
            check_undefined: true,
        }
    }
}

/// Lints Cobral documents, reading imports through `F`
pub struct Linter<F: FileSystem> {
    fs: F,
    config: LinterConfig,
}

impl<F: FileSystem> Linter<F> {
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, LinterConfig::default())
    }

    pub fn with_config(fs: F, config: LinterConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Scope analysis of `buffer` with its imports merged, plus the
    /// diagnostics the import resolver produced
    pub async fn analyze(&self, buffer: &TokenBuffer) -> (Analysis, Vec<Diagnostic>) {
        let mut analysis = analyze(buffer);
        let resolution = ImportResolver::new(&self.fs).resolve(buffer).await;
        analysis.set_imported(resolution.scope);
        (analysis, resolution.diagnostics)
    }

    /// All diagnostics for `source`, sorted by position then code
    pub async fn lint(&self, source: &str) -> Vec<Diagnostic> {
        let buffer = match tokenize(source) {
            Ok(buffer) => buffer,
            Err(err) => {
                debug!(%err, "lexing failed");
                return vec![lexical_diagnostic(source, &err)];
            }
        };
        debug!(tokens = buffer.len(), "tokenized document");

        let (analysis, resolver_diagnostics) = self.analyze(&buffer).await;
        let ctx = RuleContext::new(&buffer, &analysis);
        let config = self.config;

        let (undefined, unused, comparisons, imports) = futures::join!(
            run_rule(&UndefinedIdentifier, &ctx, config.check_undefined),
            run_rule(&UnusedDeclaration, &ctx, config.check_unused),
            run_rule(&IncompatibleComparison, &ctx, config.check_types),
            async {
                if !config.check_imports {
                    return Vec::new();
                }
                let diagnostics = ImportError.check(&buffer, &self.fs).await;
                debug!(rule = ImportError.name(), count = diagnostics.len(), "rule finished");
                diagnostics
            },
        );

        let mut diagnostics: Vec<Diagnostic> = [undefined, unused, comparisons, imports]
            .into_iter()
            .flatten()
            .collect();
        if config.check_imports {
            diagnostics.extend(resolver_diagnostics);
        }
        diagnostics.sort_by_key(|d| (d.start, d.code.as_str()));

        debug!(count = diagnostics.len(), "lint finished");
        diagnostics
    }
}

async fn run_rule(rule: &dyn Rule, ctx: &RuleContext<'_>, enabled: bool) -> Vec<Diagnostic> {
    if !enabled {
        return Vec::new();
    }
    let diagnostics = rule.check(ctx);
    debug!(rule = rule.name(), count = diagnostics.len(), "rule finished");
    diagnostics
}

/// The single fatal diagnostic reported for a document that fails to lex
fn lexical_diagnostic(source: &str, err: &LintError) -> Diagnostic {
    let (start, end, message) = match err {
        LintError::Lexer { message, span } => {
            let lines = LineIndex::new(source);
            (
                lines.position(source, span.start),
                lines.position(source, span.end),
                message.clone(),
            )
        }
        LintError::Io(err) => (Position::new(1, 1), Position::new(1, 1), err.to_string()),
    };
    Diagnostic::error(DiagnosticCode::LexicalError, message, start, end)
}
