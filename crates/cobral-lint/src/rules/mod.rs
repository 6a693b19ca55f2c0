//! Diagnostic rules
//!
//! Each rule re-walks the shared token buffer with its own cursor and reads
//! scopes from the [`Analysis`] side tables. Rules never mutate shared state.

mod comparison;
mod import_error;
mod undefined;
mod unused;

use crate::common::Diagnostic;
use crate::lexer::TokenBuffer;
use crate::sema::Analysis;

pub use comparison::IncompatibleComparison;
pub use import_error::ImportError;
pub use undefined::UndefinedIdentifier;
pub use unused::UnusedDeclaration;

/// Inputs shared by all rules of one run
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub buffer: &'a TokenBuffer,
    pub analysis: &'a Analysis,
}

impl<'a> RuleContext<'a> {
    pub fn new(buffer: &'a TokenBuffer, analysis: &'a Analysis) -> Self {
        Self { buffer, analysis }
    }
}

/// A check that needs no I/O
pub trait Rule: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::lexer::tokenize;
    use crate::sema::analyze;

    /// Run a rule over `source` with no imports
    pub fn run(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
        let buffer = tokenize(source).unwrap();
        let analysis = analyze(&buffer);
        rule.check(&RuleContext::new(&buffer, &analysis))
    }
}
