//! Identifiers that resolve to nothing

use crate::common::{Diagnostic, DiagnosticCode};
use crate::sema::TokenRole;

use super::{Rule, RuleContext};

pub struct UndefinedIdentifier;

impl Rule for UndefinedIdentifier {
    fn name(&self) -> &'static str {
        "undefined-identifier"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut cursor = ctx.buffer.cursor();
        let mut diagnostics = Vec::new();

        while let Some(token) = cursor.next_token() {
            if !token.is_identifier() || ctx.analysis.role_of(token) != TokenRole::Reference {
                continue;
            }
            if ctx.analysis.is_defined(ctx.analysis.scope_of(token), &token.text) {
                continue;
            }
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::UndefinedIdentifier,
                format!("Identificador '{}' é usado mas não é declarado.", token.text),
                token.start(),
                token.end(),
            ));
        }

        diagnostics
    }
}
