//! Comparisons with a missing operand or operands of incompatible types

use crate::common::{Diagnostic, DiagnosticCode};
use crate::lexer::{Token, TokenKind};

use super::{Rule, RuleContext};

pub struct IncompatibleComparison;

/// Identifiers, string and number literals, `verdadeiro` and `falso`
fn is_operand(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::String | TokenKind::Number => true,
        TokenKind::Keyword(keyword) => keyword.is_boolean_literal(),
        _ => false,
    }
}

fn incomplete(start: &Token, end: &Token) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::IncompleteComparison,
        "Operação de comparação incompleta.",
        start.start(),
        end.end(),
    )
}

impl Rule for IncompatibleComparison {
    fn name(&self) -> &'static str {
        "incompatible-comparison"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut cursor = ctx.buffer.cursor();
        let mut diagnostics = Vec::new();
        let mut previous: Option<&Token> = None;

        while let Some(token) = cursor.next_token() {
            let operator = token;
            let left = previous.replace(token);
            if !matches!(operator.kind, TokenKind::Operator(op) if op.is_comparison()) {
                continue;
            }

            let Some(left) = left.filter(|t| is_operand(t)) else {
                diagnostics.push(incomplete(operator, operator));
                continue;
            };
            let Some(right) = cursor.peek().filter(|t| is_operand(t)) else {
                diagnostics.push(incomplete(left, operator));
                continue;
            };

            let analysis = ctx.analysis;
            let types = analysis
                .value_type(analysis.scope_of(left), left)
                .zip(analysis.value_type(analysis.scope_of(right), right));
            let Some((left_type, right_type)) = types else {
                continue;
            };
            if left_type.is_comparable_with(right_type) {
                continue;
            }

            diagnostics.push(Diagnostic::error(
                DiagnosticCode::IncompatibleComparison,
                format!(
                    "Comparação incompatível: '{}' ({left_type}) e '{}' ({right_type}) não podem ser comparados.",
                    left.text, right.text
                ),
                left.start(),
                right.end(),
            ));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::rules::test_support::run;
    use pretty_assertions::assert_eq;

    fn codes(source: &str) -> Vec<&'static str> {
        run(&IncompatibleComparison, source)
            .iter()
            .map(|d| d.code.as_str())
            .collect()
    }

    #[test]
    fn test_string_against_integer() {
        let diagnostics = run(&IncompatibleComparison, "declare x = \"a\";\nse (x == 5) { escrever(x); }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::IncompatibleComparison);
        assert_eq!(
            diagnostics[0].message,
            "Comparação incompatível: 'x' (cadeia) e '5' (inteiro) não podem ser comparados."
        );
        assert_eq!((diagnostics[0].start, diagnostics[0].end), (Position::new(2, 5), Position::new(2, 11)));
    }

    #[test]
    fn test_numeric_coercion_is_allowed() {
        assert!(codes("declare a = 1;\ndeclare b = 2.5;\nse (a < b) { }\nse (3 >= 1.5) { }").is_empty());
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        assert!(codes("funcao f(n) { se (n == \"a\") { } }\ndeclare r = f(1);\nse (r > \"b\") { }").is_empty());
    }

    #[test]
    fn test_builtin_and_boolean_operands() {
        let diagnostics = run(&IncompatibleComparison, "se (ler() == 1) { }\nse (verdadeiro != 0) { }");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "Operação de comparação incompleta.",
                "Comparação incompatível: 'verdadeiro' (lógico) e '0' (inteiro) não podem ser comparados.",
            ]
        );
    }

    #[test]
    fn test_incomplete_comparisons() {
        let diagnostics = run(&IncompatibleComparison, "se (== 1) { }\nse (x <) { }");

        assert_eq!(codes("se (== 1) { }\nse (x <) { }"), vec!["cobral.incompleteComparison"; 2]);
        assert_eq!((diagnostics[0].start, diagnostics[0].end), (Position::new(1, 5), Position::new(1, 7)));
        assert_eq!((diagnostics[1].start, diagnostics[1].end), (Position::new(2, 5), Position::new(2, 8)));
    }

    #[test]
    fn test_builtin_name_operand_uses_return_type() {
        assert_eq!(codes("se (ler == 1) { }"), vec!["cobral.incompatibleComparison"]);
    }
}
