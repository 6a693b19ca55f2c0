//! Declarations whose name is never referenced

use std::collections::HashSet;

use crate::common::{Diagnostic, DiagnosticCode};
use crate::sema::TokenRole;

use super::{Rule, RuleContext};

pub struct UnusedDeclaration;

impl UnusedDeclaration {
    /// Names referenced anywhere in the document, declaration sites excluded
    fn used_names<'a>(ctx: &RuleContext<'a>) -> HashSet<&'a str> {
        let mut cursor = ctx.buffer.cursor();
        let mut used = HashSet::new();
        while let Some(token) = cursor.next_token() {
            if token.is_identifier() && ctx.analysis.role_of(token) == TokenRole::Reference {
                used.insert(token.text.as_str());
            }
        }
        used
    }
}

impl Rule for UnusedDeclaration {
    fn name(&self) -> &'static str {
        "unused-declaration"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let used = Self::used_names(ctx);
        let mut unused = Vec::new();

        for (_, scope) in ctx.analysis.tree().iter() {
            let variables = scope
                .variables()
                .map(|(name, v)| (name, v.declared_at, DiagnosticCode::UnusedVariable));
            let functions = scope
                .user_functions()
                .map(|(name, f)| (name, f.declared_at, DiagnosticCode::UnusedFunction));

            for (name, declared_at, code) in variables.chain(functions) {
                if used.contains(name) {
                    continue;
                }
                if let Some(token) = declared_at.and_then(|index| ctx.buffer.get(index)) {
                    unused.push((name, code, token));
                }
            }
        }

        unused.sort_by_key(|(.., token)| token.index);
        unused
            .into_iter()
            .map(|(name, code, token)| {
                let message = match code {
                    DiagnosticCode::UnusedFunction => {
                        format!("Função '{name}' é declarada mas não é usada.")
                    }
                    _ => format!("Variável '{name}' é declarada mas não é usada."),
                };
                Diagnostic::warning(code, message, token.start(), token.end())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Position, Severity};
    use crate::rules::test_support::run;
    use pretty_assertions::assert_eq;

    fn messages(source: &str) -> Vec<String> {
        run(&UnusedDeclaration, source).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_unused_variable_at_declaration() {
        let diagnostics = run(&UnusedDeclaration, "declare x = 1;\nescrever(2);");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnusedVariable);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, "Variável 'x' é declarada mas não é usada.");
        assert_eq!((diagnostics[0].start, diagnostics[0].end), (Position::new(1, 9), Position::new(1, 10)));
    }

    #[test]
    fn test_unused_function_and_parameters() {
        assert_eq!(
            messages("funcao f(a, b) {\n  retorne a;\n}"),
            vec![
                "Função 'f' é declarada mas não é usada.",
                "Variável 'b' é declarada mas não é usada.",
            ]
        );
    }

    #[test]
    fn test_usage_anywhere_counts() {
        assert!(messages("declare x = 1;\nfuncao f() { retorne x; }\nf();").is_empty());
        assert!(messages("para (declare i = 0; i < 3; i = i + 1) { }").is_empty());
    }

    #[test]
    fn test_builtins_and_annotations_are_not_declarations() {
        assert_eq!(
            messages("declare x inteiro;"),
            vec!["Variável 'x' é declarada mas não é usada."]
        );
        assert!(messages("escrever(1);").is_empty());
    }

    #[test]
    fn test_nested_scopes_are_checked() {
        assert_eq!(
            messages("funcao f() {\n  para (declare j = 0; verdadeiro; ) { declare k = 1; }\n}\nf();"),
            vec![
                "Variável 'j' é declarada mas não é usada.",
                "Variável 'k' é declarada mas não é usada.",
            ]
        );
    }
}
