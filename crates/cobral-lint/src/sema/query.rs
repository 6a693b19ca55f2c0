//! Editor queries answered from an [`Analysis`]: hover and completion

use std::collections::HashSet;
use std::fmt::Write;

use crate::common::Position;
use crate::lexer::{Keyword, TokenBuffer};

use super::analysis::{Analysis, TokenRole};
use super::builtins::builtin;
use super::scope::{Function, Scope};

/// Description of the identifier under a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub start: Position,
    pub end: Position,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Keyword,
    Variable,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: Option<String>,
}

fn signature(name: &str, function: &Function) -> String {
    let mut text = format!("funcao {name}({})", function.parameters.join(", "));
    if let Some(ty) = function.return_type {
        let _ = write!(text, ": {ty}");
    }
    text
}

/// Hover text for the identifier at `position`
pub fn hover(buffer: &TokenBuffer, analysis: &Analysis, position: Position) -> Option<Hover> {
    let token = buffer.token_at(position)?;
    if !token.is_identifier() || analysis.role_of(token) == TokenRole::TypeAnnotation {
        return None;
    }
    let scope = analysis.scope_of(token);
    let name = token.text.as_str();

    let contents = if let Some(variable) = analysis.variable(scope, name) {
        let kind = if variable.constant { "Constante" } else { "Variável" };
        format!("{kind} {name}: {}", variable.ty)
    } else {
        let function = analysis.function(scope, name)?;
        let mut text = signature(name, function);
        if let Some(builtin) = builtin(name).filter(|_| function.builtin) {
            let _ = write!(text, "\n\n{}", builtin.description);
        }
        text
    };

    Some(Hover {
        start: token.start(),
        end: token.end(),
        contents,
    })
}

/// Keywords and the names visible at `position`, filtered by the identifier
/// being typed there
pub fn completions(buffer: &TokenBuffer, analysis: &Analysis, position: Position) -> Vec<Completion> {
    let typed = buffer
        .tokens()
        .iter()
        .find(|t| t.is_identifier() && t.end() == position);
    let prefix = typed.map_or("", |t| t.text.as_str());
    let scope = typed
        .or_else(|| buffer.token_before(position))
        .map_or(analysis.tree().root(), |t| analysis.scope_of(t));

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut push = |label: &str, kind: CompletionKind, detail: Option<String>| {
        if label.starts_with(prefix) && seen.insert(label.to_string()) {
            items.push(Completion {
                label: label.to_string(),
                kind,
                detail,
            });
        }
    };

    for keyword in Keyword::ALL {
        push(keyword.as_str(), CompletionKind::Keyword, None);
    }

    let scopes: Vec<&Scope> = analysis
        .tree()
        .ancestors(scope)
        .chain(std::iter::once(analysis.imported()))
        .collect();
    for scope in &scopes {
        let mut variables: Vec<_> = scope.variables().collect();
        variables.sort_by_key(|(name, _)| *name);
        for (name, variable) in variables {
            push(name, CompletionKind::Variable, Some(variable.ty.to_string()));
        }
    }
    for scope in &scopes {
        let mut functions: Vec<_> = scope.functions().collect();
        functions.sort_by_key(|(name, _)| *name);
        for (name, function) in functions {
            push(name, CompletionKind::Function, Some(signature(name, function)));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::sema::analyze;
    use pretty_assertions::assert_eq;

    fn setup(source: &str) -> (TokenBuffer, Analysis) {
        let buffer = tokenize(source).unwrap();
        let analysis = analyze(&buffer);
        (buffer, analysis)
    }

    fn hover_text(source: &str, line: usize, column: usize) -> Option<String> {
        let (buffer, analysis) = setup(source);
        hover(&buffer, &analysis, Position::new(line, column)).map(|h| h.contents)
    }

    #[test]
    fn test_hover_variable() {
        let source = "declare x = 1;\nconstante nome = \"a\";\nescrever(x + nome);";

        assert_eq!(hover_text(source, 3, 10).as_deref(), Some("Variável x: inteiro"));
        assert_eq!(hover_text(source, 3, 15).as_deref(), Some("Constante nome: cadeia"));
    }

    #[test]
    fn test_hover_functions() {
        let source = "funcao soma(a, b) { retorne a + b; }\nescrever(soma(1, 2));";

        assert_eq!(hover_text(source, 2, 11).as_deref(), Some("funcao soma(a, b)"));
        assert_eq!(
            hover_text(source, 2, 2).as_deref(),
            Some("funcao escrever(mensagem): cadeia\n\nEscreve um valor na saída padrão.")
        );
        assert_eq!(hover_text(source, 1, 13).as_deref(), Some("Variável a: desconhecido"));
    }

    #[test]
    fn test_hover_range_and_misses() {
        let (buffer, analysis) = setup("declare x inteiro;\ny;");
        let h = hover(&buffer, &analysis, Position::new(1, 9)).unwrap();

        assert_eq!((h.start, h.end), (Position::new(1, 9), Position::new(1, 10)));
        assert!(hover(&buffer, &analysis, Position::new(1, 11)).is_none());
        assert!(hover(&buffer, &analysis, Position::new(1, 1)).is_none());
        assert!(hover(&buffer, &analysis, Position::new(2, 1)).is_none());
    }

    #[test]
    fn test_completions_follow_scope() {
        let source = "declare total = 0;\nfuncao f(valor) {\n  escrever(va);\n}\nescrever(total);\n";
        let (buffer, analysis) = setup(source);

        let inside = completions(&buffer, &analysis, Position::new(3, 14));
        let labels: Vec<_> = inside.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["valor"]);

        let outside = completions(&buffer, &analysis, Position::new(6, 1));
        assert!(outside.iter().any(|c| c.label == "total"));
        assert!(outside.iter().any(|c| c.label == "f" && c.kind == CompletionKind::Function));
        assert!(!outside.iter().any(|c| c.label == "valor"));
        assert!(outside.iter().any(|c| c.label == "declare" && c.kind == CompletionKind::Keyword));
        assert_eq!(outside.iter().filter(|c| c.label == "escrever").count(), 1);
    }
}
