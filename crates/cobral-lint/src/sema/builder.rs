//! Scope tree builder
//!
//! Walks the token buffer once, without a parser, and records:
//! - function and loop scopes with their declarations
//! - the scope in effect at every token
//! - which identifiers are declaration sites or type annotations

use tracing::debug;

use crate::lexer::{Delimiter, Keyword, Operator, Token, TokenBuffer, TokenCursor, TokenKind};

use super::analysis::{Analysis, TokenRole};
use super::builtins::builtin;
use super::scope::{Function, ScopeId, ScopeKind, ScopeTree, Variable};
use super::types::ValueType;

/// How far an open function or loop scope extends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    /// Header parsed, body not started yet
    Pending,
    /// Ends with the `}` closing this brace depth
    Braced(usize),
    /// Brace-less body ending at the next `;` at this depth
    Statement(usize),
}

#[derive(Debug)]
struct Frame {
    scope: ScopeId,
    body: Body,
}

/// Builds an [`Analysis`] from a token buffer
pub struct ScopeBuilder<'t> {
    cursor: TokenCursor<'t>,
    tree: ScopeTree,
    stack: Vec<Frame>,
    depth: usize,
    scopes: Vec<ScopeId>,
    roles: Vec<TokenRole>,
}

impl<'t> ScopeBuilder<'t> {
    pub fn new(buffer: &'t TokenBuffer) -> Self {
        let tree = ScopeTree::new();
        let root = tree.root();
        Self {
            cursor: buffer.cursor(),
            tree,
            stack: Vec::new(),
            depth: 0,
            scopes: vec![root; buffer.len()],
            roles: vec![TokenRole::Reference; buffer.len()],
        }
    }

    pub fn build(mut self) -> Analysis {
        while let Some(token) = self.advance() {
            self.settle_pending(token);
            match token.kind {
                TokenKind::Keyword(Keyword::Funcao) => self.function(token),
                TokenKind::Keyword(Keyword::Para) => self.loop_header(token),
                TokenKind::Keyword(Keyword::Declare | Keyword::Constante) => self.declaration(token),
                TokenKind::Delimiter(Delimiter::LBrace) => self.depth += 1,
                TokenKind::Delimiter(Delimiter::RBrace) => self.close_brace(),
                TokenKind::Delimiter(Delimiter::Semi) => self.end_statement(),
                _ => {}
            }
        }

        debug!(
            scopes = self.tree.len(),
            tokens = self.scopes.len(),
            "built scope tree"
        );
        Analysis::new(self.tree, self.scopes, self.roles)
    }

    fn current(&self) -> ScopeId {
        self.stack.last().map_or(self.tree.root(), |frame| frame.scope)
    }

    /// Consume the next token, recording the scope it appears in
    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.cursor.next_token()?;
        self.scopes[token.index] = self.current();
        Some(token)
    }

    fn advance_if(&mut self, accept: impl Fn(&Token) -> bool) -> Option<&'t Token> {
        match self.cursor.peek() {
            Some(token) if accept(token) => self.advance(),
            _ => None,
        }
    }

    fn enter(&mut self, scope: ScopeId) {
        self.stack.push(Frame {
            scope,
            body: Body::Pending,
        });
    }

    /// The first token after a function or loop header decides its body shape
    fn settle_pending(&mut self, token: &Token) {
        let depth = self.depth;
        if let Some(frame) = self.stack.last_mut() {
            if frame.body == Body::Pending {
                frame.body = if token.is_delimiter(Delimiter::LBrace) {
                    Body::Braced(depth + 1)
                } else {
                    Body::Statement(depth)
                };
            }
        }
    }

    fn close_brace(&mut self) {
        let depth = self.depth;
        while matches!(self.stack.last(), Some(Frame { body: Body::Statement(d), .. }) if *d >= depth) {
            self.stack.pop();
        }
        if matches!(self.stack.last(), Some(Frame { body: Body::Braced(d), .. }) if *d == depth) {
            self.stack.pop();
        }
        self.depth = depth.saturating_sub(1);
        // A block closing a one-statement body also ends that statement
        self.end_statement();
    }

    fn end_statement(&mut self) {
        let depth = self.depth;
        while matches!(self.stack.last(), Some(Frame { body: Body::Statement(d), .. }) if *d == depth) {
            self.stack.pop();
        }
    }

    /// `funcao nome(a, b) { ... }`
    fn function(&mut self, keyword: &Token) {
        let Some(name) = self.advance_if(Token::is_identifier) else {
            return;
        };
        self.roles[name.index] = TokenRole::Declaration;

        let outer = self.current();
        let scope = self.tree.add_child(
            outer,
            ScopeKind::Function {
                name: name.text.clone(),
            },
            format!("function:{}:{}:{}", name.text, keyword.line, keyword.column),
        );
        self.enter(scope);

        let mut parameters = Vec::new();
        if self.advance_if(|t| t.is_delimiter(Delimiter::LParen)).is_some() {
            while let Some(next) = self.cursor.peek() {
                if next.is_delimiter(Delimiter::LBrace) {
                    break;
                }
                self.advance();
                if next.is_delimiter(Delimiter::RParen) {
                    break;
                }
                if next.is_identifier() {
                    self.roles[next.index] = TokenRole::Declaration;
                    self.tree.get_mut(scope).define_variable(
                        next.text.clone(),
                        Variable {
                            ty: ValueType::Unknown,
                            constant: false,
                            declared_at: Some(next.index),
                        },
                    );
                    parameters.push(next.text.clone());
                }
            }
        }

        self.tree.get_mut(outer).define_function(
            name.text.clone(),
            Function {
                parameters,
                return_type: None,
                declared_at: Some(name.index),
                builtin: false,
            },
        );
    }

    /// `para (declare i = 0; i < n; i = i + 1) { ... }`
    fn loop_header(&mut self, keyword: &Token) {
        let scope = self.tree.add_child(
            self.current(),
            ScopeKind::Loop,
            format!("loop:{}:{}", keyword.line, keyword.column),
        );
        self.enter(scope);

        if self.advance_if(|t| t.is_delimiter(Delimiter::LParen)).is_none() {
            return;
        }

        // Initializer clause: only its bindings matter
        while let Some(next) = self.cursor.peek() {
            if next.is_delimiter(Delimiter::LBrace) {
                return;
            }
            self.advance();
            match next.kind {
                TokenKind::Delimiter(Delimiter::Semi) => break,
                TokenKind::Delimiter(Delimiter::RParen) => return,
                TokenKind::Keyword(Keyword::Declare | Keyword::Constante) => self.declaration(next),
                _ => {}
            }
        }

        // Condition and update clauses, skipped up to the matching `)`
        let mut parens = 1;
        while parens > 0 {
            let Some(next) = self.cursor.peek() else {
                break;
            };
            if next.is_delimiter(Delimiter::LBrace) {
                break;
            }
            self.advance();
            match next.kind {
                TokenKind::Delimiter(Delimiter::LParen) => parens += 1,
                TokenKind::Delimiter(Delimiter::RParen) => parens -= 1,
                _ => {}
            }
        }
    }

    /// `declare x`, `declare constante x`, `constante x`, each with an
    /// optional type annotation and initializer
    fn declaration(&mut self, keyword: &Token) {
        let mut constant = keyword.is_keyword(Keyword::Constante);
        if keyword.is_keyword(Keyword::Declare)
            && self.advance_if(|t| t.is_keyword(Keyword::Constante)).is_some()
        {
            constant = true;
        }

        let Some(name) = self.advance_if(Token::is_identifier) else {
            return;
        };
        self.roles[name.index] = TokenRole::Declaration;

        let mut ty = ValueType::Unknown;
        let line = name.line;
        if let Some(annotation) = self.advance_if(|t| t.is_identifier() && t.line == line) {
            self.roles[annotation.index] = TokenRole::TypeAnnotation;
            ty = ValueType::from_annotation(&annotation.text);
        }
        if !ty.is_known() {
            ty = self.infer_initializer();
        }

        let scope = self.current();
        self.tree.get_mut(scope).define_variable(
            name.text.clone(),
            Variable {
                ty,
                constant,
                declared_at: Some(name.index),
            },
        );
    }

    /// Type of a `= <operand>` initializer made of a single literal, a
    /// variable, or a call
    fn infer_initializer(&self) -> ValueType {
        let mut probe = self.cursor;
        if !probe
            .next_token()
            .is_some_and(|t| t.is_operator(Operator::Assign))
        {
            return ValueType::Unknown;
        }
        let Some(operand) = probe.next_token() else {
            return ValueType::Unknown;
        };
        let after = probe.peek();

        if after.is_some_and(|t| t.is_delimiter(Delimiter::LParen)) && operand.is_identifier() {
            return builtin(&operand.text)
                .map(|b| b.return_type)
                .or_else(|| {
                    self.tree
                        .lookup_function(self.current(), &operand.text)
                        .and_then(|f| f.return_type)
                })
                .unwrap_or_default();
        }

        let ends_here = after.is_none_or(|t| {
            t.line > operand.line
                || matches!(
                    t.kind,
                    TokenKind::Delimiter(
                        Delimiter::Semi | Delimiter::RBrace | Delimiter::RParen | Delimiter::Comma
                    )
                )
        });
        if !ends_here {
            return ValueType::Unknown;
        }

        if let Some(ty) = ValueType::of_literal(operand) {
            return ty;
        }
        if operand.is_identifier() {
            return self
                .tree
                .lookup_variable(self.current(), &operand.text)
                .map(|v| v.ty)
                .unwrap_or_default();
        }
        ValueType::Unknown
    }
}

/// Build the scope tree of a token buffer
pub fn analyze(buffer: &TokenBuffer) -> Analysis {
    ScopeBuilder::new(buffer).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> (TokenBuffer, Analysis) {
        let buffer = tokenize(source).unwrap();
        let analysis = analyze(&buffer);
        (buffer, analysis)
    }

    fn scope_names(analysis: &Analysis) -> Vec<String> {
        analysis.tree().iter().map(|(_, s)| s.name.clone()).collect()
    }

    fn find<'b>(buffer: &'b TokenBuffer, text: &str, nth: usize) -> &'b Token {
        buffer.tokens().iter().filter(|t| t.text == text).nth(nth).unwrap()
    }

    #[test]
    fn test_global_declarations() {
        let (_, analysis) = build("declare x = 1;\nconstante nome = \"a\";\ndeclare constante pi = 3.14;");
        let root = analysis.tree().get(analysis.tree().root());

        assert_eq!(root.variable("x").unwrap().ty, ValueType::Integer);
        assert!(!root.variable("x").unwrap().constant);
        assert_eq!(root.variable("nome").unwrap().ty, ValueType::String);
        assert!(root.variable("nome").unwrap().constant);
        assert_eq!(root.variable("pi").unwrap().ty, ValueType::Float);
        assert!(root.variable("pi").unwrap().constant);
        assert!(root.variable("constante").is_none());
    }

    #[test]
    fn test_function_scope_and_parameters() {
        let (buffer, analysis) = build("funcao soma(a, b) {\n  retorne a + b;\n}\nescrever(soma(1, 2));");
        let tree = analysis.tree();

        assert_eq!(scope_names(&analysis), vec!["global", "function:soma:1:1"]);
        let func = tree.find("function:soma:1:1").unwrap();
        assert!(tree.get(func).variable("a").is_some());
        assert!(tree.get(func).variable("b").is_some());
        assert_eq!(
            tree.get(tree.root()).function("soma").unwrap().parameters,
            vec!["a".to_string(), "b".to_string()]
        );

        assert_eq!(analysis.scope_of(find(&buffer, "soma", 0)), tree.root());
        assert_eq!(analysis.scope_of(find(&buffer, "a", 1)), func);
        assert_eq!(analysis.scope_of(find(&buffer, "}", 0)), func);
        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 0)), tree.root());
        assert_eq!(analysis.role_of(find(&buffer, "a", 0)), TokenRole::Declaration);
        assert_eq!(analysis.role_of(find(&buffer, "a", 1)), TokenRole::Reference);
    }

    #[test]
    fn test_nested_blocks_do_not_close_function() {
        let (buffer, analysis) = build("funcao f(x) {\n  se (x > 1) { escrever(x); }\n  retorne x;\n}\nf(1);");
        let func = analysis.tree().find("function:f:1:1").unwrap();

        assert_eq!(analysis.scope_of(find(&buffer, "retorne", 0)), func);
        assert_eq!(analysis.scope_of(find(&buffer, "f", 1)), analysis.tree().root());
    }

    #[test]
    fn test_loop_scope() {
        let (buffer, analysis) = build("para (declare i = 0; i < 10; i = i + 1) {\n  escrever(i);\n}\nescrever(1);");
        let tree = analysis.tree();
        let lp = tree.find("loop:1:1").unwrap();

        assert_eq!(tree.get(lp).variable("i").unwrap().ty, ValueType::Integer);
        assert!(tree.get(tree.root()).variable("i").is_none());
        assert_eq!(analysis.scope_of(find(&buffer, "i", 1)), lp);
        assert_eq!(analysis.scope_of(find(&buffer, "i", 4)), lp);
        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 1)), tree.root());
    }

    #[test]
    fn test_loop_inside_function() {
        let (_, analysis) = build("funcao f() {\n  para (declare i = 0; i < 3; i = i + 1) { }\n}");
        let tree = analysis.tree();
        let func = tree.find("function:f:1:1").unwrap();
        let lp = tree.find("loop:2:3").unwrap();

        assert_eq!(tree.get(lp).parent, Some(func));
        assert_eq!(tree.get(func).children, vec![lp]);
    }

    #[test]
    fn test_type_annotation_wins() {
        let (buffer, analysis) = build("declare x real = 1;");
        let root = analysis.tree().get(analysis.tree().root());

        assert_eq!(root.variable("x").unwrap().ty, ValueType::Float);
        assert_eq!(analysis.role_of(find(&buffer, "real", 0)), TokenRole::TypeAnnotation);
    }

    #[test]
    fn test_initializer_inference() {
        let (_, analysis) = build(
            "declare a = ler();\ndeclare b = a;\ndeclare c = 1 + 2;\ndeclare d = verdadeiro\ndeclare conv = real(a);",
        );
        let root = analysis.tree().get(analysis.tree().root());

        assert_eq!(root.variable("a").unwrap().ty, ValueType::String);
        assert_eq!(root.variable("b").unwrap().ty, ValueType::String);
        assert_eq!(root.variable("c").unwrap().ty, ValueType::Unknown);
        assert_eq!(root.variable("d").unwrap().ty, ValueType::Boolean);
        assert_eq!(root.variable("conv").unwrap().ty, ValueType::Float);
    }

    #[test]
    fn test_malformed_constructs_degrade() {
        let (_, analysis) = build("declare ;\nfuncao (\npara\ndeclare y = 2;");
        let tree = analysis.tree();

        assert!(tree.iter().any(|(_, s)| s.variable("y").is_some()));
        assert_eq!(tree.get(tree.root()).user_functions().count(), 0);
    }

    #[test]
    fn test_unbalanced_braces_are_tolerated() {
        let (_, analysis) = build("}\n}\nfuncao f() {\ndeclare x = 1;");
        let tree = analysis.tree();
        let func = tree.find("function:f:3:1").unwrap();

        assert!(tree.get(func).variable("x").is_some());
    }

    #[test]
    fn test_braceless_loop_body_ends_at_semicolon() {
        let (buffer, analysis) = build("para (declare i = 0; i < 3; i = i + 1) escrever(i);\nescrever(2);");
        let lp = analysis.tree().find("loop:1:1").unwrap();

        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 0)), lp);
        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 1)), analysis.tree().root());
    }

    #[test]
    fn test_braceless_loop_body_ends_with_its_block() {
        let (buffer, analysis) =
            build("para (declare i = 0; i < 3; i = i + 1) se (i > 1) { escrever(i); }\nescrever(i);");
        let lp = analysis.tree().find("loop:1:1").unwrap();

        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 0)), lp);
        assert_eq!(analysis.scope_of(find(&buffer, "escrever", 1)), analysis.tree().root());
        assert!(!analysis.is_defined(analysis.tree().root(), "i"));
    }
}
