//! Lexer implementation using logos

use super::cursor::TokenBuffer;
use super::token::{Lexeme, Token, TokenKind};
use crate::common::{LineIndex, LintError, LintResult, Span};
use logos::Logos;

/// Lexer for Cobral source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Lexeme>,
    lines: LineIndex,
    count: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: Lexeme::lexer(source),
            lines: LineIndex::new(source),
            count: 0,
        }
    }

    /// Get the next token, `None` at end of input
    pub fn next_token(&mut self) -> LintResult<Option<Token>> {
        match self.inner.next() {
            Some(Ok(lexeme)) => {
                let span = Span::from(self.inner.span());
                let position = self.lines.position(self.inner.source(), span.start);
                let token = Token {
                    kind: TokenKind::from(lexeme),
                    text: self.inner.slice().to_string(),
                    span,
                    line: position.line,
                    column: position.column,
                    index: self.count,
                };
                self.count += 1;
                Ok(Some(token))
            }
            Some(Err(())) => {
                let span = Span::from(self.inner.span());
                let position = self.lines.position(self.inner.source(), span.start);
                Err(LintError::lexer(
                    format!(
                        "unexpected character '{}' at {}",
                        self.inner.slice(),
                        position
                    ),
                    span,
                ))
            }
            None => Ok(None),
        }
    }

    /// Tokenize the entire source into a buffer
    pub fn tokenize_all(mut self) -> LintResult<TokenBuffer> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(TokenBuffer::new(tokens, self.lines))
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

/// Tokenize `source` in one call
pub fn tokenize(source: &str) -> LintResult<TokenBuffer> {
    Lexer::new(source).tokenize_all()
}
