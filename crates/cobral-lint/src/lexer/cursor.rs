//! Shared token buffer and the rewindable cursors that walk it

use super::token::{Token, TokenKind};
use crate::common::{LineIndex, Position};

/// Immutable token sequence produced once per analysis run
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    lines: LineIndex,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<Token>, lines: LineIndex) -> Self {
        Self { tokens, lines }
    }

    /// All tokens, comments included
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// A fresh cursor positioned at the first token
    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::new(&self.tokens)
    }

    /// The non-comment token covering `position`, if any
    pub fn token_at(&self, position: Position) -> Option<&Token> {
        self.tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .find(|t| t.start() <= position && position < t.end())
    }

    /// The last non-comment token starting at or before `position`
    pub fn token_before(&self, position: Position) -> Option<&Token> {
        self.tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .take_while(|t| t.start() <= position)
            .last()
    }
}

/// Peekable, rewindable walk over the non-comment tokens of a buffer.
///
/// Cursors are cheap to copy; copying one gives an independent lookahead.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> Option<&'t Token> {
        while let Some(token) = self.tokens.get(self.position) {
            self.position += 1;
            if token.kind != TokenKind::Comment {
                return Some(token);
            }
        }
        None
    }

    /// Look at the next token without consuming it
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens[self.position.min(self.tokens.len())..]
            .iter()
            .find(|t| t.kind != TokenKind::Comment)
    }

    /// Look `n` tokens ahead, `peek_nth(0)` being `peek()`
    pub fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        let mut probe = *self;
        for _ in 0..n {
            probe.next_token()?;
        }
        probe.peek()
    }

    /// Step back over the previously consumed token and return it
    pub fn rewind(&mut self) -> Option<&'t Token> {
        while self.position > 0 {
            self.position -= 1;
            let token = &self.tokens[self.position];
            if token.kind != TokenKind::Comment {
                return Some(token);
            }
        }
        None
    }

    /// Move back to the start of the buffer
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_none()
    }
}
