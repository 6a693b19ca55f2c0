//! Lexer module for tokenizing Cobral source code

mod cursor;
mod scanner;
mod token;

pub use cursor::{TokenBuffer, TokenCursor};
pub use scanner::{tokenize, Lexer};
pub use token::{Delimiter, Keyword, Operator, Token, TokenKind};
