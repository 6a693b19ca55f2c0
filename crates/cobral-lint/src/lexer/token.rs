//! Token definitions for the Cobral lexer

use crate::common::{Position, Span};
use logos::Logos;
use std::fmt;

/// Token with its text and source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub line: usize,
    pub column: usize,
    /// Position of this token in its buffer, comments included
    pub index: usize,
}

impl Token {
    pub fn start(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Exclusive end position
    pub fn end(&self) -> Position {
        match self.text.rsplit_once('\n') {
            Some((head, tail)) => Position::new(
                self.line + head.matches('\n').count() + 1,
                tail.chars().count() + 1,
            ),
            None => Position::new(self.line, self.column + self.text.chars().count()),
        }
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_delimiter(&self, delimiter: Delimiter) -> bool {
        self.kind == TokenKind::Delimiter(delimiter)
    }

    pub fn is_operator(&self, operator: Operator) -> bool {
        self.kind == TokenKind::Operator(operator)
    }

    /// Contents of a string literal without the surrounding quotes
    pub fn unquoted(&self) -> &str {
        self.text
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(&self.text)
    }
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    Number,
    String,
    Operator(Operator),
    Delimiter(Delimiter),
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Declare,
    Constante,
    Funcao,
    Se,
    Senao,
    Para,
    Pare,
    Enquanto,
    Retorne,
    Importe,
    Escolha,
    Caso,
    Padrao,
    E,
    Ou,
    Nao,
    Verdadeiro,
    Falso,
}

impl Keyword {
    pub const ALL: [Keyword; 18] = [
        Keyword::Declare,
        Keyword::Constante,
        Keyword::Funcao,
        Keyword::Se,
        Keyword::Senao,
        Keyword::Para,
        Keyword::Pare,
        Keyword::Enquanto,
        Keyword::Retorne,
        Keyword::Importe,
        Keyword::Escolha,
        Keyword::Caso,
        Keyword::Padrao,
        Keyword::E,
        Keyword::Ou,
        Keyword::Nao,
        Keyword::Verdadeiro,
        Keyword::Falso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Declare => "declare",
            Keyword::Constante => "constante",
            Keyword::Funcao => "funcao",
            Keyword::Se => "se",
            Keyword::Senao => "senao",
            Keyword::Para => "para",
            Keyword::Pare => "pare",
            Keyword::Enquanto => "enquanto",
            Keyword::Retorne => "retorne",
            Keyword::Importe => "importe",
            Keyword::Escolha => "escolha",
            Keyword::Caso => "caso",
            Keyword::Padrao => "padrao",
            Keyword::E => "e",
            Keyword::Ou => "ou",
            Keyword::Nao => "nao",
            Keyword::Verdadeiro => "verdadeiro",
            Keyword::Falso => "falso",
        }
    }

    /// Keywords that introduce a declared name
    pub fn declares(&self) -> bool {
        matches!(self, Keyword::Declare | Keyword::Constante | Keyword::Funcao)
    }

    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, Keyword::Verdadeiro | Keyword::Falso)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Lt,
    Gt,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Assign => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::EqEq => "==",
            Operator::NotEq => "!=",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::EqEq | Operator::NotEq | Operator::Lt | Operator::Gt | Operator::LtEq | Operator::GtEq
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semi,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::LBrace => "{",
            Delimiter::RBrace => "}",
            Delimiter::LParen => "(",
            Delimiter::RParen => ")",
            Delimiter::LBracket => "[",
            Delimiter::RBracket => "]",
            Delimiter::Comma => ",",
            Delimiter::Semi => ";",
        }
    }
}

/// Raw lexemes recognized by the generated scanner
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[\s\u{FEFF}]+")] // Skip whitespace, including BOM and NBSP
pub(super) enum Lexeme {
    // === Keywords ===
    #[token("declare")]
    Declare,
    #[token("constante")]
    Constante,
    #[token("funcao")]
    Funcao,
    #[token("se")]
    Se,
    #[token("senao")]
    Senao,
    #[token("para")]
    Para,
    #[token("pare")]
    Pare,
    #[token("enquanto")]
    Enquanto,
    #[token("retorne")]
    Retorne,
    #[token("importe")]
    Importe,
    #[token("escolha")]
    Escolha,
    #[token("caso")]
    Caso,
    #[token("padrao")]
    Padrao,
    #[token("e")]
    E,
    #[token("ou")]
    Ou,
    #[token("nao")]
    Nao,
    #[token("verdadeiro")]
    Verdadeiro,
    #[token("falso")]
    Falso,

    // === Identifiers ===
    #[regex(r"[\p{L}_][\p{L}0-9_]*", priority = 1)]
    Identifier,

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // === Comments ===
    #[regex(r"//[^\n]*")]
    LineComment,

    // An unterminated block comment runs to the end of the source
    #[token("/*", block_comment)]
    BlockComment,
}

fn block_comment(lex: &mut logos::Lexer<Lexeme>) {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(rest.len()),
    }
}

impl From<Lexeme> for TokenKind {
    fn from(lexeme: Lexeme) -> Self {
        match lexeme {
            Lexeme::Declare => TokenKind::Keyword(Keyword::Declare),
            Lexeme::Constante => TokenKind::Keyword(Keyword::Constante),
            Lexeme::Funcao => TokenKind::Keyword(Keyword::Funcao),
            Lexeme::Se => TokenKind::Keyword(Keyword::Se),
            Lexeme::Senao => TokenKind::Keyword(Keyword::Senao),
            Lexeme::Para => TokenKind::Keyword(Keyword::Para),
            Lexeme::Pare => TokenKind::Keyword(Keyword::Pare),
            Lexeme::Enquanto => TokenKind::Keyword(Keyword::Enquanto),
            Lexeme::Retorne => TokenKind::Keyword(Keyword::Retorne),
            Lexeme::Importe => TokenKind::Keyword(Keyword::Importe),
            Lexeme::Escolha => TokenKind::Keyword(Keyword::Escolha),
            Lexeme::Caso => TokenKind::Keyword(Keyword::Caso),
            Lexeme::Padrao => TokenKind::Keyword(Keyword::Padrao),
            Lexeme::E => TokenKind::Keyword(Keyword::E),
            Lexeme::Ou => TokenKind::Keyword(Keyword::Ou),
            Lexeme::Nao => TokenKind::Keyword(Keyword::Nao),
            Lexeme::Verdadeiro => TokenKind::Keyword(Keyword::Verdadeiro),
            Lexeme::Falso => TokenKind::Keyword(Keyword::Falso),
            Lexeme::Identifier => TokenKind::Identifier,
            Lexeme::Number => TokenKind::Number,
            Lexeme::String => TokenKind::String,
            Lexeme::Plus => TokenKind::Operator(Operator::Plus),
            Lexeme::Minus => TokenKind::Operator(Operator::Minus),
            Lexeme::Star => TokenKind::Operator(Operator::Star),
            Lexeme::Slash => TokenKind::Operator(Operator::Slash),
            Lexeme::Percent => TokenKind::Operator(Operator::Percent),
            Lexeme::Assign => TokenKind::Operator(Operator::Assign),
            Lexeme::Lt => TokenKind::Operator(Operator::Lt),
            Lexeme::Gt => TokenKind::Operator(Operator::Gt),
            Lexeme::EqEq => TokenKind::Operator(Operator::EqEq),
            Lexeme::NotEq => TokenKind::Operator(Operator::NotEq),
            Lexeme::LtEq => TokenKind::Operator(Operator::LtEq),
            Lexeme::GtEq => TokenKind::Operator(Operator::GtEq),
            Lexeme::LBrace => TokenKind::Delimiter(Delimiter::LBrace),
            Lexeme::RBrace => TokenKind::Delimiter(Delimiter::RBrace),
            Lexeme::LParen => TokenKind::Delimiter(Delimiter::LParen),
            Lexeme::RParen => TokenKind::Delimiter(Delimiter::RParen),
            Lexeme::LBracket => TokenKind::Delimiter(Delimiter::LBracket),
            Lexeme::RBracket => TokenKind::Delimiter(Delimiter::RBracket),
            Lexeme::Comma => TokenKind::Delimiter(Delimiter::Comma),
            Lexeme::Semi => TokenKind::Delimiter(Delimiter::Semi),
            Lexeme::LineComment | Lexeme::BlockComment => TokenKind::Comment,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword '{}'", k.as_str()),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Operator(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::Delimiter(d) => write!(f, "'{}'", d.as_str()),
            TokenKind::Comment => write!(f, "comment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, line: usize, column: usize) -> Token {
        Token {
            kind: TokenKind::Comment,
            text: text.to_string(),
            span: Span::default(),
            line,
            column,
            index: 0,
        }
    }

    #[test]
    fn test_end_position_single_line() {
        assert_eq!(token("soma", 2, 5).end(), Position::new(2, 9));
        assert_eq!(token("ação", 1, 1).end(), Position::new(1, 5));
    }

    #[test]
    fn test_end_position_multi_line() {
        assert_eq!(token("/* a\nbc\nd */", 3, 4).end(), Position::new(5, 5));
    }

    #[test]
    fn test_unquoted() {
        let mut t = token("\"lib.cl\"", 1, 1);
        t.kind = TokenKind::String;
        assert_eq!(t.unquoted(), "lib.cl");
    }

    #[test]
    fn test_keyword_table_round_trips_names() {
        for keyword in Keyword::ALL {
            let mut lex = Lexeme::lexer(keyword.as_str());
            let kind = TokenKind::from(lex.next().unwrap().unwrap());
            assert_eq!(kind, TokenKind::Keyword(keyword));
        }
    }
}
