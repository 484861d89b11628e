use super::span::Span;
use serde::Serialize;

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum Token {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Dot,
    Comma,
    Semicolon,

    // One or two character tokens.
    Bang,
    BangEq,
    Equals,
    DoubleEq,
    LeftAngle,
    LeftAngleEq,
    RightAngle,
    RightAngleEq,

    // Literals.
    Identifier(String),
    String(String),
    Number(f64),

    // Keywords.
    And,
    Create,
    Else,
    False,
    Func,
    For,
    If,
    Null,
    Not,
    Or,
    Output,
    Return,
    True,
    While,

    LexerError(String),
    EndOfFile,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}
