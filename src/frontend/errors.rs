use super::span::Span;
use super::token::Token;

use std::fmt;

/// Ceiling carried over from the reference implementation of the language.
pub const MAX_FUNC_ARGS: usize = 255;

/// Grammar items named in "expected X after/before Y" diagnostics.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Item {
    VariableDecl,
    Expression,
    Condition,
    If,
    While,
    For,
    ForClause,
    OutputKeyword,
    OutputValue,
    ReturnValue,
    FunctionName,
    FunctionBody,
    Block,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ParserErrorType {
    ExpectedAfter(&'static str, Item),
    ExpectedBefore(&'static str, Item),
    ExpectedIdentifier,
    ExpectedExpr(Token),
    ExpectedLValue,
    ExpectedCommaBetween,
    TooManyArgs,
    TooManyParams,
    UnclosedBrace,
    IllegalToken(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ParserError {
    pub span: Span,
    pub error: ParserErrorType,
}

pub type ParserResult<T> = Result<T, ParserError>;

impl Item {
    fn label(&self) -> &'static str {
        match self {
            Item::VariableDecl => "variable declaration",
            Item::Expression => "expression",
            Item::Condition => "condition",
            Item::If => "'if'",
            Item::While => "'while'",
            Item::For => "'for'",
            Item::ForClause => "for clauses",
            Item::OutputKeyword => "'output'",
            Item::OutputValue => "output value",
            Item::ReturnValue => "return value",
            Item::FunctionName => "function name",
            Item::FunctionBody => "function body",
            Item::Block => "block",
        }
    }
}

impl fmt::Display for ParserErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserErrorType::ExpectedAfter(token, item) => {
                write!(f, "Expect '{}' after {}.", token, item.label())
            }
            ParserErrorType::ExpectedBefore(token, item) => {
                write!(f, "Expect '{}' before {}.", token, item.label())
            }
            ParserErrorType::ExpectedIdentifier => write!(f, "Expect identifier."),
            ParserErrorType::ExpectedExpr(got) => {
                write!(f, "Expect expression, found {:?}.", got)
            }
            ParserErrorType::ExpectedLValue => write!(f, "Invalid assignment target."),
            ParserErrorType::ExpectedCommaBetween => {
                write!(f, "Expect ',' between arguments.")
            }
            ParserErrorType::TooManyArgs => {
                write!(f, "Can't have more than {} arguments.", MAX_FUNC_ARGS)
            }
            ParserErrorType::TooManyParams => {
                write!(f, "Can't have more than {} parameters.", MAX_FUNC_ARGS)
            }
            ParserErrorType::UnclosedBrace => write!(f, "Expect '}}' after block."),
            ParserErrorType::IllegalToken(message) => write!(f, "{}", message),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.span.line(), self.error)
    }
}

impl ParserError {
    pub fn new(span: Span, error: ParserErrorType) -> Self {
        ParserError { span, error }
    }

    /// Formats the error with the offending lexeme pulled out of the source.
    pub fn render(&self, source: &str) -> String {
        match self.span.extract_string(source) {
            Some(lexeme) if !lexeme.trim().is_empty() => format!(
                "[line {}] Error at '{}': {}",
                self.span.line(),
                lexeme.trim(),
                self.error
            ),
            _ => format!("[line {}] Error: {}", self.span.line(), self.error),
        }
    }
}
