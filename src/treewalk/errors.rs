use super::object::Object;
use crate::frontend::grammar::{InfixOperator, PrefixOperator};
use crate::frontend::span::Span;

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum RuntimeErrorType {
    IllegalInfixOperands(InfixOperator, Object, Object),
    IllegalPrefixOperand(PrefixOperator, Object),
    DivideByZero,
    ModuloByZero,
    UndefinedVariable(String),
    WrongArity(usize, usize),
    NotCallable(Object),
    ReturnOutsideFunction,
    NativeFnError(String),
}

/// A runtime failure plus where it happened. Errors raised inside native
/// functions start without a span; the interpreter fills in the call site
/// when it has one.
#[derive(Debug, PartialEq, Clone)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub span: Option<Span>,
}

/// Result alias for operations that cannot know their source location.
pub type OpResult<T> = Result<T, RuntimeErrorType>;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, span: Option<Span>) -> Self {
        RuntimeError { error, span }
    }

    /// Attaches a span when none was recorded yet.
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Formats the error with the offending lexeme pulled out of the source.
    pub fn render(&self, source: &str) -> String {
        match self.span {
            Some(span) => match span.extract_string(source) {
                Some(lexeme) if !lexeme.trim().is_empty() => format!(
                    "[line {}] Runtime error at '{}': {}",
                    span.line(),
                    lexeme.trim(),
                    self.error
                ),
                _ => format!("[line {}] Runtime error: {}", span.line(), self.error),
            },
            None => format!("Runtime error: {}", self.error),
        }
    }
}

impl fmt::Display for RuntimeErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeErrorType::IllegalInfixOperands(InfixOperator::Add, lhs, rhs) => write!(
                f,
                "Operands must be two numbers or two strings (got {} and {}).",
                lhs.type_name(),
                rhs.type_name()
            ),
            RuntimeErrorType::IllegalInfixOperands(op, lhs, rhs) => write!(
                f,
                "Operands for '{}' must be numbers (got {} and {}).",
                op.symbol(),
                lhs.type_name(),
                rhs.type_name()
            ),
            RuntimeErrorType::IllegalPrefixOperand(op, value) => write!(
                f,
                "Operand for '{}' must be a number (got {}).",
                op.symbol(),
                value.type_name()
            ),
            RuntimeErrorType::DivideByZero => write!(f, "Division by zero."),
            RuntimeErrorType::ModuloByZero => write!(f, "Modulo by zero."),
            RuntimeErrorType::UndefinedVariable(name) => {
                write!(f, "Undefined variable '{}'.", name)
            }
            RuntimeErrorType::WrongArity(expected, got) => {
                write!(f, "Expected {} arguments but got {}.", expected, got)
            }
            RuntimeErrorType::NotCallable(value) => {
                write!(f, "Can only call functions (got {}).", value.type_name())
            }
            RuntimeErrorType::ReturnOutsideFunction => {
                write!(f, "Cannot return from top-level code.")
            }
            RuntimeErrorType::NativeFnError(message) => write!(f, "{}", message),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "[line {}] Runtime error: {}", span.line(), self.error),
            None => write!(f, "Runtime error: {}", self.error),
        }
    }
}
