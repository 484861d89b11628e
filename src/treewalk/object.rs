use super::errors::{OpResult, RuntimeError, RuntimeErrorType, RuntimeResult};
use super::function::CosmoFn;
use super::interpreter::Interpreter;
use super::native_function::NativeFn;
use crate::frontend::grammar::{InfixOperator, PrefixOperator};

use std::fmt;

/// A runtime value. Numbers are f64; there are no list or object shapes.
#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Number(f64),
    Boolean(bool),
    String(String),
    Nil,
    NativeFunc(NativeFn),
    CosmoFunc(CosmoFn),
}

impl Object {
    /// Truthiness: `null` is false, `0` is false, booleans pass through,
    /// everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Nil => false,
            Object::Boolean(b) => *b,
            Object::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Number(_) => "number",
            Object::String(_) => "string",
            Object::Boolean(_) => "boolean",
            Object::Nil => "null",
            Object::NativeFunc(_) | Object::CosmoFunc(_) => "function",
        }
    }

    pub fn execute(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<'_>,
    ) -> RuntimeResult<Object> {
        match self {
            Object::NativeFunc(f) => f.execute(args).map_err(|e| RuntimeError::new(e, None)),
            Object::CosmoFunc(f) => f.execute(args, interpreter),
            _ => Err(RuntimeError::new(
                RuntimeErrorType::NotCallable(self.clone()),
                None,
            )),
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> OpResult<Object> {
        match op {
            InfixOperator::Add => match (lhs, rhs) {
                (Object::Number(a), Object::Number(b)) => Ok(Object::Number(a + b)),
                (Object::String(a), Object::String(b)) => Ok(Object::String(a + &b)),
                // One string operand stringifies the other.
                (a @ Object::String(_), b) | (a, b @ Object::String(_)) => {
                    Ok(Object::String(format!("{}{}", a, b)))
                }
                (a, b) => Err(RuntimeErrorType::IllegalInfixOperands(op, a, b)),
            },
            InfixOperator::Subtract => numerical_binop(op, lhs, rhs, |a, b| Object::Number(a - b)),
            InfixOperator::Multiply => numerical_binop(op, lhs, rhs, |a, b| Object::Number(a * b)),
            InfixOperator::Divide => match (lhs, rhs) {
                (Object::Number(a), Object::Number(b)) => {
                    if b != 0.0 {
                        Ok(Object::Number(a / b))
                    } else {
                        Err(RuntimeErrorType::DivideByZero)
                    }
                }
                (lhs, rhs) => Err(RuntimeErrorType::IllegalInfixOperands(op, lhs, rhs)),
            },
            InfixOperator::Modulo => match (lhs, rhs) {
                (Object::Number(a), Object::Number(b)) => {
                    if b != 0.0 {
                        Ok(Object::Number(a % b))
                    } else {
                        Err(RuntimeErrorType::ModuloByZero)
                    }
                }
                (lhs, rhs) => Err(RuntimeErrorType::IllegalInfixOperands(op, lhs, rhs)),
            },
            InfixOperator::EqualTo => Ok(Object::Boolean(lhs == rhs)),
            InfixOperator::NotEqualTo => Ok(Object::Boolean(lhs != rhs)),
            InfixOperator::GreaterEq => {
                numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a >= b))
            }
            InfixOperator::GreaterThan => {
                numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a > b))
            }
            InfixOperator::LessEq => numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a <= b)),
            InfixOperator::LessThan => numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a < b)),
        }
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> OpResult<Object> {
        match op {
            PrefixOperator::Negate => match value {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(RuntimeErrorType::IllegalPrefixOperand(op, value)),
            },
            PrefixOperator::LogicalNot => Ok(Object::Boolean(!value.is_truthy())),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Number(n) => write!(f, "{}", n),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => write!(f, "{}", s),
            Object::Nil => write!(f, "null"),
            Object::NativeFunc(func) => write!(f, "<native fn {}>", func.name()),
            Object::CosmoFunc(func) => write!(f, "<fn {}>", func.name()),
        }
    }
}

fn numerical_binop<F>(op: InfixOperator, lhs: Object, rhs: Object, func: F) -> OpResult<Object>
where
    F: Fn(f64, f64) -> Object,
{
    match (lhs, rhs) {
        (Object::Number(a), Object::Number(b)) => Ok(func(a, b)),
        (a, b) => Err(RuntimeErrorType::IllegalInfixOperands(op, a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Object::Nil.is_truthy());
        assert!(!Object::Number(0.0).is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(Object::Number(0.5).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
    }

    #[test]
    fn test_stringification() {
        assert_eq!(Object::Number(6.0).to_string(), "6");
        assert_eq!(Object::Number(1.5).to_string(), "1.5");
        assert_eq!(Object::Nil.to_string(), "null");
        assert_eq!(Object::Boolean(true).to_string(), "true");
        assert_eq!(Object::String("hi".to_owned()).to_string(), "hi");
    }

    #[test]
    fn test_plus_overloads() {
        let add = |a, b| Object::apply_infix_op(InfixOperator::Add, a, b);
        assert_eq!(
            add(Object::Number(1.0), Object::Number(2.0)),
            Ok(Object::Number(3.0))
        );
        assert_eq!(
            add(
                Object::String("a".to_owned()),
                Object::String("b".to_owned())
            ),
            Ok(Object::String("ab".to_owned()))
        );
        assert_eq!(
            add(Object::String("n = ".to_owned()), Object::Number(3.0)),
            Ok(Object::String("n = 3".to_owned()))
        );
        assert_eq!(
            add(Object::Number(3.0), Object::String("!".to_owned())),
            Ok(Object::String("3!".to_owned()))
        );
        assert!(add(Object::Number(1.0), Object::Nil).is_err());
    }

    #[test]
    fn test_zero_divisors() {
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Divide, Object::Number(1.0), Object::Number(0.0)),
            Err(RuntimeErrorType::DivideByZero)
        );
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Modulo, Object::Number(1.0), Object::Number(0.0)),
            Err(RuntimeErrorType::ModuloByZero)
        );
    }

    #[test]
    fn test_null_equality() {
        let eq = |a, b| Object::apply_infix_op(InfixOperator::EqualTo, a, b);
        assert_eq!(eq(Object::Nil, Object::Nil), Ok(Object::Boolean(true)));
        assert_eq!(
            eq(Object::Nil, Object::Number(0.0)),
            Ok(Object::Boolean(false))
        );
    }

    #[test]
    fn test_comparison_requires_numbers() {
        let result = Object::apply_infix_op(
            InfixOperator::LessThan,
            Object::String("a".to_owned()),
            Object::Number(1.0),
        );
        assert!(matches!(
            result,
            Err(RuntimeErrorType::IllegalInfixOperands(_, _, _))
        ));
    }
}
