use super::errors::{OpResult, RuntimeErrorType};
use super::object::Object;

use rand::Rng;
use std::fmt;
use std::rc::Rc;

type FnType = fn(Vec<Object>) -> OpResult<Object>;

pub struct NativeFnData {
    pub func: FnType,
    pub arity: usize,
    pub name: String,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    fn new(name: &str, func: FnType, arity: usize) -> Self {
        let name = name.to_owned();
        let data = NativeFnData { func, arity, name };
        NativeFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn execute(&self, args: Vec<Object>) -> OpResult<Object> {
        if self.0.arity == args.len() {
            (self.0.func)(args)
        } else {
            Err(RuntimeErrorType::WrongArity(self.0.arity, args.len()))
        }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native fn {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // You cannot derive Eq for function pointers in Rust. Also, LLVM
    // can combine two different functions into one that have identical
    // bodies. Wrap function pointer in Rc and compare the Rcs.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeFn {}

/// The whole standard library. Registered into the global environment when
/// an interpreter is constructed; not extensible from the language.
pub fn get_native_funcs() -> Vec<NativeFn> {
    vec![
        NativeFn::new("add", add, 2),
        NativeFn::new("sqrt", sqrt, 1),
        NativeFn::new("clock", clock, 0),
        NativeFn::new("random", random, 0),
        NativeFn::new("abs", abs, 1),
        NativeFn::new("substring", substring, 3),
        NativeFn::new("length", length, 1),
        NativeFn::new("typeof", type_of, 1),
    ]
}

fn add(args: Vec<Object>) -> OpResult<Object> {
    match (&args[0], &args[1]) {
        (Object::Number(a), Object::Number(b)) => Ok(Object::Number(a + b)),
        (a, b) => Err(RuntimeErrorType::NativeFnError(format!(
            "Operands for 'add' must both be numbers (got {} and {}).",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn sqrt(args: Vec<Object>) -> OpResult<Object> {
    match &args[0] {
        Object::Number(n) if *n >= 0.0 => Ok(Object::Number(n.sqrt())),
        Object::Number(_) => Err(RuntimeErrorType::NativeFnError(
            "Operand for 'sqrt' must not be negative.".to_owned(),
        )),
        other => Err(RuntimeErrorType::NativeFnError(format!(
            "Operand for 'sqrt' must be a number (got {}).",
            other.type_name()
        ))),
    }
}

fn clock(_args: Vec<Object>) -> OpResult<Object> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("SystemTime before UNIX EPOCH.");

    Ok(Object::Number(duration.as_secs_f64()))
}

fn random(_args: Vec<Object>) -> OpResult<Object> {
    Ok(Object::Number(rand::thread_rng().gen::<f64>()))
}

fn abs(args: Vec<Object>) -> OpResult<Object> {
    match &args[0] {
        Object::Number(n) => Ok(Object::Number(n.abs())),
        other => Err(RuntimeErrorType::NativeFnError(format!(
            "Operand for 'abs' must be a number (got {}).",
            other.type_name()
        ))),
    }
}

fn substring(args: Vec<Object>) -> OpResult<Object> {
    let s = match &args[0] {
        Object::String(s) => s,
        other => {
            return Err(RuntimeErrorType::NativeFnError(format!(
                "First argument for 'substring' must be a string (got {}).",
                other.type_name()
            )))
        }
    };
    let (start, end) = match (&args[1], &args[2]) {
        (Object::Number(a), Object::Number(b)) => (*a, *b),
        (a, b) => {
            return Err(RuntimeErrorType::NativeFnError(format!(
                "Second and third arguments for 'substring' must be numbers (got {} and {}).",
                a.type_name(),
                b.type_name()
            )))
        }
    };

    // JavaScript String.prototype.substring: NaN and negatives clamp to 0,
    // indices clamp to the length, and the bounds swap when reversed.
    let chars: Vec<char> = s.chars().collect();
    let clamp = |n: f64| -> usize {
        if n.is_nan() || n < 0.0 {
            0
        } else {
            (n.trunc() as usize).min(chars.len())
        }
    };
    let (mut start, mut end) = (clamp(start), clamp(end));
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    Ok(Object::String(chars[start..end].iter().collect()))
}

fn length(args: Vec<Object>) -> OpResult<Object> {
    match &args[0] {
        Object::String(s) => Ok(Object::Number(s.chars().count() as f64)),
        other => Err(RuntimeErrorType::NativeFnError(format!(
            "Argument for 'length' must be a string (got {}).",
            other.type_name()
        ))),
    }
}

fn type_of(args: Vec<Object>) -> OpResult<Object> {
    Ok(Object::String(args[0].type_name().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(name: &str) -> NativeFn {
        get_native_funcs()
            .into_iter()
            .find(|f| f.name() == name)
            .unwrap()
    }

    #[test]
    fn test_add_checks_types() {
        assert_eq!(
            native("add").execute(vec![Object::Number(2.0), Object::Number(3.0)]),
            Ok(Object::Number(5.0))
        );
        assert!(native("add")
            .execute(vec![Object::String("a".to_owned()), Object::Number(3.0)])
            .is_err());
    }

    #[test]
    fn test_arity_is_enforced() {
        assert_eq!(
            native("sqrt").execute(vec![]),
            Err(RuntimeErrorType::WrongArity(1, 0))
        );
    }

    #[test]
    fn test_sqrt_rejects_negative() {
        assert_eq!(
            native("sqrt").execute(vec![Object::Number(9.0)]),
            Ok(Object::Number(3.0))
        );
        assert!(native("sqrt").execute(vec![Object::Number(-1.0)]).is_err());
    }

    #[test]
    fn test_substring_clamps_and_swaps() {
        let sub = |s: &str, a: f64, b: f64| {
            native("substring").execute(vec![
                Object::String(s.to_owned()),
                Object::Number(a),
                Object::Number(b),
            ])
        };
        assert_eq!(sub("hello", 1.0, 3.0), Ok(Object::String("el".to_owned())));
        assert_eq!(sub("hello", 3.0, 1.0), Ok(Object::String("el".to_owned())));
        assert_eq!(
            sub("hello", -2.0, 99.0),
            Ok(Object::String("hello".to_owned()))
        );
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(
            native("length").execute(vec![Object::String("hello".to_owned())]),
            Ok(Object::Number(5.0))
        );
        assert!(native("length").execute(vec![Object::Number(1.0)]).is_err());
    }

    #[test]
    fn test_typeof_never_fails() {
        assert_eq!(
            native("typeof").execute(vec![Object::Nil]),
            Ok(Object::String("null".to_owned()))
        );
        assert_eq!(
            native("typeof").execute(vec![Object::Number(1.0)]),
            Ok(Object::String("number".to_owned()))
        );
        assert_eq!(
            native("typeof").execute(vec![Object::NativeFunc(native("abs"))]),
            Ok(Object::String("function".to_owned()))
        );
    }

    #[test]
    fn test_random_range() {
        for _ in 0..100 {
            match native("random").execute(vec![]) {
                Ok(Object::Number(n)) => assert!((0.0..1.0).contains(&n)),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }
}
