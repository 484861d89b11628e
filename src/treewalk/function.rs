use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeErrorType, RuntimeResult};
use super::interpreter::{Interpreter, Signal};
use super::object::Object;
use crate::frontend::grammar::{FuncInfo, Stmt};

use std::fmt;
use std::rc::Rc;

pub struct CosmoFnData {
    name: String,
    params: Vec<String>,
    body: Vec<Stmt>,
    closure: Environment,
}

/// A user-defined function: its declaration plus the environment captured at
/// the definition site.
#[derive(Clone)]
pub struct CosmoFn(Rc<CosmoFnData>);

impl CosmoFn {
    pub fn new(func_info: &FuncInfo, closure: Environment) -> Self {
        let data = CosmoFnData {
            name: func_info.ident.name.clone(),
            params: func_info.params.iter().map(|p| p.name.clone()).collect(),
            body: func_info.body.clone(),
            closure,
        };
        CosmoFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn execute(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<'_>,
    ) -> RuntimeResult<Object> {
        if args.len() != self.0.params.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::WrongArity(self.0.params.len(), args.len()),
                None,
            ));
        }

        // Fresh environment pointing at the surrounding closure.
        let env = Environment::with_enclosing(&self.0.closure);

        for (param, arg) in self.0.params.iter().zip(args.into_iter()) {
            env.define(param.clone(), arg);
        }

        let prev_env = interpreter.swap_env(env);
        let result = interpreter.eval_statement_list(&self.0.body);
        interpreter.swap_env(prev_env);

        // A return signal stops here; it never crosses the call boundary.
        match result? {
            Signal::Return(value) => Ok(value),
            Signal::Normal => Ok(Object::Nil),
        }
    }
}

impl fmt::Debug for CosmoFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<fn {}>", self.0.name)
    }
}

impl PartialEq<CosmoFn> for CosmoFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CosmoFn {}
