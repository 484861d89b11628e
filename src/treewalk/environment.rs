use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::errors::{OpResult, RuntimeErrorType};
use super::object::Object;

/// A lexical scope. Cheap to clone; clones share the underlying bindings.
/// Lookups and assignments walk outward through enclosing scopes.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    values: HashMap<String, Object>,
    enclosing: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Binds a name in this scope. An existing binding in this scope is
    /// silently replaced; enclosing scopes are untouched.
    pub fn define(&self, name: String, value: Object) {
        self.env_ptr.borrow_mut().values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> OpResult<Object> {
        let data = self.env_ptr.borrow();
        match data.values.get(name) {
            Some(obj) => Ok(obj.clone()),
            None => match &data.enclosing {
                Some(enclosing) => enclosing.get(name),
                None => Err(RuntimeErrorType::UndefinedVariable(name.to_owned())),
            },
        }
    }

    /// Reassigns an existing binding. Assignment never creates a binding.
    pub fn assign(&self, name: &str, value: Object) -> OpResult<()> {
        let mut data = self.env_ptr.borrow_mut();
        match data.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => match &data.enclosing {
                Some(enclosing) => enclosing.assign(name, value),
                None => Err(RuntimeErrorType::UndefinedVariable(name.to_owned())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x".to_owned(), Object::Number(1.0));
        assert_eq!(env.get("x"), Ok(Object::Number(1.0)));
    }

    #[test]
    fn test_get_walks_enclosing_chain() {
        let global = Environment::new();
        global.define("x".to_owned(), Object::Number(1.0));
        let inner = Environment::with_enclosing(&Environment::with_enclosing(&global));
        assert_eq!(inner.get("x"), Ok(Object::Number(1.0)));
    }

    #[test]
    fn test_define_shadows_without_touching_outer() {
        let outer = Environment::new();
        outer.define("x".to_owned(), Object::Number(1.0));
        let inner = Environment::with_enclosing(&outer);
        inner.define("x".to_owned(), Object::Number(2.0));
        assert_eq!(inner.get("x"), Ok(Object::Number(2.0)));
        assert_eq!(outer.get("x"), Ok(Object::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_enclosing_binding() {
        let outer = Environment::new();
        outer.define("x".to_owned(), Object::Number(1.0));
        let inner = Environment::with_enclosing(&outer);
        inner.assign("x", Object::Number(5.0)).unwrap();
        assert_eq!(outer.get("x"), Ok(Object::Number(5.0)));
    }

    #[test]
    fn test_assign_to_undefined_fails() {
        let env = Environment::new();
        assert_eq!(
            env.assign("missing", Object::Nil),
            Err(RuntimeErrorType::UndefinedVariable("missing".to_owned()))
        );
    }

    #[test]
    fn test_redefine_replaces_in_current_scope() {
        let env = Environment::new();
        env.define("x".to_owned(), Object::Number(1.0));
        env.define("x".to_owned(), Object::Boolean(true));
        assert_eq!(env.get("x"), Ok(Object::Boolean(true)));
    }
}
