mod environment;
mod errors;
mod function;
mod interpreter;
mod native_function;
mod object;

pub use environment::Environment;
pub use errors::{RuntimeError, RuntimeErrorType};
pub use function::CosmoFn;
pub use interpreter::{Interpreter, Signal};
pub use native_function::NativeFn;
pub use object::Object;
