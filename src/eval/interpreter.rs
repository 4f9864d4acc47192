//! Program execution for Penguin.
//!
//! The [`Interpreter`] owns the global environment, the table of user
//! functions, and the output sink. Execution is batch-mode: [`run`]
//! loads every function definition, then calls `main` with no arguments.
//!
//! Non-local control flow travels as an explicit [`Flow`] result through
//! the statement walker rather than by unwinding; loops consume
//! `Break`/`Continue` and function calls consume `Return`.
//!
//! [`run`]: Interpreter::run

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::{Function, Program};
use crate::error::RuntimeError;
use crate::eval::builtins;
use crate::eval::env::Environment;
use crate::eval::value::Value;

/// The result of executing a statement.
///
/// `Normal` continues with the next statement; the other variants
/// propagate outward until an enclosing loop or function call consumes
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution falls through to the next statement
    Normal,
    /// A `break` looking for its enclosing loop
    Break,
    /// A `continue` looking for its enclosing loop
    Continue,
    /// A `return` carrying its value to the call boundary
    Return(Value),
}

/// The tree-walking interpreter.
///
/// Generic over the output sink so tests can capture exactly the bytes a
/// program writes; the default is stdout.
///
/// # Example
///
/// ```rust
/// use penguin::eval::Interpreter;
/// use penguin::parse_source;
///
/// let program = parse_source("{ func main() { println(1 + 2); } }").unwrap();
/// let mut interp = Interpreter::with_output(Vec::new());
/// interp.run(&program).unwrap();
/// assert_eq!(interp.into_output(), b"3\n");
/// ```
pub struct Interpreter<W: Write = io::Stdout> {
    /// The global environment every function frame parents to
    globals: Environment,

    /// User function table, loaded by `run`
    functions: HashMap<String, Rc<Function>>,

    /// Program output sink
    out: W,
}

impl Interpreter<io::Stdout> {
    /// Creates an interpreter writing to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing program output to `out`.
    pub fn with_output(out: W) -> Self {
        Interpreter {
            globals: Environment::new(),
            functions: HashMap::new(),
            out,
        }
    }

    /// Consumes the interpreter and returns the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Loads every function definition, then calls `main` with no
    /// arguments and returns its value.
    ///
    /// A later definition of the same name replaces an earlier one. A
    /// program without `main` is a runtime error.
    pub fn run(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        for function in &program.functions {
            self.functions
                .insert(function.name.clone(), Rc::new(function.clone()));
        }

        if !self.functions.contains_key("main") {
            return Err(RuntimeError::NoMainFunction);
        }

        self.call_function("main", Vec::new())
    }

    /// Calls a function by name: built-ins first, then user functions.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if let Some(result) = builtins::call_builtin(name, &args, &mut self.out) {
            return result;
        }

        let Some(function) = self.functions.get(name).cloned() else {
            return Err(RuntimeError::UndefinedFunction {
                name: name.to_string(),
            });
        };

        self.call_user_function(&function, args)
    }

    /// Invokes a user function with already evaluated arguments.
    ///
    /// Arity must match exactly. `ref:` parameters bind the caller's
    /// value as-is (sharing any array handle); by-value parameters bind a
    /// deep copy. The body runs in a fresh frame parented to globals -
    /// there are no closures.
    fn call_user_function(
        &mut self,
        function: &Function,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: function.name.clone(),
                expected: function.params.len(),
                found: args.len(),
            });
        }

        let frame = self.globals.child();
        for (param, arg) in function.params.iter().zip(args) {
            let bound = if param.is_ref { arg } else { arg.deep_copy() };
            frame.define(param.name.clone(), bound);
        }

        match self.exec_block(&function.body, &frame)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Null),
            Flow::Break => Err(RuntimeError::BreakOutsideLoop),
            Flow::Continue => Err(RuntimeError::ContinueOutsideLoop),
        }
    }

    /// The output sink, for the print statement executors.
    pub(crate) fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    fn run_capture(source: &str) -> Result<(Value, String), RuntimeError> {
        let program = parse_source(source).expect("program should parse");
        let mut interp = Interpreter::with_output(Vec::new());
        let value = interp.run(&program)?;
        let output = String::from_utf8(interp.into_output()).expect("output should be UTF-8");
        Ok((value, output))
    }

    #[test]
    fn test_missing_main_is_runtime_error() {
        let err = run_capture("{ func helper() { } }").unwrap_err();
        assert_eq!(err, RuntimeError::NoMainFunction);
    }

    #[test]
    fn test_main_return_value_surfaces() {
        let (value, _) = run_capture("{ func main() { return 7; } }").unwrap();
        assert_eq!(value, Value::Int(7));
    }

    #[test]
    fn test_absent_return_yields_null() {
        let (value, _) = run_capture("{ func main() { x = 1; } }").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_duplicate_definition_last_wins() {
        let (value, _) =
            run_capture("{ func main() { return 1; } func main() { return 2; } }").unwrap();
        assert_eq!(value, Value::Int(2));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = run_capture("{ func f(a) { } func main() { f(); } }").unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ArityMismatch {
                name: "f".to_string(),
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let err = run_capture("{ func main() { nope(); } }").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedFunction { .. }));
    }

    #[test]
    fn test_break_at_function_scope_is_error() {
        let err = run_capture("{ func main() { break; } }").unwrap_err();
        assert_eq!(err, RuntimeError::BreakOutsideLoop);
    }

    #[test]
    fn test_continue_at_function_scope_is_error() {
        let err = run_capture("{ func main() { continue; } }").unwrap_err();
        assert_eq!(err, RuntimeError::ContinueOutsideLoop);
    }

    #[test]
    fn test_functions_do_not_close_over_caller_scope() {
        // g's frame parents to globals, so it cannot see main's x
        let err = run_capture("{ func g() { return x; } func main() { x = 1; return g(); } }")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
    }
}
