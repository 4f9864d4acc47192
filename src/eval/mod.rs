//! Evaluation of Penguin programs.
//!
//! This module contains the runtime: the value and array model, scoped
//! environments, the expression and statement walkers, built-in
//! functions, and the [`Interpreter`] that ties them together.
//!
//! # Example
//!
//! ```rust
//! use penguin::eval::Interpreter;
//! use penguin::parse_source;
//!
//! let program = parse_source(r#"{ func main() { println("hi"); } }"#).unwrap();
//! let mut interp = Interpreter::with_output(Vec::new());
//! interp.run(&program).unwrap();
//! assert_eq!(interp.into_output(), b"hi\n");
//! ```

pub mod builtins;
pub mod env;
mod expr;
pub mod interpreter;
mod stmt;
pub mod value;

pub use env::Environment;
pub use interpreter::{Flow, Interpreter};
pub use value::{ArrayObject, ArrayRef, Value};
