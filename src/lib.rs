//! # Penguin
//!
//! Penguin is a small general-purpose scripting language: a batch-mode,
//! tree-walking interpreter that reads a single source file, lexes and
//! parses it into an abstract syntax tree, then executes the tree against
//! a scoped environment with first-class functions, heterogeneous values,
//! dynamic and fixed-size arrays, and structured control flow.
//!
//! ## Pipeline
//!
//! ```text
//! source text -> tokens -> AST -> effects (stdout, value of main)
//! ```
//!
//! Data flow is strictly forward: the parser never re-consults source
//! text and the evaluator never re-consults tokens. The one deliberate
//! re-entry is string interpolation, where the print statements re-lex
//! and re-parse `{expr}` segments at print time.
//!
//! ## Quick start
//!
//! ```rust
//! use penguin::eval::Interpreter;
//!
//! let source = r#"
//! {
//!   func main() {
//!     for (i = 0; i < 3; i = i + 1) {
//!       println(i);
//!     }
//!   }
//! }
//! "#;
//!
//! let program = penguin::parse_source(source).unwrap();
//! let mut interp = Interpreter::with_output(Vec::new());
//! interp.run(&program).unwrap();
//! assert_eq!(interp.into_output(), b"0\n1\n2\n");
//! ```
//!
//! ## Modules
//!
//! - [`lexer`]: tokenization of source text
//! - [`parser`]: recursive descent parser producing the AST
//! - [`ast`]: the typed tree of expressions, statements and functions
//! - [`pratt`]: binding-power tables for expression precedence
//! - [`eval`]: values, environments, walkers and built-ins
//! - [`error`]: error types for every pipeline stage

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod pratt;

// Re-exports for convenience
pub use ast::{Block, Expr, Function, Param, Program, Stmt};
pub use error::{Error, LexError, ParseError, RuntimeError};
pub use eval::{Interpreter, Value};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::Parser;

/// Parses a Penguin source string into a [`Program`].
///
/// This is the primary parsing entry point, chaining the lexer and
/// parser.
///
/// # Example
///
/// ```rust
/// let program = penguin::parse_source("{ func main() { } }").unwrap();
/// assert_eq!(program.functions.len(), 1);
/// ```
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = lexer::tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Parses and runs a Penguin source string, writing output to stdout.
///
/// Returns the value of `main`.
pub fn run_source(source: &str) -> Result<Value, Error> {
    let program = parse_source(source)?;
    let mut interpreter = Interpreter::new();
    Ok(interpreter.run(&program)?)
}
