//! Error types for Penguin.
//!
//! This module defines all error types used throughout the crate:
//!
//! - [`LexError`]: errors during tokenization
//! - [`ParseError`]: errors during parsing
//! - [`RuntimeError`]: errors during evaluation
//! - [`Error`]: aggregate for the `parse_source`/`run_source` entry points
//!
//! Lexical and parse errors abort the pipeline with a diagnostic carrying
//! the source location. Runtime errors propagate to the top-level
//! invocation, where the launcher prints `Runtime error: <message>` and
//! exits nonzero. Return/break/continue are *not* errors; they travel as
//! control-flow signals inside the evaluator.

use crate::ast::Span;
use thiserror::Error;

/// Errors that can occur during lexical analysis.
///
/// Produced by the [`Lexer`](crate::lexer::Lexer); the first one halts the
/// scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// A character outside the language's alphabet was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar {
        /// The unexpected character
        ch: char,
        /// Location in the source
        span: Span,
    },

    /// A string literal ran to end of input without a closing quote.
    #[error("unterminated string literal starting at {span}")]
    UnterminatedString {
        /// Location of the opening quote
        span: Span,
    },
}

impl LexError {
    /// Returns the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
        }
    }
}

/// Errors that can occur during parsing.
///
/// Produced by the [`Parser`](crate::parser::Parser) when the token stream
/// does not match the grammar; parsing halts at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An unexpected token was encountered.
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        /// Description of what was expected
        expected: String,
        /// The offending lexeme
        found: String,
        /// Location of the unexpected token
        span: Span,
    },

    /// The token stream ended while a construct was still open.
    #[error("unexpected end of input at {span}: {context}")]
    UnexpectedEof {
        /// What was being parsed
        context: String,
        /// Location at end of input
        span: Span,
    },

    /// An assignment used something other than a variable or index
    /// expression as its target.
    #[error("invalid assignment target at {span}")]
    InvalidAssignTarget {
        /// Location of the target expression
        span: Span,
    },
}

impl ParseError {
    /// Returns the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::InvalidAssignTarget { span } => *span,
        }
    }
}

/// Errors raised during evaluation.
///
/// Each variant corresponds to a category of the runtime error taxonomy;
/// all of them abort execution and surface at the launcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A binary operator was applied to operand types it does not accept.
    #[error("invalid operation: {op} on types {left} and {right}")]
    InvalidOperands {
        /// The operator lexeme
        op: String,
        /// Type name of the left operand
        left: &'static str,
        /// Type name of the right operand
        right: &'static str,
    },

    /// A unary operator was applied to an operand type it does not accept.
    #[error("invalid operation: unary {op} on type {operand}")]
    InvalidUnaryOperand {
        /// The operator lexeme
        op: String,
        /// Type name of the operand
        operand: &'static str,
    },

    /// Integer division or modulus by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Shift amount outside the representable range.
    #[error("shift amount {amount} out of range")]
    ShiftOutOfRange {
        /// The offending shift amount
        amount: i64,
    },

    /// A numeric literal does not fit the runtime representation.
    #[error("numeric literal '{literal}' out of range")]
    InvalidNumber {
        /// The literal text
        literal: String,
    },

    /// Read of a name with no binding in any enclosing scope.
    #[error("undefined variable '{name}'")]
    UndefinedVariable {
        /// The unresolved name
        name: String,
    },

    /// Call of a name that is neither a built-in nor a user function.
    #[error("undefined function '{name}'")]
    UndefinedFunction {
        /// The unresolved name
        name: String,
    },

    /// A call supplied the wrong number of arguments.
    #[error("function '{name}' expects {expected} arguments, found {found}")]
    ArityMismatch {
        /// The function name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        found: usize,
    },

    /// Index operation on a non-array base.
    #[error("index operation expects an array, found {found}")]
    NotAnArray {
        /// Type name of the base value
        found: &'static str,
    },

    /// Index operation with a non-integer index.
    #[error("array index must be an integer, found {found}")]
    NonIntegerIndex {
        /// Type name of the index value
        found: &'static str,
    },

    /// Index outside `0..length`.
    #[error("index {index} out of bounds for array of length {length}")]
    IndexOutOfBounds {
        /// The offending index
        index: i64,
        /// The array length
        length: usize,
    },

    /// `push` applied to a fixed array.
    #[error("cannot push to fixed array")]
    PushToFixedArray,

    /// A built-in was called with an argument it cannot accept.
    #[error("{function}: {message}")]
    InvalidArgument {
        /// The built-in name
        function: String,
        /// What went wrong
        message: String,
    },

    /// Call through a callee expression that is neither a variable nor a
    /// member access.
    #[error("call target must be a function name")]
    InvalidCallee,

    /// Assignment to a target that is neither a variable nor an index
    /// expression. The parser rejects these; this guards hand-built ASTs.
    #[error("assignment target must be a variable or index expression")]
    InvalidAssignTarget,

    /// Member access evaluated outside call position.
    #[error("member access '.{name}' is only valid in a call")]
    MemberOutsideCall {
        /// The member name
        name: String,
    },

    /// An `if` condition that is neither a boolean nor an integer.
    #[error("condition must be a boolean or integer, found {found}")]
    InvalidCondition {
        /// Type name of the condition value
        found: &'static str,
    },

    /// `break` reached a function boundary without an enclosing loop.
    #[error("'break' outside of a loop")]
    BreakOutsideLoop,

    /// `continue` reached a function boundary without an enclosing loop.
    #[error("'continue' outside of a loop")]
    ContinueOutsideLoop,

    /// The program defines no `main` function.
    #[error("no 'main' function found")]
    NoMainFunction,

    /// A `{...}` interpolation segment failed to lex, parse or evaluate.
    #[error("invalid interpolation segment '{{{segment}}}': {detail}")]
    InvalidInterpolation {
        /// The segment text between the braces
        segment: String,
        /// The underlying failure
        detail: String,
    },

    /// Writing program output failed.
    #[error("output error: {message}")]
    Output {
        /// The underlying I/O failure
        message: String,
    },
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Output {
            message: err.to_string(),
        }
    }
}

/// Aggregate error for whole-pipeline entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Tokenization failed.
    #[error("{0}")]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Evaluation failed.
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_message_includes_position() {
        let err = LexError::UnexpectedChar {
            ch: '@',
            span: Span::new(4, 5, 2, 3),
        };
        assert_eq!(err.to_string(), "unexpected character '@' at line 2, column 3");
    }

    #[test]
    fn test_parse_error_names_offending_lexeme() {
        let err = ParseError::UnexpectedToken {
            expected: "';'".to_string(),
            found: "'}'".to_string(),
            span: Span::new(10, 11, 1, 11),
        };
        assert!(err.to_string().contains("expected ';'"));
        assert!(err.to_string().contains("found '}'"));
    }

    #[test]
    fn test_runtime_error_messages() {
        let err = RuntimeError::IndexOutOfBounds {
            index: 7,
            length: 3,
        };
        assert_eq!(
            err.to_string(),
            "index 7 out of bounds for array of length 3"
        );
        assert_eq!(
            RuntimeError::DivisionByZero.to_string(),
            "division by zero"
        );
    }

    #[test]
    fn test_aggregate_error_conversions() {
        let err: Error = RuntimeError::DivisionByZero.into();
        assert!(matches!(err, Error::Runtime(_)));
    }
}
