//! Built-in functions for the Penguin runtime.
//!
//! Function dispatch checks built-ins before user functions, so these
//! names cannot be shadowed by definitions in the program.

use std::io::Write;

use crate::error::RuntimeError;
use crate::eval::value::{ArrayObject, Value};

/// Calls a built-in function by name with already evaluated arguments.
///
/// Returns `None` when the name is not a built-in, so the caller can fall
/// through to user functions.
pub fn call_builtin(
    name: &str,
    args: &[Value],
    out: &mut dyn Write,
) -> Option<Result<Value, RuntimeError>> {
    match name {
        "print" => Some(builtin_print(args, out)),
        "println" => Some(builtin_println(args, out)),
        "fixed" => Some(builtin_fixed(args)),
        "push" => Some(builtin_push(args)),
        _ => None,
    }
}

/// print(args...) - Writes each argument with no separator and no
/// trailing newline.
///
/// Returns null.
fn builtin_print(args: &[Value], out: &mut dyn Write) -> Result<Value, RuntimeError> {
    for arg in args {
        write!(out, "{}", arg)?;
    }
    Ok(Value::Null)
}

/// println(args...) - Writes each argument with no separator, then one
/// newline.
///
/// Returns null.
fn builtin_println(args: &[Value], out: &mut dyn Write) -> Result<Value, RuntimeError> {
    for arg in args {
        write!(out, "{}", arg)?;
    }
    writeln!(out)?;
    Ok(Value::Null)
}

/// fixed(size, init?) - Allocates a fixed array of `size` slots.
///
/// Each slot is initialized to a deep copy of `init` (null when absent).
/// A one-element array passed as `init` is unwrapped to its element
/// before copying, so `fixed(n, [fixed(m)])` builds a two-dimensional
/// array.
fn builtin_fixed(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::InvalidArgument {
            function: "fixed".to_string(),
            message: format!("expects 1 or 2 arguments, found {}", args.len()),
        });
    }

    let Value::Int(size) = args[0] else {
        return Err(RuntimeError::InvalidArgument {
            function: "fixed".to_string(),
            message: format!("size must be an integer, found {}", args[0].type_name()),
        });
    };
    if size < 0 {
        return Err(RuntimeError::InvalidArgument {
            function: "fixed".to_string(),
            message: format!("size cannot be negative, found {}", size),
        });
    }

    let mut init = args.get(1).cloned().unwrap_or(Value::Null);
    if let Value::Array(handle) = &init {
        let unwrapped = {
            let arr = handle.borrow();
            if arr.len() == 1 {
                arr.get(0)
            } else {
                None
            }
        };
        if let Some(element) = unwrapped {
            init = element;
        }
    }

    Ok(Value::Array(ArrayObject::fixed_filled(
        size as usize,
        &init,
    )))
}

/// push(array, value) - Appends a deep copy of `value` to a dynamic
/// array, growing capacity by doubling when full.
///
/// Returns null. Fixed arrays reject the push.
fn builtin_push(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 2 {
        return Err(RuntimeError::ArityMismatch {
            name: "push".to_string(),
            expected: 2,
            found: args.len(),
        });
    }

    let Value::Array(handle) = &args[0] else {
        return Err(RuntimeError::InvalidArgument {
            function: "push".to_string(),
            message: format!(
                "first argument must be an array, found {}",
                args[0].type_name()
            ),
        });
    };

    handle.borrow_mut().push(args[1].deep_copy())?;
    Ok(Value::Null)
}
