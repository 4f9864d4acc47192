//! Expression evaluation.
//!
//! Dispatches on the expression variant and produces a [`Value`].
//! Evaluation order is strictly left-to-right, depth-first; argument
//! evaluation precedes call dispatch.

use std::io::Write;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::RuntimeError;
use crate::eval::env::Environment;
use crate::eval::interpreter::Interpreter;
use crate::eval::value::{ArrayObject, ArrayRef, Value};

impl<W: Write> Interpreter<W> {
    /// Evaluates an expression in the given environment.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(text) => eval_number(text),

            // Interpolation happens at print time, not here
            Expr::Str(content) => Ok(Value::String(content.clone())),

            Expr::Bool(b) => Ok(Value::Bool(*b)),

            Expr::Variable(name) => env.get(name),

            Expr::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element, env)?);
                }

                // A single-element literal holding an array handle yields
                // that handle unchanged (one dimension collapses)
                if values.len() == 1 && matches!(values[0], Value::Array(_)) {
                    return Ok(values.pop().unwrap());
                }

                Ok(Value::Array(ArrayObject::dynamic(values)))
            }

            Expr::Index { array, index } => {
                let base = self.eval_expr(array, env)?;
                let idx = self.eval_expr(index, env)?;
                let (handle, i) = check_index(&base, &idx)?;
                let arr = handle.borrow();
                arr.get(i).ok_or(RuntimeError::IndexOutOfBounds {
                    index: i as i64,
                    length: arr.len(),
                })
            }

            Expr::Member { name, .. } => Err(RuntimeError::MemberOutsideCall {
                name: name.clone(),
            }),

            Expr::Call { callee, args } => self.eval_call(callee, args, env),

            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, env)?;
                eval_unary(*op, &value)
            }

            Expr::Binary { left, op, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                eval_binary(*op, &left, &right)
            }
        }
    }

    /// Evaluates a call expression.
    ///
    /// `obj.name(args...)` is sugar for `name(obj, args...)`; a plain
    /// variable callee is a free call of that name. Any other callee
    /// shape is a runtime error.
    fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let (name, mut values) = match callee {
            Expr::Member { object, name } => {
                let receiver = self.eval_expr(object, env)?;
                (name.clone(), vec![receiver])
            }
            Expr::Variable(name) => (name.clone(), Vec::new()),
            _ => return Err(RuntimeError::InvalidCallee),
        };

        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }

        self.call_function(&name, values)
    }
}

/// Evaluates a numeric literal from its textual form.
///
/// A `.` in the text yields a decimal, otherwise an integer.
fn eval_number(text: &str) -> Result<Value, RuntimeError> {
    if text.contains('.') {
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| RuntimeError::InvalidNumber {
                literal: text.to_string(),
            })
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::InvalidNumber {
                literal: text.to_string(),
            })
    }
}

/// Validates an index operation, returning the array handle and the slot
/// index.
pub(crate) fn check_index<'v>(
    base: &'v Value,
    index: &Value,
) -> Result<(&'v ArrayRef, usize), RuntimeError> {
    let Value::Array(handle) = base else {
        return Err(RuntimeError::NotAnArray {
            found: base.type_name(),
        });
    };
    let Value::Int(i) = index else {
        return Err(RuntimeError::NonIntegerIndex {
            found: index.type_name(),
        });
    };
    let length = handle.borrow().len();
    if *i < 0 || *i as usize >= length {
        return Err(RuntimeError::IndexOutOfBounds {
            index: *i,
            length,
        });
    }
    Ok((handle, *i as usize))
}

/// Applies a unary operator.
fn eval_unary(op: UnaryOp, value: &Value) -> Result<Value, RuntimeError> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        _ => Err(RuntimeError::InvalidUnaryOperand {
            op: op.to_string(),
            operand: value.type_name(),
        }),
    }
}

/// Applies a binary operator to already evaluated operands.
///
/// Operand type rules: two integers accept the full operator set, two
/// strings accept `+` and `==`, two booleans accept `&&`/`||`/`==`/`!=`.
/// Every other combination is a type error. Both sides are always
/// evaluated before this runs; there is no short-circuiting.
pub(crate) fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => eval_int_binary(op, *l, *r),
        (Value::String(l), Value::String(r)) => match op {
            BinaryOp::Add => Ok(Value::String(format!("{}{}", l, r))),
            BinaryOp::Eq => Ok(Value::Bool(l == r)),
            _ => Err(invalid_operands(op, left, right)),
        },
        (Value::Bool(l), Value::Bool(r)) => match op {
            BinaryOp::And => Ok(Value::Bool(*l && *r)),
            BinaryOp::Or => Ok(Value::Bool(*l || *r)),
            BinaryOp::Eq => Ok(Value::Bool(l == r)),
            BinaryOp::Ne => Ok(Value::Bool(l != r)),
            _ => Err(invalid_operands(op, left, right)),
        },
        _ => Err(invalid_operands(op, left, right)),
    }
}

/// The integer arm of the operator table.
///
/// Arithmetic wraps on overflow; division and modulus by zero raise, as
/// do shift amounts outside `0..64`.
fn eval_int_binary(op: BinaryOp, l: i64, r: i64) -> Result<Value, RuntimeError> {
    let value = match op {
        BinaryOp::Add => Value::Int(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Int(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Int(l.wrapping_mul(r)),
        BinaryOp::Div => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int(l.wrapping_div(r))
        }
        BinaryOp::Mod => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int(l.wrapping_rem(r))
        }
        BinaryOp::BitAnd => Value::Int(l & r),
        BinaryOp::BitOr => Value::Int(l | r),
        BinaryOp::BitXor => Value::Int(l ^ r),
        BinaryOp::Shl => {
            if !(0..64).contains(&r) {
                return Err(RuntimeError::ShiftOutOfRange { amount: r });
            }
            Value::Int(l.wrapping_shl(r as u32))
        }
        BinaryOp::Shr => {
            if !(0..64).contains(&r) {
                return Err(RuntimeError::ShiftOutOfRange { amount: r });
            }
            Value::Int(l.wrapping_shr(r as u32))
        }
        BinaryOp::Eq => Value::Bool(l == r),
        BinaryOp::Ne => Value::Bool(l != r),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::Le => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::Ge => Value::Bool(l >= r),
        BinaryOp::And => Value::Bool(l != 0 && r != 0),
        BinaryOp::Or => Value::Bool(l != 0 || r != 0),
    };
    Ok(value)
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        op: op.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}
