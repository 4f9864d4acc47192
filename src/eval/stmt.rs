//! Statement execution.
//!
//! The statement walker returns a [`Flow`] signal instead of unwinding:
//! loops consume `Break`/`Continue`, function calls consume `Return`, and
//! everything else propagates the signal outward. Every construct that
//! opens a scope releases it on every exit path, signals included.

use std::io::Write;

use crate::ast::{Assign, Block, Expr, Stmt};
use crate::error::RuntimeError;
use crate::eval::env::Environment;
use crate::eval::expr::{check_index, eval_binary};
use crate::eval::interpreter::{Flow, Interpreter};
use crate::eval::value::Value;
use crate::lexer::tokenize;
use crate::parser::Parser;

impl<W: Write> Interpreter<W> {
    /// Executes a block in a fresh child scope.
    pub fn exec_block(&mut self, block: &Block, env: &Environment) -> Result<Flow, RuntimeError> {
        let local = env.child();
        for stmt in &block.statements {
            match self.exec_stmt(stmt, &local)? {
                Flow::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    pub fn exec_stmt(&mut self, stmt: &Stmt, env: &Environment) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval_expr(expr, env)?;
                Ok(Flow::Normal)
            }

            Stmt::Block(block) => self.exec_block(block, env),

            Stmt::Print(expr) => {
                let rendered = self.render(expr, env)?;
                write!(self.out(), "{}", rendered)?;
                Ok(Flow::Normal)
            }

            Stmt::Println(expr) => {
                let rendered = self.render(expr, env)?;
                writeln!(self.out(), "{}", rendered)?;
                Ok(Flow::Normal)
            }

            Stmt::Assignment(assignments) => {
                self.exec_assignments(assignments, env)?;
                Ok(Flow::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval_expr(condition, env)?;
                let holds = match cond {
                    Value::Bool(b) => b,
                    Value::Int(n) => n != 0,
                    other => {
                        return Err(RuntimeError::InvalidCondition {
                            found: other.type_name(),
                        })
                    }
                };

                if holds {
                    self.exec_block(then_branch, env)
                } else if let Some(else_stmt) = else_branch {
                    self.exec_stmt(else_stmt, env)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::For {
                init,
                condition,
                increment,
                body,
            } => {
                let loop_env = env.child();
                self.exec_assignments(init, &loop_env)?;

                loop {
                    let cond = self.eval_expr(condition, &loop_env)?;
                    if !cond.is_truthy() {
                        break;
                    }

                    match self.exec_block(body, &loop_env)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }

                    self.exec_assignments(increment, &loop_env)?;
                }

                Ok(Flow::Normal)
            }

            Stmt::While { condition, body } => {
                let loop_env = env.child();

                loop {
                    let cond = self.eval_expr(condition, &loop_env)?;
                    if !cond.is_truthy() {
                        break;
                    }

                    match self.exec_block(body, &loop_env)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }
                }

                Ok(Flow::Normal)
            }

            Stmt::Return(value) => {
                let result = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(result))
            }

            Stmt::Break => Ok(Flow::Break),

            Stmt::Continue => Ok(Flow::Continue),
        }
    }

    /// Evaluates an expression for printing, applying interpolation to
    /// string values.
    fn render(&mut self, expr: &Expr, env: &Environment) -> Result<String, RuntimeError> {
        let value = self.eval_expr(expr, env)?;
        match value {
            Value::String(s) => self.interpolate(&s, env),
            other => Ok(other.to_string()),
        }
    }

    /// Replaces `{expr}` segments by the rendered value of `expr`.
    ///
    /// Each segment is re-lexed and re-parsed as a single expression and
    /// evaluated in the current environment. A `{` with no closing `}` is
    /// emitted verbatim from that point on.
    pub fn interpolate(&mut self, s: &str, env: &Environment) -> Result<String, RuntimeError> {
        let mut rendered = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let Some(close) = after.find('}') else {
                // unbalanced: emit the rest verbatim, opening brace included
                rendered.push_str(&rest[open..]);
                return Ok(rendered);
            };

            let segment = &after[..close];
            let value = self.eval_segment(segment, env)?;
            rendered.push_str(&value.to_string());

            rest = &after[close + 1..];
        }

        rendered.push_str(rest);
        Ok(rendered)
    }

    /// Re-enters the lexer and parser on an interpolation segment and
    /// evaluates the resulting expression.
    fn eval_segment(&mut self, segment: &str, env: &Environment) -> Result<Value, RuntimeError> {
        let invalid = |detail: String| RuntimeError::InvalidInterpolation {
            segment: segment.to_string(),
            detail,
        };

        let tokens = tokenize(segment).map_err(|e| invalid(e.to_string()))?;
        let expr = Parser::new(tokens)
            .parse_expression()
            .map_err(|e| invalid(e.to_string()))?;

        self.eval_expr(&expr, env)
    }

    /// Executes an assignment chain left to right.
    fn exec_assignments(
        &mut self,
        assignments: &[Assign],
        env: &Environment,
    ) -> Result<(), RuntimeError> {
        for assign in assignments {
            self.exec_assign(assign, env)?;
        }
        Ok(())
    }

    /// Executes one assignment.
    ///
    /// Plain `=` on a variable assigns through the chain, or implicitly
    /// declares in the current scope when the name is unbound everywhere.
    /// Compound operators require an existing binding. Index targets are
    /// bounds-checked and written in place; compound forms read the slot
    /// as the current value.
    fn exec_assign(&mut self, assign: &Assign, env: &Environment) -> Result<(), RuntimeError> {
        let rhs = self.eval_expr(&assign.value, env)?;

        match &assign.target {
            Expr::Variable(name) => match assign.op.binary_op() {
                None => {
                    if env.assign(name, rhs.clone()).is_err() {
                        env.define(name.clone(), rhs);
                    }
                    Ok(())
                }
                Some(op) => {
                    let current = env.get(name)?;
                    let computed = eval_binary(op, &current, &rhs)?;
                    env.assign(name, computed)
                }
            },

            Expr::Index { array, index } => {
                let base = self.eval_expr(array, env)?;
                let idx = self.eval_expr(index, env)?;
                let (handle, i) = check_index(&base, &idx)?;

                match assign.op.binary_op() {
                    None => {
                        handle.borrow_mut().set(i, rhs);
                        Ok(())
                    }
                    Some(op) => {
                        let current = {
                            let arr = handle.borrow();
                            arr.get(i).ok_or(RuntimeError::IndexOutOfBounds {
                                index: i as i64,
                                length: arr.len(),
                            })?
                        };
                        let computed = eval_binary(op, &current, &rhs)?;
                        handle.borrow_mut().set(i, computed);
                        Ok(())
                    }
                }
            }

            _ => Err(RuntimeError::InvalidAssignTarget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    fn run(source: &str) -> Result<String, RuntimeError> {
        let program = parse_source(source).expect("program should parse");
        let mut interp = Interpreter::with_output(Vec::new());
        interp.run(&program)?;
        Ok(String::from_utf8(interp.into_output()).expect("output should be UTF-8"))
    }

    #[test]
    fn test_implicit_declaration_on_plain_assign() {
        let out = run("{ func main() { x = 5; println(x); } }").unwrap();
        assert_eq!(out, "5\n");
    }

    #[test]
    fn test_compound_assignment_requires_binding() {
        let err = run("{ func main() { x += 1; } }").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_compound_assignment_on_index_reads_slot() {
        let out = run("{ func main() { a = [10, 20]; a[1] += 5; println(a[1]); } }").unwrap();
        assert_eq!(out, "25\n");
    }

    #[test]
    fn test_assignment_chain_runs_left_to_right() {
        let out = run("{ func main() { i = 1, j = i + 1; println(j); } }").unwrap();
        assert_eq!(out, "2\n");
    }

    #[test]
    fn test_if_accepts_integer_condition() {
        let out = run("{ func main() { if (2) { println(1); } else { println(0); } } }").unwrap();
        assert_eq!(out, "1\n");
    }

    #[test]
    fn test_if_rejects_string_condition() {
        let err = run(r#"{ func main() { if ("yes") { } } }"#).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidCondition { found: "String" }));
    }

    #[test]
    fn test_inner_block_assigns_through_the_chain() {
        // plain = finds the outer binding, so the inner write hits it
        let out = run(
            "{ func main() { x = 1; { x = 2; println(x); } println(x); } }",
        )
        .unwrap();
        assert_eq!(out, "2\n2\n");
    }

    #[test]
    fn test_while_loop_with_break_and_continue() {
        let out = run(
            "{ func main() { i = 0; while (true) { i = i + 1; if (i == 2) { continue; } if (i > 3) { break; } println(i); } } }",
        )
        .unwrap();
        assert_eq!(out, "1\n3\n");
    }

    #[test]
    fn test_for_continue_still_increments() {
        let out = run(
            "{ func main() { for (i = 0; i < 4; i = i + 1) { if (i == 1) { continue; } println(i); } } }",
        )
        .unwrap();
        assert_eq!(out, "0\n2\n3\n");
    }

    #[test]
    fn test_interpolation_unbalanced_brace_verbatim() {
        let out = run(r#"{ func main() { println("a {unclosed"); } }"#).unwrap();
        assert_eq!(out, "a {unclosed\n");
    }

    #[test]
    fn test_interpolation_invalid_segment_is_runtime_error() {
        let err = run(r#"{ func main() { println("{1 +}"); } }"#).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidInterpolation { .. }));
    }

    #[test]
    fn test_interpolation_evaluates_calls() {
        let out = run(
            r#"{ func double(n) { return n * 2; } func main() { x = 4; println("{double(x)}"); } }"#,
        )
        .unwrap();
        assert_eq!(out, "8\n");
    }

    #[test]
    fn test_print_statement_has_no_newline() {
        let out = run(r#"{ func main() { print(1); print(2); } }"#).unwrap();
        assert_eq!(out, "12");
    }
}
