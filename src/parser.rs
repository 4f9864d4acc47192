//! Parser for Penguin.
//!
//! This module provides a recursive descent parser that transforms the
//! token stream into an Abstract Syntax Tree. Expression precedence is
//! driven by the binding-power tables in [`crate::pratt`]; postfix call,
//! index and member chains bind tightest.
//!
//! # Example
//!
//! ```rust
//! use penguin::lexer::tokenize;
//! use penguin::parser::Parser;
//!
//! let source = r#"
//! {
//!   func main() {
//!     println("hello");
//!   }
//! }
//! "#;
//!
//! let tokens = tokenize(source).unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.functions[0].name, "main");
//! ```
//!
//! # Grammar
//!
//! ```text
//! program      := "{" function* "}"
//! function     := "func" IDENT "(" params? ")" block
//! params       := param ("," param)*
//! param        := ("ref" ":")? IDENT
//! block        := "{" statement* "}"
//! statement    := print_stmt | println_stmt | if_stmt | while_stmt | for_stmt
//!               | return_stmt | break_stmt | continue_stmt | block
//!               | assignment_stmt ";" | expr_stmt ";"
//! ```
//!
//! `print`, `println`, `for` and `ref` are not reserved words; the parser
//! matches them by lexeme where the grammar calls for them.

use crate::ast::{Assign, AssignOp, Block, Expr, Function, Param, Program, Stmt};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::pratt::{infix_binding_power, prefix_binding_power};

/// The recursive descent parser over a token stream.
///
/// The token stream must be terminated by an `Eof` token, as produced by
/// [`tokenize`](crate::lexer::tokenize). The parser never re-consults the
/// source text.
pub struct Parser {
    /// The token stream, `Eof`-terminated
    tokens: Vec<Token>,

    /// Index of the current token
    current: usize,
}

impl Parser {
    /// Creates a new parser for the given token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    /// Parses a complete program.
    ///
    /// The outer `{ ... }` framing is required, and nothing may follow the
    /// closing brace.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        self.expect(TokenKind::LeftBrace)?;

        let mut functions = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            functions.push(self.parse_function()?);
        }

        self.expect(TokenKind::RightBrace)?;
        self.expect(TokenKind::Eof)?;

        Ok(Program { functions })
    }

    /// Parses a single expression followed by end of input.
    ///
    /// Used by the print statements to re-parse `{...}` interpolation
    /// segments.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    // --------------------
    // Declarations
    // --------------------

    /// `function := "func" IDENT "(" params? ")" block`
    fn parse_function(&mut self) -> Result<Function, ParseError> {
        self.expect_keyword("func")?;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_param()?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_block()?;

        Ok(Function { name, params, body })
    }

    /// `param := ("ref" ":")? IDENT`
    ///
    /// `ref` is an ordinary identifier; it only acts as a marker when
    /// immediately followed by a colon.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let is_ref = self.peek().kind == TokenKind::Identifier
            && self.peek().lexeme == "ref"
            && self.peek_at(1).kind == TokenKind::Colon;
        if is_ref {
            self.advance(); // ref
            self.advance(); // :
        }

        let name = self.expect_identifier()?;
        Ok(Param { name, is_ref })
    }

    // --------------------
    // Statements
    // --------------------

    /// `block := "{" statement* "}"`
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.check(TokenKind::Eof) {
                return Err(ParseError::UnexpectedEof {
                    context: "unclosed block".to_string(),
                    span: self.peek().span,
                });
            }
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RightBrace)?;
        Ok(Block { statements })
    }

    /// Dispatches on one token of lookahead.
    ///
    /// Keywords select their statements directly; `print`/`println`/`for`
    /// are matched by identifier lexeme. Everything else falls through to
    /// the assignment/expression statement.
    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Keyword => match token.lexeme.as_str() {
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "return" => self.parse_return(),
                "break" => {
                    self.advance();
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Stmt::Break)
                }
                "continue" => {
                    self.advance();
                    self.expect(TokenKind::Semicolon)?;
                    Ok(Stmt::Continue)
                }
                // true/false begin an expression statement
                "true" | "false" => self.parse_assignment_or_expr(),
                other => Err(ParseError::UnexpectedToken {
                    expected: "statement".to_string(),
                    found: format!("'{}'", other),
                    span: token.span,
                }),
            },
            TokenKind::Identifier if token.lexeme == "print" => self.parse_print(false),
            TokenKind::Identifier if token.lexeme == "println" => self.parse_print(true),
            TokenKind::Identifier if token.lexeme == "for" => self.parse_for(),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                context: "expected a statement".to_string(),
                span: token.span,
            }),
            _ => self.parse_assignment_or_expr(),
        }
    }

    /// `print_stmt := ("print" | "println") "(" expression ")" ";"`
    fn parse_print(&mut self, newline: bool) -> Result<Stmt, ParseError> {
        self.advance(); // print / println
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(if newline {
            Stmt::Println(expr)
        } else {
            Stmt::Print(expr)
        })
    }

    /// `if_stmt := "if" "(" expression ")" block ("else" (if_stmt | block))?`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword("if")?;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;

        let then_branch = self.parse_block()?;

        let else_branch = if self.peek().is_keyword("else") {
            self.advance();
            if self.peek().is_keyword("if") {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `while_stmt := "while" "(" expression ")" block`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword("while")?;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::While { condition, body })
    }

    /// `for_stmt := "for" "(" assignments ";" expression ";" assignments ")" block`
    ///
    /// All three header parts are required.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.advance(); // for
        self.expect(TokenKind::LeftParen)?;

        let init = self.parse_assignment_chain()?;
        self.expect(TokenKind::Semicolon)?;

        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::Semicolon)?;

        let increment = self.parse_assignment_chain()?;
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_block()?;

        Ok(Stmt::For {
            init,
            condition,
            increment,
            body,
        })
    }

    /// `return_stmt := "return" expression? ";"`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword("return")?;

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        self.expect(TokenKind::Semicolon)?;

        Ok(Stmt::Return(value))
    }

    /// Parses the default statement form: an expression, promoted to an
    /// assignment statement when an assignment operator follows.
    fn parse_assignment_or_expr(&mut self) -> Result<Stmt, ParseError> {
        let target_span = self.peek().span;
        let expr = self.parse_expr(0)?;

        let stmt = if assign_op(self.peek().kind).is_some() {
            let first = self.finish_assignment(expr, target_span)?;
            let mut assignments = vec![first];
            while self.check(TokenKind::Comma) {
                self.advance();
                let span = self.peek().span;
                let target = self.parse_expr(0)?;
                assignments.push(self.finish_assignment(target, span)?);
            }
            Stmt::Assignment(assignments)
        } else {
            Stmt::Expr(expr)
        };

        self.expect(TokenKind::Semicolon)?;
        Ok(stmt)
    }

    /// Parses a comma-separated assignment chain without the trailing
    /// semicolon, as used by the `for` header.
    fn parse_assignment_chain(&mut self) -> Result<Vec<Assign>, ParseError> {
        let mut assignments = Vec::new();
        loop {
            let span = self.peek().span;
            let target = self.parse_expr(0)?;
            assignments.push(self.finish_assignment(target, span)?);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(assignments)
    }

    /// Consumes the assignment operator and right-hand side for an already
    /// parsed target, validating the target shape.
    fn finish_assignment(
        &mut self,
        target: Expr,
        target_span: crate::ast::Span,
    ) -> Result<Assign, ParseError> {
        if !matches!(target, Expr::Variable(_) | Expr::Index { .. }) {
            return Err(ParseError::InvalidAssignTarget { span: target_span });
        }

        let Some(op) = assign_op(self.peek().kind) else {
            return Err(ParseError::UnexpectedToken {
                expected: "assignment operator".to_string(),
                found: format!("'{}'", self.peek().lexeme),
                span: self.peek().span,
            });
        };
        self.advance();

        let value = self.parse_expr(0)?;
        Ok(Assign { target, op, value })
    }

    // --------------------
    // Expressions
    // --------------------

    /// Precedence-climbing expression parser.
    ///
    /// `min_bp` is the minimum binding power an infix operator must have to
    /// extend the current expression.
    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(((left_bp, right_bp), op)) = infix_binding_power(self.peek().kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();

            let right = self.parse_expr(right_bp)?;
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(right),
            };
        }

        Ok(lhs)
    }

    /// Parses prefix operators, then a primary with its postfix chain.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some((_, op)) = prefix_binding_power(self.peek().kind) {
            self.advance();
            let operand = self.parse_prefix()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    /// Parses the left-associative postfix chain: calls, indexing and
    /// member access.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.peek().kind {
                TokenKind::LeftParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenKind::RightParen) {
                        loop {
                            args.push(self.parse_expr(0)?);
                            if self.check(TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RightParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    self.expect(TokenKind::RightBracket)?;
                    expr = Expr::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_identifier()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        name,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parses literals, variable references, grouping and array literals.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Number(token.lexeme))
            }
            TokenKind::Str => {
                self.advance();
                Ok(Expr::Str(token.lexeme))
            }
            TokenKind::Keyword if token.lexeme == "true" => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::Keyword if token.lexeme == "false" => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Variable(token.lexeme))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::LeftBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(TokenKind::RightBracket) {
                    loop {
                        elements.push(self.parse_expr(0)?);
                        if self.check(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RightBracket)?;
                Ok(Expr::Array(elements))
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                context: "expected an expression".to_string(),
                span: token.span,
            }),
            _ => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: format!("'{}'", token.lexeme),
                span: token.span,
            }),
        }
    }

    // --------------------
    // Helpers
    // --------------------

    /// Returns the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Returns the token `offset` positions ahead of the current one.
    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// Consumes and returns the current token. The trailing `Eof` is never
    /// consumed past.
    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current.min(self.tokens.len() - 1)];
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    /// Returns true when the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the current token if it has the given kind, or fails with
    /// the offending lexeme.
    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                found: format!("'{}'", self.peek().lexeme),
                span: self.peek().span,
            })
        }
    }

    /// Consumes the given keyword or fails.
    fn expect_keyword(&mut self, word: &str) -> Result<(), ParseError> {
        if self.peek().is_keyword(word) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("'{}'", word),
                found: format!("'{}'", self.peek().lexeme),
                span: self.peek().span,
            })
        }
    }

    /// Consumes an identifier and returns its name.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if self.check(TokenKind::Identifier) {
            let name = self.peek().lexeme.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: format!("'{}'", self.peek().lexeme),
                span: self.peek().span,
            })
        }
    }
}

/// Maps an assignment-operator token to its AST operator.
fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Equal => Some(AssignOp::Assign),
        TokenKind::PlusEquals => Some(AssignOp::Add),
        TokenKind::MinusEquals => Some(AssignOp::Sub),
        TokenKind::StarEquals => Some(AssignOp::Mul),
        TokenKind::SlashEquals => Some(AssignOp::Div),
        TokenKind::PercentEquals => Some(AssignOp::Mod),
        TokenKind::AmpEquals => Some(AssignOp::BitAnd),
        TokenKind::BarEquals => Some(AssignOp::BitOr),
        TokenKind::CaretEquals => Some(AssignOp::BitXor),
        _ => None,
    }
}
