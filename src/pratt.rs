//! Binding-power tables for Penguin expression precedence.
//!
//! The parser drives a single precedence-climbing loop from these tables.
//! Higher binding power binds tighter; an infix operator's pair is
//! `(left_bp, right_bp)` with `left_bp < right_bp`, so operators of equal
//! precedence group to the left.
//!
//! # Precedence Table
//!
//! From lowest to highest:
//!
//! 1. Logical or `||`
//! 2. Logical and `&&`
//! 3. Bitwise or `|`
//! 4. Bitwise xor `^`
//! 5. Bitwise and `&`
//! 6. Equality `==`, `!=`
//! 7. Comparison `<`, `<=`, `>`, `>=`
//! 8. Shift `<<`, `>>`
//! 9. Additive `+`, `-`
//! 10. Multiplicative `*`, `/`, `%`
//!
//! Unary `!`/`-` bind tighter than every binary operator, and the postfix
//! forms (call, index, member) tighter still; the parser handles postfix
//! chains directly.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::TokenKind;

/// Returns the binding power pair and AST operator for infix operators.
///
/// # Returns
///
/// `Some(((left_bp, right_bp), op))` when the token is a binary operator,
/// `None` otherwise.
pub fn infix_binding_power(kind: TokenKind) -> Option<((u8, u8), BinaryOp)> {
    let entry = match kind {
        TokenKind::Or => ((1, 2), BinaryOp::Or),
        TokenKind::And => ((3, 4), BinaryOp::And),
        TokenKind::Bar => ((5, 6), BinaryOp::BitOr),
        TokenKind::Caret => ((7, 8), BinaryOp::BitXor),
        TokenKind::Amp => ((9, 10), BinaryOp::BitAnd),
        TokenKind::Eq => ((11, 12), BinaryOp::Eq),
        TokenKind::Ne => ((11, 12), BinaryOp::Ne),
        TokenKind::Lt => ((13, 14), BinaryOp::Lt),
        TokenKind::Le => ((13, 14), BinaryOp::Le),
        TokenKind::Gt => ((13, 14), BinaryOp::Gt),
        TokenKind::Ge => ((13, 14), BinaryOp::Ge),
        TokenKind::Shl => ((15, 16), BinaryOp::Shl),
        TokenKind::Shr => ((15, 16), BinaryOp::Shr),
        TokenKind::Plus => ((17, 18), BinaryOp::Add),
        TokenKind::Minus => ((17, 18), BinaryOp::Sub),
        TokenKind::Star => ((19, 20), BinaryOp::Mul),
        TokenKind::Slash => ((19, 20), BinaryOp::Div),
        TokenKind::Percent => ((19, 20), BinaryOp::Mod),
        _ => return None,
    };
    Some(entry)
}

/// Returns the binding power and AST operator for prefix operators.
///
/// Both unary operators bind tighter than any binary operator and are
/// right-associative by construction.
pub fn prefix_binding_power(kind: TokenKind) -> Option<(u8, UnaryOp)> {
    match kind {
        TokenKind::Bang => Some((21, UnaryOp::Not)),
        TokenKind::Minus => Some((21, UnaryOp::Neg)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_operators_are_left_associative() {
        for kind in [
            TokenKind::Or,
            TokenKind::And,
            TokenKind::Plus,
            TokenKind::Star,
            TokenKind::Shl,
        ] {
            let ((left, right), _) = infix_binding_power(kind).unwrap();
            assert!(left < right, "{:?} should group to the left", kind);
        }
    }

    #[test]
    fn test_precedence_order() {
        let bp = |kind| infix_binding_power(kind).unwrap().0 .0;
        assert!(bp(TokenKind::Or) < bp(TokenKind::And));
        assert!(bp(TokenKind::And) < bp(TokenKind::Bar));
        assert!(bp(TokenKind::Bar) < bp(TokenKind::Caret));
        assert!(bp(TokenKind::Caret) < bp(TokenKind::Amp));
        assert!(bp(TokenKind::Amp) < bp(TokenKind::Eq));
        assert!(bp(TokenKind::Eq) < bp(TokenKind::Lt));
        assert!(bp(TokenKind::Lt) < bp(TokenKind::Shl));
        assert!(bp(TokenKind::Shl) < bp(TokenKind::Plus));
        assert!(bp(TokenKind::Plus) < bp(TokenKind::Star));
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let (unary_bp, _) = prefix_binding_power(TokenKind::Minus).unwrap();
        let ((_, mul_right), _) = infix_binding_power(TokenKind::Star).unwrap();
        assert!(unary_bp > mul_right);
    }

    #[test]
    fn test_non_operators_have_no_power() {
        assert!(infix_binding_power(TokenKind::Semicolon).is_none());
        assert!(infix_binding_power(TokenKind::Equal).is_none());
        assert!(prefix_binding_power(TokenKind::Plus).is_none());
    }
}
