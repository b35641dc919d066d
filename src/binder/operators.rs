//! `SyntaxKind` → `eval::{BinaryOp, UnaryOp}` mapping (spec table 11-2).
//!
//! XNOR (`~^`/`^~`) has no dedicated `BinaryOp`/`UnaryOp` variant in
//! `eval::interpreter` — as a binary operator it is synthesized as
//! `~(a ^ b)`; as a unary reduction it is `ReduceXnor` directly.

use crate::eval::{BinaryOp, ConstExpr, UnaryOp};
use crate::parser::syntax_kind::SyntaxKind;

pub fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    use SyntaxKind::*;
    Some(match kind {
        PLUS => BinaryOp::Add,
        MINUS => BinaryOp::Sub,
        STAR => BinaryOp::Mul,
        SLASH => BinaryOp::Div,
        PERCENT => BinaryOp::Rem,
        AMP => BinaryOp::BitAnd,
        PIPE => BinaryOp::BitOr,
        CARET => BinaryOp::BitXor,
        AMP_AMP => BinaryOp::LogicalAnd,
        PIPE_PIPE => BinaryOp::LogicalOr,
        LT_LT | LT_LT_LT => BinaryOp::Shl,
        GT_GT => BinaryOp::Lshr,
        GT_GT_GT => BinaryOp::Ashr,
        EQ_EQ => BinaryOp::Eq,
        BANG_EQ => BinaryOp::Ne,
        EQ_EQ_EQ => BinaryOp::CaseEq,
        BANG_EQ_EQ => BinaryOp::CaseNe,
        EQ_QUESTION => BinaryOp::WildcardEq,
        BANG_QUESTION => BinaryOp::WildcardNe,
        LT => BinaryOp::Lt,
        LT_EQ => BinaryOp::Le,
        GT => BinaryOp::Gt,
        GT_EQ => BinaryOp::Ge,
        STAR_STAR => BinaryOp::Pow,
        _ => return None,
    })
}

/// `true` for `kind` being one of the two XNOR spellings, which `binary_op`
/// can't represent directly since `eval::BinaryOp` has no XNOR variant.
pub fn is_xnor(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::TILDE_CARET | SyntaxKind::CARET_TILDE)
}

/// `~(lhs ^ rhs)`, the binder's stand-in for the missing `BinaryOp::Xnor`.
pub fn make_xnor(lhs: ConstExpr, rhs: ConstExpr) -> ConstExpr {
    ConstExpr::Unary(
        UnaryOp::BitNot,
        Box::new(ConstExpr::Binary(BinaryOp::BitXor, Box::new(lhs), Box::new(rhs))),
    )
}

pub fn unary_op(kind: SyntaxKind) -> Option<UnaryOp> {
    use SyntaxKind::*;
    Some(match kind {
        PLUS => UnaryOp::Plus,
        MINUS => UnaryOp::Minus,
        BANG => UnaryOp::LogicalNot,
        TILDE => UnaryOp::BitNot,
        AMP => UnaryOp::ReduceAnd,
        PIPE => UnaryOp::ReduceOr,
        CARET => UnaryOp::ReduceXor,
        TILDE_AMP => UnaryOp::ReduceNand,
        TILDE_PIPE => UnaryOp::ReduceNor,
        TILDE_CARET | CARET_TILDE => UnaryOp::ReduceXnor,
        _ => return None,
    })
}

/// Operators whose operand widths/signedness must be equalized to a common
/// "context-determined" shape before the op runs (table 11-2's "context
/// determined" column) — everything else is self-determined per operand.
/// `&&`/`||` reduce each operand to a single bit on their own and never
/// participate in this equalization.
pub fn is_context_determined(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::CaseEq
            | BinaryOp::CaseNe
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_arithmetic_and_relational_operators() {
        assert_eq!(binary_op(SyntaxKind::PLUS), Some(BinaryOp::Add));
        assert_eq!(binary_op(SyntaxKind::LT_EQ), Some(BinaryOp::Le));
        assert_eq!(binary_op(SyntaxKind::STAR_STAR), Some(BinaryOp::Pow));
    }

    #[test]
    fn xnor_has_no_direct_binary_op() {
        assert_eq!(binary_op(SyntaxKind::TILDE_CARET), None);
        assert!(is_xnor(SyntaxKind::TILDE_CARET));
        assert!(is_xnor(SyntaxKind::CARET_TILDE));
    }

    #[test]
    fn unary_reduction_operators_map() {
        assert_eq!(unary_op(SyntaxKind::AMP), Some(UnaryOp::ReduceAnd));
        assert_eq!(unary_op(SyntaxKind::TILDE_CARET), Some(UnaryOp::ReduceXnor));
    }

    #[test]
    fn pow_is_not_context_determined() {
        assert!(!is_context_determined(BinaryOp::Pow));
        assert!(is_context_determined(BinaryOp::Add));
    }
}
