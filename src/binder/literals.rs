//! Literal token text → `ConstExpr` (spec §4.2's literal grammar, spec §3.6).
//!
//! The lexer fuses a size prefix onto its based-literal suffix into one
//! `SIZED_INT_LITERAL` token (`crate::lexer`'s `fuses_sized_literal`), so
//! everything here works directly off raw token text rather than re-deriving
//! the split the lexer already did.

use crate::eval::svint::{FourState, SVInt};
use crate::eval::ConstExpr;
use crate::parser::syntax_kind::{SyntaxKind, SyntaxToken};
use std::sync::Arc;

pub fn bind_literal_token(token: &SyntaxToken) -> ConstExpr {
    let text = token.text();
    match token.kind() {
        SyntaxKind::DECIMAL_LITERAL => {
            let digits: String = text.chars().filter(|c| *c != '_').collect();
            match SVInt::parse_based(32, true, 'd', &digits) {
                Ok(v) => ConstExpr::IntLiteral(v),
                Err(_) => ConstExpr::IntLiteral(SVInt::zero(32, true)),
            }
        }
        SyntaxKind::SIZED_INT_LITERAL => ConstExpr::IntLiteral(parse_sized(text)),
        SyntaxKind::UNSIZED_BASED_INT_LITERAL => ConstExpr::IntLiteral(parse_based_suffix(text, 32)),
        SyntaxKind::UNBASED_UNSIZED_LITERAL => {
            let state = text
                .chars()
                .nth(1)
                .map(four_state_digit)
                .unwrap_or(FourState::Zero);
            ConstExpr::UnbasedUnsized(state)
        }
        SyntaxKind::REAL_LITERAL => {
            let cleaned: String = text.chars().filter(|c| *c != '_').collect();
            ConstExpr::RealLiteral(cleaned.parse().unwrap_or(0.0))
        }
        SyntaxKind::TIME_LITERAL => ConstExpr::RealLiteral(parse_time_value(text)),
        SyntaxKind::STRING_LITERAL => ConstExpr::StringLiteral(Arc::from(unescape(text))),
        _ => ConstExpr::IntLiteral(SVInt::zero(32, true)),
    }
}

/// `<width>'[s]<base><digits>`: split at the fused token's `'`, parse the
/// width prefix, then hand the based suffix to `parse_based_suffix`.
fn parse_sized(text: &str) -> SVInt {
    let Some(idx) = text.find('\'') else {
        return SVInt::zero(32, true);
    };
    let width_text: String = text[..idx].chars().filter(|c| *c != '_').collect();
    let width: u32 = width_text.parse().unwrap_or(32);
    parse_based_suffix(&text[idx..], width)
}

/// `'[s]<base><digits>` at the given width (32 for an unsized based literal,
/// the parsed prefix for a sized one).
fn parse_based_suffix(text: &str, width: u32) -> SVInt {
    let rest = &text[1..]; // drop leading '\''
    let (signed, rest) = match rest.chars().next() {
        Some('s') | Some('S') => (true, &rest[1..]),
        _ => (false, rest),
    };
    let mut chars = rest.chars();
    let Some(base) = chars.next() else {
        return SVInt::zero(width, signed);
    };
    let digits = chars.as_str();
    SVInt::parse_based(width, signed, base, digits).unwrap_or_else(|_| SVInt::zero(width, signed))
}

fn four_state_digit(c: char) -> FourState {
    match c.to_ascii_lowercase() {
        '0' => FourState::Zero,
        '1' => FourState::One,
        'x' => FourState::X,
        'z' => FourState::Z,
        _ => FourState::Zero,
    }
}

/// Time literals fold to a real number of the declared unit ignored — there
/// is no active `` `timescale`` in a `ScriptSession`, so the unit suffix only
/// matters for display, never for constant folding.
fn parse_time_value(text: &str) -> f64 {
    let end = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    text[..end].chars().filter(|c| *c != '_').collect::<String>().parse().unwrap_or(0.0)
}

fn unescape(text: &str) -> String {
    let inner = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{AstNode, LiteralExpression, SourceFile};
    use crate::parser::parse_source_file_text;

    fn literal_expr(src: &str) -> LiteralExpression {
        let text = format!("module m; localparam x = {src}; endmodule");
        let parse = parse_source_file_text(&text);
        let file = SourceFile::cast(parse.syntax()).unwrap();
        file.syntax()
            .descendants()
            .find_map(LiteralExpression::cast)
            .unwrap()
    }

    fn bind(src: &str) -> ConstExpr {
        let lit = literal_expr(src);
        bind_literal_token(&lit.token().unwrap())
    }

    #[test]
    fn parses_plain_decimal() {
        match bind("42") {
            ConstExpr::IntLiteral(v) => assert_eq!(v.to_u64(), Some(42)),
            other => panic!("expected int literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_sized_hex() {
        match bind("8'hFF") {
            ConstExpr::IntLiteral(v) => {
                assert_eq!(v.width(), 8);
                assert_eq!(v.to_u64(), Some(255));
            }
            other => panic!("expected int literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_unsized_based_binary() {
        match bind("'b101") {
            ConstExpr::IntLiteral(v) => {
                assert_eq!(v.width(), 32);
                assert_eq!(v.to_u64(), Some(5));
            }
            other => panic!("expected int literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_unbased_unsized() {
        assert!(matches!(bind("'1"), ConstExpr::UnbasedUnsized(FourState::One)));
    }

    #[test]
    fn parses_real_literal() {
        match bind("3.5") {
            ConstExpr::RealLiteral(r) => assert!((r - 3.5).abs() < f64::EPSILON),
            other => panic!("expected real literal, got {other:?}"),
        }
    }

    #[test]
    fn parses_string_literal_with_escapes() {
        match bind("\"a\\nb\"") {
            ConstExpr::StringLiteral(s) => assert_eq!(&*s, "a\nb"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }
}
