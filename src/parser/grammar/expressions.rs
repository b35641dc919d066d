//! Expression grammar (spec §3.6/§4.4 EXPRESSION): precedence-climbing
//! binary/conditional operators over a primary-expression/postfix layer
//! (literals, names, calls, indexing, concatenation/replication, casts).

use super::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// `(precedence, right-associative)` for each binary operator token, lowest
/// binding first. Matches IEEE 1800 table 11-2, collapsing the handful of
/// assignment operators out (those live in `grammar::statements` instead,
/// since SV restricts assignment to statement context, not expressions).
fn binary_precedence(kind: SyntaxKind) -> Option<(u8, bool)> {
    Some(match kind {
        SyntaxKind::PIPE_PIPE => (1, false),
        SyntaxKind::AMP_AMP => (2, false),
        SyntaxKind::PIPE => (3, false),
        SyntaxKind::CARET | SyntaxKind::CARET_TILDE | SyntaxKind::TILDE_CARET => (4, false),
        SyntaxKind::AMP => (5, false),
        SyntaxKind::EQ_EQ
        | SyntaxKind::BANG_EQ
        | SyntaxKind::EQ_EQ_EQ
        | SyntaxKind::BANG_EQ_EQ
        | SyntaxKind::EQ_QUESTION
        | SyntaxKind::BANG_QUESTION => (6, false),
        SyntaxKind::LT | SyntaxKind::LT_EQ | SyntaxKind::GT | SyntaxKind::GT_EQ => (7, false),
        SyntaxKind::LT_LT | SyntaxKind::GT_GT | SyntaxKind::LT_LT_LT | SyntaxKind::GT_GT_GT => (8, false),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (9, false),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => (10, false),
        SyntaxKind::STAR_STAR => (11, true),
        _ => return None,
    })
}

fn is_unary_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PLUS
            | SyntaxKind::MINUS
            | SyntaxKind::BANG
            | SyntaxKind::TILDE
            | SyntaxKind::AMP
            | SyntaxKind::PIPE
            | SyntaxKind::CARET
            | SyntaxKind::TILDE_AMP
            | SyntaxKind::TILDE_PIPE
            | SyntaxKind::TILDE_CARET
            | SyntaxKind::CARET_TILDE
    )
}

/// True if `kind` can begin a `primary_expression`/`unary_expression` — used
/// by callers (script-scope top-level parsing) that need to tell "this is an
/// expression statement" apart from "this isn't a valid item at all" before
/// committing to `expression`.
pub(crate) fn expression_can_start(kind: SyntaxKind) -> bool {
    is_unary_op(kind)
        || matches!(
            kind,
            SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACE
                | SyntaxKind::APOSTROPHE_L_BRACE
                | SyntaxKind::STRING_LITERAL
                | SyntaxKind::DECIMAL_LITERAL
                | SyntaxKind::SIZED_INT_LITERAL
                | SyntaxKind::UNSIZED_BASED_INT_LITERAL
                | SyntaxKind::UNBASED_UNSIZED_LITERAL
                | SyntaxKind::REAL_LITERAL
                | SyntaxKind::TIME_LITERAL
                | SyntaxKind::NULL_KW
                | SyntaxKind::THIS_KW
                | SyntaxKind::SUPER_KW
                | SyntaxKind::IDENT
                | SyntaxKind::ESCAPED_IDENT
                | SyntaxKind::SYSTEM_IDENT
        )
}

/// Entry point: parses a full expression, handling the ternary conditional
/// (lower precedence than any binary operator, right-associative).
pub fn expression(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    binary_expression(p, 0);
    p.skip_trivia();
    if p.at(SyntaxKind::QUESTION) {
        p.start_node_at(checkpoint, SyntaxKind::CONDITIONAL_EXPRESSION);
        p.bump(); // '?'
        p.skip_trivia();
        expression(p);
        p.skip_trivia();
        p.expect(SyntaxKind::COLON);
        p.skip_trivia();
        expression(p);
        p.finish_node();
    }
}

fn binary_expression(p: &mut Parser, min_prec: u8) {
    let checkpoint = p.checkpoint();
    unary_expression(p);
    loop {
        p.skip_trivia();
        let Some((prec, right_assoc)) = binary_precedence(p.current_kind()) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        p.start_node_at(checkpoint, SyntaxKind::BINARY_EXPRESSION);
        p.bump(); // operator
        p.skip_trivia();
        let next_min = if right_assoc { prec } else { prec + 1 };
        binary_expression(p, next_min);
        p.finish_node();
    }
}

fn unary_expression(p: &mut Parser) {
    if is_unary_op(p.current_kind()) {
        p.start_node(SyntaxKind::UNARY_EXPRESSION);
        p.bump();
        p.skip_trivia();
        unary_expression(p);
        p.finish_node();
    } else {
        postfix_expression(p);
    }
}

fn postfix_expression(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    primary_expression(p);
    loop {
        p.skip_trivia();
        match p.current_kind() {
            SyntaxKind::L_BRACKET => {
                // Bracket contents are parsed before the node kind is
                // decided (plain index vs. `[msb:lsb]` range), then the
                // whole span — including the brackets themselves — is
                // wrapped retroactively via `start_node_at`.
                p.bump();
                p.skip_trivia();
                expression(p);
                p.skip_trivia();
                let is_range = p.eat(SyntaxKind::COLON);
                if is_range {
                    p.skip_trivia();
                    expression(p);
                    p.skip_trivia();
                }
                p.expect(SyntaxKind::R_BRACKET);
                let kind = if is_range {
                    SyntaxKind::RANGE_EXPRESSION
                } else {
                    SyntaxKind::INDEX_EXPRESSION
                };
                p.start_node_at(checkpoint, kind);
                p.finish_node();
            }
            SyntaxKind::DOT => {
                p.start_node_at(checkpoint, SyntaxKind::MEMBER_ACCESS_EXPRESSION);
                p.bump();
                p.skip_trivia();
                p.expect(SyntaxKind::IDENT);
                p.finish_node();
            }
            SyntaxKind::L_PAREN => {
                p.start_node_at(checkpoint, SyntaxKind::CALL_EXPRESSION);
                argument_list(p);
                p.finish_node();
            }
            _ => break,
        }
    }
}

fn argument_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ARGUMENT_LIST);
    p.bump(); // '('
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        expression(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

const PRIMARY_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::COMMA,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
];

fn primary_expression(p: &mut Parser) {
    match p.current_kind() {
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PAREN_EXPRESSION);
            p.bump();
            p.skip_trivia();
            expression(p);
            p.skip_trivia();
            p.expect(SyntaxKind::R_PAREN);
            p.finish_node();
        }
        SyntaxKind::L_BRACE => concatenation_or_replication(p),
        SyntaxKind::APOSTROPHE_L_BRACE => {
            p.start_node(SyntaxKind::ASSIGNMENT_PATTERN_EXPRESSION);
            p.bump(); // "'{"
            loop {
                p.skip_trivia();
                if p.at(SyntaxKind::R_BRACE) || p.at_eof() {
                    break;
                }
                expression(p);
                p.skip_trivia();
                if !p.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            p.skip_trivia();
            p.expect(SyntaxKind::R_BRACE);
            p.finish_node();
        }
        SyntaxKind::STRING_LITERAL
        | SyntaxKind::DECIMAL_LITERAL
        | SyntaxKind::SIZED_INT_LITERAL
        | SyntaxKind::UNSIZED_BASED_INT_LITERAL
        | SyntaxKind::UNBASED_UNSIZED_LITERAL
        | SyntaxKind::REAL_LITERAL
        | SyntaxKind::TIME_LITERAL => {
            p.start_node(SyntaxKind::LITERAL_EXPRESSION);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::NULL_KW | SyntaxKind::THIS_KW | SyntaxKind::SUPER_KW => {
            p.start_node(SyntaxKind::LITERAL_EXPRESSION);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::IDENT | SyntaxKind::ESCAPED_IDENT | SyntaxKind::SYSTEM_IDENT => {
            p.start_node(SyntaxKind::IDENT_EXPRESSION);
            p.bump();
            p.finish_node();
        }
        k if cast_target_starts_here(p, k) => cast_expression(p),
        _ => p.error_recover("expected an expression", PRIMARY_RECOVERY),
    }
}

/// A cast `type'(expr)` looks like a data-type keyword immediately followed
/// by `'(` — distinguished here from an ordinary identifier/keyword primary
/// by that lookahead rather than by a separate grammar rule up front.
fn cast_target_starts_here(p: &Parser, k: SyntaxKind) -> bool {
    matches!(
        k,
        SyntaxKind::BIT_KW
            | SyntaxKind::LOGIC_KW
            | SyntaxKind::INT_KW
            | SyntaxKind::BYTE_KW
            | SyntaxKind::SHORTINT_KW
            | SyntaxKind::LONGINT_KW
            | SyntaxKind::INTEGER_KW
            | SyntaxKind::REAL_KW
            | SyntaxKind::SIGNED_KW
            | SyntaxKind::UNSIGNED_KW
    ) && p.nth(1) == SyntaxKind::APOSTROPHE
}

fn cast_expression(p: &mut Parser) {
    p.start_node(SyntaxKind::CAST_EXPRESSION);
    super::items::data_type(p);
    p.skip_trivia();
    p.expect(SyntaxKind::APOSTROPHE);
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// `{a, b, c}` is concatenation; `{n{a, b}}` is replication (a concatenation
/// repeated `n` times) — disambiguated by whether a `{` immediately follows
/// the first element with no comma.
fn concatenation_or_replication(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    p.bump(); // '{'
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    if p.at(SyntaxKind::L_BRACE) {
        p.start_node_at(checkpoint, SyntaxKind::REPLICATION_EXPRESSION);
        concatenation_expression(p);
        p.skip_trivia();
        p.expect(SyntaxKind::R_BRACE);
        p.finish_node();
        return;
    }
    p.start_node_at(checkpoint, SyntaxKind::CONCATENATION_EXPRESSION);
    while p.eat(SyntaxKind::COMMA) {
        p.skip_trivia();
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

fn concatenation_expression(p: &mut Parser) {
    p.start_node(SyntaxKind::CONCATENATION_EXPRESSION);
    p.bump(); // '{'
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_BRACE) || p.at_eof() {
            break;
        }
        expression(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::Parser as RealParser;
    use crate::preprocessor::PpToken;
    use crate::base::SourceLocation;

    fn parse_expr(src: &str) -> crate::parser::Parse {
        let grouped = crate::lexer::lex(src);
        let mut tokens = Vec::new();
        for t in grouped.tokens {
            for trivia in &t.leading_trivia {
                tokens.push(PpToken {
                    kind: trivia.kind,
                    text: trivia.text.to_string(),
                    location: SourceLocation::NONE,
                });
            }
            tokens.push(PpToken {
                kind: t.token.kind,
                text: t.token.text.to_string(),
                location: SourceLocation::NONE,
            });
        }
        let mut p = RealParser::new(&tokens);
        p.start_node(SyntaxKind::SOURCE_FILE);
        expression(&mut p);
        p.finish_node();
        p.finish()
    }

    #[test]
    fn respects_operator_precedence() {
        let parse = parse_expr("a + b * c");
        assert!(parse.ok());
    }

    #[test]
    fn parses_ternary_and_concatenation() {
        let parse = parse_expr("sel ? {a, b} : {2{c}}");
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }
}
