//! Directive-aware tokenization (spec §4.2): wraps the raw `logos` token
//! stream with the two things a standalone regex lexer can't do alone —
//! fusing a `DECIMAL_LITERAL` size prefix onto an immediately-following
//! based literal, and grouping trivia so each comment/whitespace run is
//! attached to the token that follows it (spec §3.2: "each trivium is
//! owned by the token that follows it").

pub mod token;

pub use token::{keyword_kind, Lexer, Token};

use crate::parser::syntax_kind::SyntaxKind;

/// A non-trivia token paired with the trivia tokens immediately preceding
/// it (in source order). The final token in a buffer may be followed by
/// trailing trivia with no token to attach to; callers collect that
/// separately (see `trailing`).
#[derive(Debug, Clone)]
pub struct TokenWithTrivia<'a> {
    pub leading_trivia: Vec<Token<'a>>,
    pub token: Token<'a>,
}

/// The result of grouping a raw token stream by trivia ownership.
#[derive(Debug, Clone, Default)]
pub struct TriviaGroupedTokens<'a> {
    pub tokens: Vec<TokenWithTrivia<'a>>,
    /// Trivia after the last real token, with nothing to attach to.
    pub trailing: Vec<Token<'a>>,
}

/// Lexes `input` and fuses/groups the raw token stream per spec §3.2/§4.2.
pub fn lex(input: &str) -> TriviaGroupedTokens<'_> {
    let raw: Vec<Token<'_>> = fuse_sized_literals(Lexer::new(input).collect(), input);

    let mut result = TriviaGroupedTokens::default();
    let mut pending_trivia = Vec::new();
    for tok in raw {
        if tok.kind.is_trivia() {
            pending_trivia.push(tok);
        } else {
            result.tokens.push(TokenWithTrivia {
                leading_trivia: std::mem::take(&mut pending_trivia),
                token: tok,
            });
        }
    }
    result.trailing = pending_trivia;
    result
}

/// `8'hFF` lexes as two adjacent raw tokens (`DECIMAL_LITERAL`,
/// `UNSIZED_BASED_INT_LITERAL`); when nothing (not even whitespace)
/// separates them, reclassify the pair as one `SIZED_INT_LITERAL` token
/// spanning both, matching IEEE 1800's `size '[s]base digits` grammar.
fn fuse_sized_literals<'a>(raw: Vec<Token<'a>>, input: &'a str) -> Vec<Token<'a>> {
    let mut out: Vec<Token<'a>> = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some(tok) = iter.next() {
        if tok.kind == SyntaxKind::DECIMAL_LITERAL {
            if let Some(next) = iter.peek() {
                if next.kind == SyntaxKind::UNSIZED_BASED_INT_LITERAL
                    && next.range.start() == tok.range.end()
                {
                    let next = iter.next().unwrap();
                    let full_range = tok.range.cover(next.range);
                    let text = &input[full_range];
                    out.push(Token {
                        kind: SyntaxKind::SIZED_INT_LITERAL,
                        text,
                        range: full_range,
                    });
                    continue;
                }
            }
        }
        out.push(tok);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuses_sized_literal() {
        let grouped = lex("8'hFF");
        assert_eq!(grouped.tokens.len(), 1);
        assert_eq!(grouped.tokens[0].token.kind, SyntaxKind::SIZED_INT_LITERAL);
        assert_eq!(grouped.tokens[0].token.text, "8'hFF");
    }

    #[test]
    fn does_not_fuse_across_whitespace() {
        let grouped = lex("8 'hFF");
        assert_eq!(grouped.tokens.len(), 2);
        assert_eq!(grouped.tokens[0].token.kind, SyntaxKind::DECIMAL_LITERAL);
        assert_eq!(grouped.tokens[1].token.kind, SyntaxKind::UNSIZED_BASED_INT_LITERAL);
    }

    #[test]
    fn leading_trivia_attaches_to_following_token() {
        let grouped = lex("  // hi\n  module");
        assert_eq!(grouped.tokens.len(), 1);
        assert_eq!(grouped.tokens[0].leading_trivia.len(), 3);
        assert_eq!(grouped.tokens[0].token.kind, SyntaxKind::MODULE_KW);
    }

    #[test]
    fn trailing_trivia_with_no_following_token_is_kept_separately() {
        let grouped = lex("module  ");
        assert_eq!(grouped.tokens.len(), 1);
        assert_eq!(grouped.trailing.len(), 1);
    }
}
