//! Macro table and expansion (spec §4.2): object-like and function-like
//! `` `define``s, with default parameter values and identifier-boundary-aware
//! argument substitution.

use crate::lexer::Token;
use crate::parser::syntax_kind::SyntaxKind;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MacroParam {
    pub name: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MacroDefinition {
    pub name: String,
    /// `None` for an object-like macro; `Some(params)` (possibly empty, for
    /// `` `FOO()``) for a function-like one.
    params: Option<Vec<MacroParam>>,
    body: String,
}

impl MacroDefinition {
    pub fn object_like(name: String, body: String) -> Self {
        MacroDefinition {
            name,
            params: None,
            body,
        }
    }

    pub fn function_like(name: String, params: Vec<MacroParam>, body: String) -> Self {
        MacroDefinition {
            name,
            params: Some(params),
            body,
        }
    }

    pub fn is_function_like(&self) -> bool {
        self.params.is_some()
    }

    /// Substitutes `args` (positional, falling back to each parameter's
    /// default when an argument is missing) into the macro body. For an
    /// object-like macro, `args` is ignored and the body is returned as-is.
    pub fn expand(&self, args: &[String]) -> String {
        let Some(params) = &self.params else {
            return self.body.clone();
        };
        let mut substitutions: FxHashMap<&str, &str> = FxHashMap::default();
        for (i, p) in params.iter().enumerate() {
            let value = args
                .get(i)
                .map(String::as_str)
                .or(p.default.as_deref())
                .unwrap_or("");
            substitutions.insert(p.name.as_str(), value);
        }
        substitute_identifiers(&self.body, &substitutions)
    }
}

/// Replaces whole-identifier occurrences of a macro parameter name in
/// `body` with its argument text, leaving every other token (including
/// trivia) untouched. Re-lexing rather than doing a textual find/replace
/// means `argument` never accidentally matches inside a string literal or
/// as a substring of a longer identifier.
fn substitute_identifiers(body: &str, substitutions: &FxHashMap<&str, &str>) -> String {
    let tokens = crate::lexer::lex(body);
    let mut out = String::with_capacity(body.len());
    for t in tokens.tokens {
        for trivia in &t.leading_trivia {
            out.push_str(trivia.text);
        }
        if t.token.kind == SyntaxKind::IDENT {
            if let Some(replacement) = substitutions.get(t.token.text) {
                out.push_str(replacement);
                continue;
            }
        }
        out.push_str(t.token.text);
    }
    for trivia in &tokens.trailing {
        out.push_str(trivia.text);
    }
    out
}

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: FxHashMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, def: MacroDefinition) {
        self.macros.insert(def.name.clone(), def);
    }

    pub fn undef(&mut self, name: &str) {
        self.macros.remove(name);
    }

    pub fn clear(&mut self) {
        self.macros.clear();
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }
}

/// Parses the remainder of a `` `define`` directive's token stream (with the
/// `` `define`` token itself already consumed) into a [`MacroDefinition`].
pub fn parse_define(tokens: &mut VecDeque<Token<'_>>) -> Option<MacroDefinition> {
    skip_trivia(tokens);
    let name_tok = tokens.pop_front()?;
    if name_tok.kind != SyntaxKind::IDENT {
        return None;
    }
    let name = name_tok.text.to_string();

    let is_function_like = matches!(
        tokens.front(),
        Some(t) if t.kind == SyntaxKind::L_PAREN && t.range.start() == name_tok.range.end()
    );

    let params = if is_function_like {
        tokens.pop_front(); // '('
        Some(parse_param_list(tokens))
    } else {
        None
    };

    skip_trivia_except_newline(tokens);
    let body = collect_body_to_newline(tokens);

    Some(match params {
        Some(params) => MacroDefinition::function_like(name, params, body),
        None => MacroDefinition::object_like(name, body),
    })
}

fn parse_param_list(tokens: &mut VecDeque<Token<'_>>) -> Vec<MacroParam> {
    let mut params = Vec::new();
    loop {
        skip_trivia(tokens);
        match tokens.front() {
            Some(t) if t.kind == SyntaxKind::R_PAREN => {
                tokens.pop_front();
                break;
            }
            None => break,
            _ => {}
        }
        skip_trivia(tokens);
        let Some(name_tok) = tokens.pop_front() else {
            break;
        };
        if name_tok.kind != SyntaxKind::IDENT {
            continue;
        }
        skip_trivia(tokens);
        let default = if matches!(tokens.front(), Some(t) if t.kind == SyntaxKind::EQ) {
            tokens.pop_front();
            skip_trivia(tokens);
            Some(collect_until(tokens, &[SyntaxKind::COMMA, SyntaxKind::R_PAREN]))
        } else {
            None
        };
        params.push(MacroParam {
            name: name_tok.text.to_string(),
            default,
        });
        skip_trivia(tokens);
        if matches!(tokens.front(), Some(t) if t.kind == SyntaxKind::COMMA) {
            tokens.pop_front();
        }
    }
    params
}

fn collect_until(tokens: &mut VecDeque<Token<'_>>, stop_kinds: &[SyntaxKind]) -> String {
    let mut out = String::new();
    while let Some(t) = tokens.front() {
        if stop_kinds.contains(&t.kind) {
            break;
        }
        out.push_str(t.text);
        tokens.pop_front();
    }
    out.trim().to_string()
}

fn collect_body_to_newline(tokens: &mut VecDeque<Token<'_>>) -> String {
    let mut out = String::new();
    while let Some(t) = tokens.front() {
        if t.kind == SyntaxKind::WHITESPACE && t.text.contains('\n') {
            break;
        }
        out.push_str(t.text);
        tokens.pop_front();
    }
    out.trim().to_string()
}

fn skip_trivia(tokens: &mut VecDeque<Token<'_>>) {
    while matches!(tokens.front(), Some(t) if t.kind.is_trivia()) {
        tokens.pop_front();
    }
}

fn skip_trivia_except_newline(tokens: &mut VecDeque<Token<'_>>) {
    while let Some(t) = tokens.front() {
        if t.kind.is_trivia() && !t.text.contains('\n') {
            tokens.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_like_macro_expands_verbatim() {
        let def = MacroDefinition::object_like("WIDTH".into(), "8".into());
        assert_eq!(def.expand(&[]), "8");
    }

    #[test]
    fn function_like_macro_substitutes_params() {
        let def = MacroDefinition::function_like(
            "MAX".into(),
            vec![
                MacroParam { name: "a".into(), default: None },
                MacroParam { name: "b".into(), default: None },
            ],
            "((a) > (b) ? (a) : (b))".into(),
        );
        let expanded = def.expand(&["x".to_string(), "y".to_string()]);
        assert_eq!(expanded, "((x) > (y) ? (x) : (y))");
    }

    #[test]
    fn missing_argument_falls_back_to_default() {
        let def = MacroDefinition::function_like(
            "INC".into(),
            vec![
                MacroParam { name: "a".into(), default: None },
                MacroParam { name: "step".into(), default: Some("1".into()) },
            ],
            "(a + step)".into(),
        );
        let expanded = def.expand(&["n".to_string()]);
        assert_eq!(expanded, "(n + 1)");
    }

    #[test]
    fn substitution_does_not_touch_identifier_substrings() {
        let def = MacroDefinition::function_like(
            "ID".into(),
            vec![MacroParam { name: "a".into(), default: None }],
            "a_extra + a".into(),
        );
        let expanded = def.expand(&["x".to_string()]);
        assert_eq!(expanded, "a_extra + x");
    }
}
