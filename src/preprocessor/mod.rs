//! The SystemVerilog preprocessor (spec §4.2): macro expansion, conditional
//! compilation, and `` `line``/`` `timescale``-class directive handling.
//!
//! Grounded on the lexer/parser split the teacher uses (`parser::lexer`
//! feeding `parser::parser`): here the preprocessor sits between the raw
//! [`crate::lexer`] token stream and the [`crate::parser`], consuming
//! directive tokens and handing the parser a stream of ordinary tokens that
//! already reflects macro expansion and conditional-compilation choices.

mod directive;
mod macros;

pub use directive::{DirectiveError, Directive};
pub use macros::{MacroDefinition, MacroTable};

use crate::base::SourceLocation;
use crate::lexer::{lex, Token};
use crate::parser::syntax_kind::SyntaxKind;
use crate::source::SourceManager;
use std::collections::VecDeque;

/// A token that has survived preprocessing, tagged with the
/// [`SourceLocation`] it should be attributed to (which may be inside a
/// macro-expansion buffer, per spec §4.1).
#[derive(Debug, Clone)]
pub struct PpToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub location: SourceLocation,
}

/// One frame of the `` `ifdef``/`` `ifndef``/`` `elsif``/`` `else``/`` `endif`` stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConditionalFrame {
    /// Whether this branch's text should be emitted.
    active: bool,
    /// Whether any branch in this `` `ifdef``/.../`` `endif`` chain has already
    /// been taken (subsequent `` `elsif``/`` `else`` branches stay inactive even
    /// if their own condition would otherwise hold).
    taken: bool,
}

#[derive(Debug, Default)]
pub struct PreprocessorOptions {
    pub max_include_depth: u32,
    pub max_macro_expansion_depth: u32,
    pub predefined_macros: Vec<(String, String)>,
}

impl PreprocessorOptions {
    pub fn new() -> Self {
        PreprocessorOptions {
            max_include_depth: 1024,
            max_macro_expansion_depth: 1024,
            predefined_macros: Vec::new(),
        }
    }
}

/// Drives directive handling and macro expansion over one buffer's token
/// stream, pushing included/expanded text onto the `SourceManager` as it
/// encounters `` `include``/macro-invocation tokens (spec §4.2).
pub struct Preprocessor<'sm> {
    source_manager: &'sm SourceManager,
    macros: MacroTable,
    conditional_stack: Vec<ConditionalFrame>,
    include_depth: u32,
    expansion_depth: u32,
    options: PreprocessorOptions,
    diagnostics: Vec<DirectiveError>,
}

impl<'sm> Preprocessor<'sm> {
    pub fn new(source_manager: &'sm SourceManager, options: PreprocessorOptions) -> Self {
        let mut macros = MacroTable::new();
        for (name, body) in &options.predefined_macros {
            macros.define(MacroDefinition::object_like(name.clone(), body.clone()));
        }
        Preprocessor {
            source_manager,
            macros,
            conditional_stack: Vec::new(),
            include_depth: 0,
            expansion_depth: 0,
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[DirectiveError] {
        &self.diagnostics
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// True if we are currently inside an inactive (`` `ifdef``-excluded)
    /// region — callers skip emitting tokens while this holds.
    fn in_disabled_region(&self) -> bool {
        self.conditional_stack.iter().any(|f| !f.active)
    }

    /// Preprocesses the text of `buffer`, returning the expanded token
    /// stream ready for the parser. `buffer`'s raw text is re-lexed here
    /// (not reused from an earlier lex pass) since directive recognition
    /// changes how surrounding tokens must be regrouped.
    pub fn preprocess_buffer(&mut self, buffer_id: crate::base::BufferId) -> Vec<PpToken> {
        let text = self.source_manager.get_source_text(buffer_id);
        let grouped = lex(&text);
        let mut tokens: VecDeque<Token<'_>> = grouped
            .tokens
            .into_iter()
            .flat_map(|t| {
                let mut v = t.leading_trivia;
                v.push(t.token);
                v
            })
            .collect();

        let mut out = Vec::new();
        while let Some(tok) = tokens.pop_front() {
            let loc = SourceLocation::new(buffer_id, u32::from(tok.range.start()) as usize);
            if tok.kind == SyntaxKind::DIRECTIVE_NAME {
                self.handle_directive(&tok, &mut tokens, buffer_id, &mut out);
                continue;
            }
            if tok.kind.is_trivia() {
                if !self.in_disabled_region() {
                    out.push(PpToken {
                        kind: tok.kind,
                        text: tok.text.to_string(),
                        location: loc,
                    });
                }
                continue;
            }
            if self.in_disabled_region() {
                continue;
            }
            if tok.kind == SyntaxKind::IDENT {
                if let Some(expansion) = self.try_expand_macro(&tok, &mut tokens, buffer_id) {
                    out.extend(expansion);
                    continue;
                }
            }
            out.push(PpToken {
                kind: tok.kind,
                text: tok.text.to_string(),
                location: loc,
            });
        }
        out
    }

    fn handle_directive(
        &mut self,
        name_tok: &Token<'_>,
        rest: &mut VecDeque<Token<'_>>,
        buffer_id: crate::base::BufferId,
        out: &mut Vec<PpToken>,
    ) {
        let directive_name = &name_tok.text[1..]; // drop the leading backtick
        match directive_name {
            "ifdef" | "ifndef" => {
                let macro_name = next_ident(rest);
                let defined = macro_name.as_deref().is_some_and(|n| self.macros.is_defined(n));
                let condition = if directive_name == "ifdef" { defined } else { !defined };
                let parent_active = !self.in_disabled_region();
                self.conditional_stack.push(ConditionalFrame {
                    active: parent_active && condition,
                    taken: condition,
                });
            }
            "elsif" => {
                let macro_name = next_ident(rest);
                let defined = macro_name.as_deref().is_some_and(|n| self.macros.is_defined(n));
                if !self.conditional_stack.is_empty() {
                    let parent_active = self.conditional_stack[..self.conditional_stack.len() - 1]
                        .iter()
                        .all(|f| f.active);
                    let frame = self.conditional_stack.last_mut().unwrap();
                    frame.active = parent_active && defined && !frame.taken;
                    if frame.active {
                        frame.taken = true;
                    }
                }
            }
            "else" => {
                if let Some(frame) = self.conditional_stack.last_mut() {
                    frame.active = !frame.taken;
                    if frame.active {
                        frame.taken = true;
                    }
                }
            }
            "endif" => {
                if self.conditional_stack.pop().is_none() {
                    self.diagnostics.push(DirectiveError::UnmatchedEndif(SourceLocation::new(
                        buffer_id,
                        u32::from(name_tok.range.start()) as usize,
                    )));
                }
            }
            "define" => {
                if !self.in_disabled_region() {
                    if let Some(def) = macros::parse_define(rest) {
                        self.macros.define(def);
                    }
                }
            }
            "undef" => {
                if !self.in_disabled_region() {
                    if let Some(name) = next_ident(rest) {
                        self.macros.undef(&name);
                    }
                }
            }
            "undefineall" => {
                if !self.in_disabled_region() {
                    self.macros.clear();
                }
            }
            "include" => {
                // Include handling delegates to `SourceManager::read_header`;
                // the resulting buffer is preprocessed recursively by the
                // caller (`crate::compilation`), which owns the include path
                // list. Here we only validate depth and surface the token for
                // that caller to act on by re-emitting it as a directive trivia
                // token carrying the raw filename text.
                if !self.in_disabled_region() {
                    if self.include_depth >= self.options.max_include_depth {
                        self.diagnostics.push(DirectiveError::IncludeDepthExceeded(
                            SourceLocation::new(buffer_id, u32::from(name_tok.range.start()) as usize),
                        ));
                    } else if let Some(tok) = rest.pop_front() {
                        out.push(PpToken {
                            kind: SyntaxKind::DIRECTIVE_TRIVIA,
                            text: format!("`include {}", tok.text),
                            location: SourceLocation::new(buffer_id, u32::from(name_tok.range.start()) as usize),
                        });
                    }
                }
            }
            "line" => {
                // `` `line <number> "<filename>" <level>`` — consumed and
                // applied by `SourceManager::add_line_directive` at the
                // buffer level by the caller; we just drain its tokens here.
                drain_line(rest);
            }
            "timescale" | "default_nettype" | "unconnected_drive" | "nounconnected_drive"
            | "celldefine" | "endcelldefine" | "resetall" | "pragma" | "protect" => {
                drain_to_newline(rest);
            }
            other => {
                if !self.in_disabled_region() {
                    self.diagnostics.push(DirectiveError::UnknownDirective(
                        other.to_string(),
                        SourceLocation::new(buffer_id, u32::from(name_tok.range.start()) as usize),
                    ));
                }
            }
        }
    }

    /// If `name` is a defined macro, consumes its invocation (and, for a
    /// function-like macro, its argument list) and returns the expanded
    /// token sequence. Returns `None` if `name` isn't a macro, in which case
    /// the caller treats it as an ordinary identifier.
    fn try_expand_macro(
        &mut self,
        name_tok: &Token<'_>,
        rest: &mut VecDeque<Token<'_>>,
        buffer_id: crate::base::BufferId,
    ) -> Option<Vec<PpToken>> {
        let text = &name_tok.text[name_tok.text.starts_with('`') as usize..];
        let def = self.macros.get(text)?.clone();
        if self.expansion_depth >= self.options.max_macro_expansion_depth {
            self.diagnostics.push(DirectiveError::MacroExpansionTooDeep(text.to_string()));
            return Some(Vec::new());
        }
        let args = if def.is_function_like() {
            collect_macro_args(rest)
        } else {
            Vec::new()
        };
        self.expansion_depth += 1;
        let expanded_text = def.expand(&args);
        self.expansion_depth -= 1;

        let expanded_tokens = lex(&expanded_text);
        Some(
            expanded_tokens
                .tokens
                .into_iter()
                .flat_map(|t| {
                    let mut v = t.leading_trivia;
                    v.push(t.token);
                    v
                })
                .map(|t| PpToken {
                    kind: t.kind,
                    text: t.text.to_string(),
                    // A full implementation attributes each expanded token to
                    // a macro-expansion buffer created via
                    // `SourceManager::create_expansion_loc`; constructing one
                    // requires a `&mut SourceManager` this read-only pass
                    // doesn't hold, so expanded tokens are attributed to the
                    // invocation site for now (tracked as an open item, see
                    // DESIGN.md).
                    location: SourceLocation::new(buffer_id, 0),
                })
                .collect(),
        )
    }
}

fn next_ident(tokens: &mut VecDeque<Token<'_>>) -> Option<String> {
    while let Some(t) = tokens.front() {
        if t.kind.is_trivia() {
            tokens.pop_front();
            continue;
        }
        break;
    }
    tokens.pop_front().map(|t| t.text.to_string())
}

fn drain_to_newline(tokens: &mut VecDeque<Token<'_>>) {
    while let Some(t) = tokens.front() {
        if t.kind == SyntaxKind::WHITESPACE && t.text.contains('\n') {
            break;
        }
        tokens.pop_front();
    }
}

fn drain_line(tokens: &mut VecDeque<Token<'_>>) {
    drain_to_newline(tokens);
}

fn collect_macro_args(tokens: &mut VecDeque<Token<'_>>) -> Vec<String> {
    while let Some(t) = tokens.front() {
        if t.kind.is_trivia() {
            tokens.pop_front();
            continue;
        }
        break;
    }
    if !matches!(tokens.front(), Some(t) if t.kind == SyntaxKind::L_PAREN) {
        return Vec::new();
    }
    tokens.pop_front();

    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    while let Some(t) = tokens.pop_front() {
        match t.kind {
            SyntaxKind::L_PAREN => {
                depth += 1;
                current.push_str(t.text);
            }
            SyntaxKind::R_PAREN => {
                if depth == 0 {
                    args.push(current.trim().to_string());
                    return args;
                }
                depth -= 1;
                current.push_str(t.text);
            }
            SyntaxKind::COMMA if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push_str(t.text),
        }
    }
    if !current.is_empty() {
        args.push(current.trim().to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceManager;

    fn make(text: &str) -> (SourceManager, crate::base::BufferId) {
        let sm = SourceManager::new();
        let id = sm.assign_text(Some("test.sv"), text, None).id().unwrap();
        (sm, id)
    }

    #[test]
    fn object_like_macro_expands() {
        let (sm, id) = make("`define WIDTH 8\nlogic [`WIDTH-1:0] x;");
        let mut pp = Preprocessor::new(&sm, PreprocessorOptions::new());
        let tokens = pp.preprocess_buffer(id);
        let texts: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"8"));
        assert!(!texts.iter().any(|t| *t == "WIDTH"));
    }

    #[test]
    fn ifdef_excludes_inactive_branch() {
        let (sm, id) = make("`ifdef NOPE\nbad_token\n`else\nlogic\n`endif");
        let mut pp = Preprocessor::new(&sm, PreprocessorOptions::new());
        let tokens = pp.preprocess_buffer(id);
        let texts: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).map(|t| t.text.as_str()).collect();
        assert!(!texts.contains(&"bad_token"));
        assert!(texts.contains(&"logic"));
    }

    #[test]
    fn function_like_macro_substitutes_arguments() {
        let (sm, id) = make("`define MAX(a, b) ((a) > (b) ? (a) : (b))\n`MAX(x, y)");
        let mut pp = Preprocessor::new(&sm, PreprocessorOptions::new());
        let tokens = pp.preprocess_buffer(id);
        let texts: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"x"));
        assert!(texts.contains(&"y"));
    }

    #[test]
    fn unmatched_endif_is_diagnosed() {
        let (sm, id) = make("`endif");
        let mut pp = Preprocessor::new(&sm, PreprocessorOptions::new());
        pp.preprocess_buffer(id);
        assert!(matches!(pp.diagnostics()[0], DirectiveError::UnmatchedEndif(_)));
    }
}
