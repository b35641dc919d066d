//! Lexing → preprocessing → recursive-descent parsing into a lossless
//! rowan CST (spec §4). Structured like the teacher's `parser` module:
//! [`syntax_kind`] defines the `Language`, [`parser`] is the low-level
//! token-cursor/builder driver, [`grammar`] holds the per-construct parse
//! functions, and [`ast`] layers typed node wrappers over the raw CST.

pub mod ast;
pub mod grammar;
pub mod parser;
pub mod syntax_kind;

pub use parser::{Parse, SyntaxError};
pub use syntax_kind::{SvLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken};

use crate::preprocessor::{Preprocessor, PreprocessorOptions};
use crate::source::SourceManager;

/// Human-readable name for a syntax kind, used in parser diagnostics.
/// Punctuation and a handful of high-traffic kinds get their literal
/// spelling; everything else falls back to a lowercased, space-joined
/// rendering of the variant name (`IF_KW` -> "if", `MODULE_DECLARATION`
/// -> "module declaration").
pub fn kind_to_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT => "trivia",
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::ESCAPED_IDENT => "escaped identifier",
        SyntaxKind::SYSTEM_IDENT => "system identifier",
        SyntaxKind::STRING_LITERAL => "string literal",
        SyntaxKind::DECIMAL_LITERAL => "number",
        SyntaxKind::SIZED_INT_LITERAL | SyntaxKind::UNSIZED_BASED_INT_LITERAL => "integer literal",
        SyntaxKind::UNBASED_UNSIZED_LITERAL => "unbased literal",
        SyntaxKind::REAL_LITERAL => "real literal",
        SyntaxKind::TIME_LITERAL => "time literal",
        SyntaxKind::L_BRACE => "'{'",
        SyntaxKind::R_BRACE => "'}'",
        SyntaxKind::L_BRACKET => "'['",
        SyntaxKind::R_BRACKET => "']'",
        SyntaxKind::L_PAREN => "'('",
        SyntaxKind::R_PAREN => "')'",
        SyntaxKind::SEMICOLON => "';'",
        SyntaxKind::COLON => "':'",
        SyntaxKind::COLON_COLON => "'::'",
        SyntaxKind::COMMA => "','",
        SyntaxKind::DOT => "'.'",
        SyntaxKind::QUESTION => "'?'",
        SyntaxKind::EQ => "'='",
        SyntaxKind::EQ_EQ => "'=='",
        other => NAMES.with_static(other),
    }
}

/// Fallback naming table: lowercases the `Debug` spelling of a variant and
/// turns `_` into spaces, stripping a trailing `_KW`/`_DECLARATION` marker
/// where it would just add noise ("if" rather than "if keyword").
struct NameCache;
impl NameCache {
    fn with_static(&self, kind: SyntaxKind) -> &'static str {
        // `SyntaxKind` has a small, fixed variant count; leak once per
        // distinct kind rather than threading a lifetime through every
        // diagnostic call site.
        let raw = format!("{kind:?}").to_lowercase();
        let raw = raw.strip_suffix("_kw").unwrap_or(&raw);
        Box::leak(raw.replace('_', " ").into_boxed_str())
    }
}
static NAMES: NameCache = NameCache;

/// Parses a full compilation unit: preprocesses `text` (macro/conditional
/// expansion) and hands the resulting token stream to the grammar's
/// `source_file` entry point.
pub fn parse_source_file(source_manager: &SourceManager, buffer: crate::base::BufferId) -> Parse {
    let mut pp = Preprocessor::new(source_manager, PreprocessorOptions::new());
    let tokens = pp.preprocess_buffer(buffer);
    let mut p = parser::Parser::new(&tokens);
    grammar::source_file(&mut p);
    p.finish()
}

/// Convenience entry point for callers (and tests) that have raw text with
/// no existing [`SourceManager`] — allocates a throwaway one under the hood.
pub fn parse_source_file_text(text: &str) -> Parse {
    let sm = SourceManager::new();
    let buffer = sm.assign_text(Some("<text>"), text, None);
    parse_source_file(&sm, buffer.id().unwrap())
}
