//! Pretty-printing a parsed syntax tree back to source text (spec §6.5).
//!
//! `rowan`'s tree is lossless (spec §9's "never discard trivia" rule), so
//! printing with every trivia-preserving flag turned on reproduces the
//! original source byte-for-byte (spec §8 invariant 1) — this just walks
//! `descendants_with_tokens()` in document order and writes each token's
//! text, the same traversal `binder` uses (via `children_with_tokens`) to
//! look for a specific marker token, generalized to every token in the
//! subtree.
//!
//! One documented gap: `crate::preprocessor` currently replaces a macro
//! invocation's tokens with its expansion outright rather than keeping
//! the invocation around as trivia beside it (see its module doc and
//! `DESIGN.md`), so `expand_macros: false` and `preserve_directives: true`
//! can't actually recover a `` `define``-using original for a tree built
//! through the normal `parse_source_file` path — the flag only affects
//! `` `include`` markers, which already are kept as `DIRECTIVE_TRIVIA`.

use crate::parser::syntax_kind::{SyntaxKind, SyntaxNode};

/// Controls what a [`print`] pass reproduces (spec §6.5's flag table).
#[derive(Debug, Clone, Copy)]
pub struct PrettyOptions {
    /// Include whitespace/comment trivia at all. `false` collapses every
    /// run of trivia to a single space, for a "minified" rendering.
    pub include_trivia: bool,
    /// Include `` `include``-marker `DIRECTIVE_TRIVIA` tokens (spec §6.5's
    /// "preserve directives" vs. "expand includes" choice — expansion
    /// itself isn't materialized in the tree, so turning this off just
    /// drops the marker rather than substituting the included text).
    pub preserve_directives: bool,
    /// Include text the parser couldn't attach to any grammar production
    /// (`SKIPPED_TOKEN_TRIVIA`) and text excluded by a false `` `ifdef``
    /// branch (`DISABLED_TEXT_TRIVIA`).
    pub include_skipped_text: bool,
    /// Collapse three or more consecutive newlines down to two.
    pub squash_blank_lines: bool,
}

impl PrettyOptions {
    /// Every flag set to reproduce the source exactly (spec §8 invariant
    /// 1, modulo the macro-expansion gap documented on the module).
    pub fn lossless() -> Self {
        PrettyOptions {
            include_trivia: true,
            preserve_directives: true,
            include_skipped_text: true,
            squash_blank_lines: false,
        }
    }

    /// A compact rendering: trivia collapsed, directive markers and
    /// skipped/disabled text dropped.
    pub fn minified() -> Self {
        PrettyOptions {
            include_trivia: false,
            preserve_directives: false,
            include_skipped_text: false,
            squash_blank_lines: true,
        }
    }
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self::lossless()
    }
}

fn keep(kind: SyntaxKind, options: &PrettyOptions) -> bool {
    match kind {
        SyntaxKind::DIRECTIVE_TRIVIA => options.preserve_directives,
        SyntaxKind::SKIPPED_TOKEN_TRIVIA | SyntaxKind::DISABLED_TEXT_TRIVIA => options.include_skipped_text,
        SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT => options.include_trivia,
        _ => true,
    }
}

/// Renders `node` (and everything beneath it) back to source text.
pub fn print(node: &SyntaxNode, options: &PrettyOptions) -> String {
    let mut out = String::new();
    for element in node.descendants_with_tokens() {
        let Some(token) = element.as_token() else { continue };
        if !keep(token.kind(), options) {
            if !options.include_trivia && token.kind().is_trivia() {
                // Collapse a dropped trivia run to one separating space so
                // adjacent tokens don't fuse into a different lexeme.
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            continue;
        }
        out.push_str(token.text());
    }
    if options.squash_blank_lines {
        squash_blank_lines(&out)
    } else {
        out
    }
}

/// Collapses any run of 3+ newlines (allowing interleaved horizontal
/// whitespace on the blank lines) down to exactly 2.
fn squash_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newline_run = 0u32;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n');
        if trimmed.trim().is_empty() {
            newline_run += 1;
            if newline_run <= 2 {
                out.push('\n');
            }
        } else {
            newline_run = 0;
            out.push_str(trimmed);
            if line.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source_file_text;

    #[test]
    fn lossless_print_round_trips_the_source() {
        let src = "module m;\n  logic a;\nendmodule\n";
        let parse = parse_source_file_text(src);
        let printed = print(&parse.syntax(), &PrettyOptions::lossless());
        assert_eq!(printed, src);
    }

    #[test]
    fn minified_print_collapses_trivia_to_single_spaces() {
        let src = "module   m  ;\n  logic a ;\nendmodule\n";
        let parse = parse_source_file_text(src);
        let printed = print(&parse.syntax(), &PrettyOptions::minified());
        assert!(!printed.contains("   "));
        assert!(printed.contains("module"));
        assert!(printed.contains("endmodule"));
    }

    #[test]
    fn squash_blank_lines_keeps_at_most_two_newlines() {
        let src = "module m;\n\n\n\n  logic a;\nendmodule\n";
        let parse = parse_source_file_text(src);
        let mut options = PrettyOptions::lossless();
        options.squash_blank_lines = true;
        let printed = print(&parse.syntax(), &options);
        assert!(!printed.contains("\n\n\n"));
    }
}
