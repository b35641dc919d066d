//! Per-construct grammar functions (spec §4.3-§4.4), grouped the way the
//! teacher splits its grammar: declarations/items, statements, expressions,
//! each as a free function taking `&mut Parser` rather than methods on
//! `Parser` itself, so the cursor/builder stay private to `parser::parser`.

pub mod expressions;
pub mod items;
pub mod statements;

pub(crate) use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

/// Tokens that can legitimately start a top-level design-unit declaration.
const TOP_LEVEL_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::MODULE_KW,
    SyntaxKind::INTERFACE_KW,
    SyntaxKind::PROGRAM_KW,
    SyntaxKind::PACKAGE_KW,
    SyntaxKind::CLASS_KW,
    SyntaxKind::CHECKER_KW,
];

pub fn source_file(p: &mut Parser) {
    p.start_node(SyntaxKind::SOURCE_FILE);
    loop {
        p.skip_trivia();
        if p.at_eof() {
            break;
        }
        match p.current_kind() {
            SyntaxKind::MODULE_KW => items::module_declaration(p),
            SyntaxKind::INTERFACE_KW => items::interface_declaration(p),
            SyntaxKind::PROGRAM_KW => items::program_declaration(p),
            SyntaxKind::PACKAGE_KW => items::package_declaration(p),
            SyntaxKind::CLASS_KW => items::class_declaration(p),
            SyntaxKind::CHECKER_KW => items::checker_declaration(p),
            // A `ScriptSession` evaluates one compilation unit's worth of
            // bare declarations/statements at a time ($unit scope, spec
            // §6.1) rather than only whole design units, so the top level
            // also accepts the same item/statement forms a module body
            // would.
            SyntaxKind::FUNCTION_KW => items::function_declaration(p),
            SyntaxKind::TASK_KW => items::task_declaration(p),
            SyntaxKind::TYPEDEF_KW => items::typedef_declaration(p),
            SyntaxKind::PARAMETER_KW | SyntaxKind::LOCALPARAM_KW => items::parameter_declaration_item(p),
            SyntaxKind::SEMICOLON => p.bump(),
            _ if looks_like_declaration_start(p) => items::hierarchical_instance_or_variable(p),
            _ => top_level_expression_statement(p),
        }
    }
    p.finish_node();
}

/// A plain keyword data type (`int`, `logic`, ...) always starts a
/// declaration here. A bare `IDENT`, though, is ambiguous at script scope —
/// `foo(3, 4)` and `a0.LP` both start with an `IDENT` but are expressions,
/// not declarations — so it's only treated as a (possibly user-typed)
/// declaration when a second name follows (`byte_t x;`, `adder u1(...)`) or
/// a parameter override immediately follows (`A #(.P(2)) a0();`), the same
/// two-token lookahead `items::hierarchical_instance_or_variable` itself
/// uses to tell a declaration from an instance.
fn looks_like_declaration_start(p: &Parser) -> bool {
    if p.at_any(items::DATA_TYPE_KEYWORDS) {
        return true;
    }
    p.at(SyntaxKind::IDENT) && (p.nth(1) == SyntaxKind::IDENT || p.nth(1) == SyntaxKind::HASH)
}

/// A bare expression at script scope (`i + 9`, `foo(3, 4)`), optionally
/// semicolon-terminated. Falls back to `error_recover` only once
/// `expressions::expression` itself can't make progress.
fn top_level_expression_statement(p: &mut Parser) {
    if !expressions::expression_can_start(p.current_kind()) {
        p.error_recover("expected a declaration or expression", TOP_LEVEL_RECOVERY);
        return;
    }
    let checkpoint = p.checkpoint();
    expressions::expression(p);
    p.skip_trivia();
    p.start_node_at(checkpoint, SyntaxKind::EXPRESSION_STATEMENT);
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}
