//! Statement grammar (spec §4.4 STATEMENT): procedural control flow plus
//! the assignment/expression statements that terminate it.

use super::expressions::expression;
use super::Parser;
use crate::parser::syntax_kind::SyntaxKind;

pub fn statement(p: &mut Parser) {
    p.skip_trivia();
    match p.current_kind() {
        SyntaxKind::BEGIN_KW => block_statement(p),
        SyntaxKind::IF_KW => if_statement(p),
        SyntaxKind::CASE_KW | SyntaxKind::CASEX_KW | SyntaxKind::CASEZ_KW => case_statement(p),
        SyntaxKind::FOR_KW => for_statement(p),
        SyntaxKind::WHILE_KW => while_statement(p),
        SyntaxKind::DO_KW => do_while_statement(p),
        SyntaxKind::FOREACH_KW => foreach_statement(p),
        SyntaxKind::RETURN_KW => return_statement(p),
        SyntaxKind::BREAK_KW => leaf_statement(p, SyntaxKind::BREAK_STATEMENT),
        SyntaxKind::CONTINUE_KW => leaf_statement(p, SyntaxKind::CONTINUE_STATEMENT),
        SyntaxKind::IDENT if p.nth(1) == SyntaxKind::COLON => labeled_statement(p),
        SyntaxKind::SEMICOLON => p.bump(),
        _ => assignment_or_expression_statement(p),
    }
}

fn block_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::BLOCK_STATEMENT);
    p.bump(); // 'begin'
    p.skip_trivia();
    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        p.expect(SyntaxKind::IDENT);
    }
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::END_KW) {
            break;
        }
        statement(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::END_KW);
    p.skip_trivia();
    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        p.expect(SyntaxKind::IDENT);
    }
    p.finish_node();
}

fn if_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::IF_STATEMENT);
    p.bump(); // 'if'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    statement(p);
    p.skip_trivia();
    if p.eat(SyntaxKind::ELSE_KW) {
        p.skip_trivia();
        statement(p);
    }
    p.finish_node();
}

fn case_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::CASE_STATEMENT);
    p.bump(); // 'case'/'casex'/'casez'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDCASE_KW) {
            break;
        }
        case_item(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDCASE_KW);
    p.finish_node();
}

fn case_item(p: &mut Parser) {
    p.start_node(SyntaxKind::CASE_ITEM);
    if p.eat(SyntaxKind::DEFAULT_KW) {
        p.skip_trivia();
    } else {
        loop {
            expression(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            p.skip_trivia();
        }
    }
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

fn for_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::FOR_STATEMENT);
    p.bump(); // 'for'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    if !p.at(SyntaxKind::SEMICOLON) {
        assignment_or_expression_statement_no_semi(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    if !p.at(SyntaxKind::SEMICOLON) {
        expression(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    if !p.at(SyntaxKind::R_PAREN) {
        assignment_or_expression_statement_no_semi(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

fn while_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::WHILE_STATEMENT);
    p.bump(); // 'while'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

fn do_while_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::DO_WHILE_STATEMENT);
    p.bump(); // 'do'
    p.skip_trivia();
    statement(p);
    p.skip_trivia();
    p.expect(SyntaxKind::WHILE_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn foreach_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::FOREACH_STATEMENT);
    p.bump(); // 'foreach'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::L_BRACKET);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_BRACKET) || p.at_eof() {
            break;
        }
        p.expect(SyntaxKind::IDENT);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_BRACKET);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

fn return_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::RETURN_STATEMENT);
    p.bump(); // 'return'
    p.skip_trivia();
    if !p.at(SyntaxKind::SEMICOLON) {
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn leaf_statement(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn labeled_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::LABELED_STATEMENT);
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

const ASSIGN_OPS: &[SyntaxKind] = &[SyntaxKind::EQ, SyntaxKind::LT_EQ];

/// An lvalue followed by `=`/`<=` is an assignment; otherwise the expression
/// stands alone (a bare call, most commonly a task/void-function call).
fn assignment_or_expression_statement(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    expression(p);
    p.skip_trivia();
    if p.at_any(ASSIGN_OPS) {
        p.start_node_at(checkpoint, SyntaxKind::ASSIGNMENT_STATEMENT);
        p.bump(); // '=' or '<='
        p.skip_trivia();
        expression(p);
        p.skip_trivia();
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::EXPRESSION_STATEMENT);
        p.skip_trivia();
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    }
}

/// Same as above but for a `for (...)` clause, which has no terminating
/// semicolon of its own (the `for` grammar supplies it).
fn assignment_or_expression_statement_no_semi(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    expression(p);
    p.skip_trivia();
    if p.at_any(ASSIGN_OPS) {
        p.start_node_at(checkpoint, SyntaxKind::ASSIGNMENT_STATEMENT);
        p.bump();
        p.skip_trivia();
        expression(p);
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::EXPRESSION_STATEMENT);
        p.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_source_file_text;

    #[test]
    fn parses_if_else_and_assignment() {
        let src = "module m; logic a; initial begin if (a) a = 1; else a <= 0; end endmodule";
        let parse = parse_source_file_text(src);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn parses_for_loop_and_case() {
        let src = "module m; function automatic int f(); int i; int acc; for (i = 0; i < 4; i = i + 1) begin case (i) 0: acc = 1; default: acc = 0; endcase end return acc; endfunction endmodule";
        let parse = parse_source_file_text(src);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }
}
