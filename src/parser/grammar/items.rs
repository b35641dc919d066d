//! Design-unit declarations, ports/parameters, data types, and module-body
//! items (spec §4.4 MODULE, §3.4/§3.5).

use super::expressions::expression;
use super::statements::statement;
use super::Parser;
use crate::parser::syntax_kind::SyntaxKind;

const END_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::ENDMODULE_KW,
    SyntaxKind::ENDINTERFACE_KW,
    SyntaxKind::ENDPROGRAM_KW,
    SyntaxKind::ENDPACKAGE_KW,
    SyntaxKind::ENDCLASS_KW,
    SyntaxKind::ENDCHECKER_KW,
];

pub(crate) const DATA_TYPE_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::BIT_KW,
    SyntaxKind::LOGIC_KW,
    SyntaxKind::REG_KW,
    SyntaxKind::BYTE_KW,
    SyntaxKind::SHORTINT_KW,
    SyntaxKind::INT_KW,
    SyntaxKind::LONGINT_KW,
    SyntaxKind::INTEGER_KW,
    SyntaxKind::TIME_KW,
    SyntaxKind::SHORTREAL_KW,
    SyntaxKind::REAL_KW,
    SyntaxKind::REALTIME_KW,
    SyntaxKind::VOID_KW,
    SyntaxKind::STRING_KW,
    SyntaxKind::CHANDLE_KW,
    SyntaxKind::EVENT_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::UNION_KW,
    SyntaxKind::ENUM_KW,
];

pub(crate) fn at_data_type_start(p: &Parser) -> bool {
    p.at_any(DATA_TYPE_KEYWORDS) || p.at(SyntaxKind::IDENT)
}

pub fn module_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::MODULE_DECLARATION);
    p.bump(); // 'module'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.at(SyntaxKind::HASH) {
        parameter_port_list(p);
    }
    p.skip_trivia();
    if p.at(SyntaxKind::L_PAREN) {
        port_list(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    module_body_items(p, SyntaxKind::ENDMODULE_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::ENDMODULE_KW);
    p.finish_node();
}

pub fn interface_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::INTERFACE_DECLARATION);
    p.bump(); // 'interface'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.at(SyntaxKind::HASH) {
        parameter_port_list(p);
    }
    p.skip_trivia();
    if p.at(SyntaxKind::L_PAREN) {
        port_list(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    module_body_items(p, SyntaxKind::ENDINTERFACE_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::ENDINTERFACE_KW);
    p.finish_node();
}

pub fn program_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::PROGRAM_DECLARATION);
    p.bump(); // 'program'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.at(SyntaxKind::L_PAREN) {
        port_list(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    module_body_items(p, SyntaxKind::ENDPROGRAM_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::ENDPROGRAM_KW);
    p.finish_node();
}

pub fn package_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::PACKAGE_DECLARATION);
    p.bump(); // 'package'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    module_body_items(p, SyntaxKind::ENDPACKAGE_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::ENDPACKAGE_KW);
    p.finish_node();
}

pub fn class_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::CLASS_DECLARATION);
    p.bump(); // 'class'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.at(SyntaxKind::HASH) {
        parameter_port_list(p);
    }
    p.skip_trivia();
    if p.eat(SyntaxKind::EXTENDS_KW) {
        p.skip_trivia();
        scoped_name(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDCLASS_KW) {
            break;
        }
        class_member(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDCLASS_KW);
    p.finish_node();
}

pub fn checker_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::CHECKER_DECLARATION);
    p.bump(); // 'checker'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.at(SyntaxKind::L_PAREN) {
        port_list(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDCHECKER_KW) {
            break;
        }
        module_body_item(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDCHECKER_KW);
    p.finish_node();
}

fn scoped_name(p: &mut Parser) {
    p.start_node(SyntaxKind::SCOPED_NAME);
    p.expect(SyntaxKind::IDENT);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::COLON_COLON) {
            p.bump();
            p.skip_trivia();
            p.expect(SyntaxKind::IDENT);
        } else {
            break;
        }
    }
    p.finish_node();
}

fn class_member(p: &mut Parser) {
    p.start_node(SyntaxKind::CLASS_MEMBER);
    const QUALIFIERS: &[SyntaxKind] = &[
        SyntaxKind::LOCAL_KW,
        SyntaxKind::PROTECTED_KW,
        SyntaxKind::STATIC_KW,
        SyntaxKind::VIRTUAL_KW,
        SyntaxKind::PURE_KW,
        SyntaxKind::EXTERN_KW,
        SyntaxKind::CONST_KW,
        SyntaxKind::RAND_KW,
        SyntaxKind::RANDC_KW,
    ];
    if p.at_any(QUALIFIERS) {
        p.start_node(SyntaxKind::CLASS_QUALIFIER_LIST);
        while p.at_any(QUALIFIERS) {
            p.bump();
            p.skip_trivia();
        }
        p.finish_node();
    }
    p.skip_trivia();
    match p.current_kind() {
        SyntaxKind::FUNCTION_KW => function_declaration(p),
        SyntaxKind::TASK_KW => task_declaration(p),
        SyntaxKind::TYPEDEF_KW => typedef_declaration(p),
        _ if at_data_type_start(p) => variable_or_net_declaration(p, SyntaxKind::VARIABLE_DECLARATION),
        _ => p.error_recover("expected a class member", &[SyntaxKind::SEMICOLON]),
    }
    p.finish_node();
}

/// Parses module/interface/program body items until `end_kw` (not consumed).
fn module_body_items(p: &mut Parser, end_kw: SyntaxKind) {
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(end_kw) {
            break;
        }
        module_body_item(p);
    }
}

fn module_body_item(p: &mut Parser) {
    match p.current_kind() {
        SyntaxKind::FUNCTION_KW => function_declaration(p),
        SyntaxKind::TASK_KW => task_declaration(p),
        SyntaxKind::TYPEDEF_KW => typedef_declaration(p),
        SyntaxKind::GENERATE_KW => generate_region(p),
        SyntaxKind::IF_KW => generate_if(p),
        SyntaxKind::FOR_KW => generate_for(p),
        SyntaxKind::MODPORT_KW => modport_declaration(p),
        SyntaxKind::IMPORT_KW => import_item(p),
        SyntaxKind::INITIAL_KW
        | SyntaxKind::FINAL_KW
        | SyntaxKind::ALWAYS_KW
        | SyntaxKind::ALWAYS_COMB_KW
        | SyntaxKind::ALWAYS_FF_KW
        | SyntaxKind::ALWAYS_LATCH_KW => procedural_block(p),
        SyntaxKind::WIRE_KW
        | SyntaxKind::WAND_KW
        | SyntaxKind::WOR_KW
        | SyntaxKind::TRI_KW
        | SyntaxKind::SUPPLY0_KW
        | SyntaxKind::SUPPLY1_KW => variable_or_net_declaration(p, SyntaxKind::NET_DECLARATION),
        SyntaxKind::PARAMETER_KW | SyntaxKind::LOCALPARAM_KW => parameter_declaration_item(p),
        _ if at_data_type_start(p) => hierarchical_instance_or_variable(p),
        SyntaxKind::SEMICOLON => p.bump(),
        _ => p.error_recover(
            "expected a module item",
            &[SyntaxKind::SEMICOLON, SyntaxKind::ENDMODULE_KW, SyntaxKind::ENDINTERFACE_KW],
        ),
    }
}

/// `logic [7:0] a;` and `module_type #(...) inst(...);`/`module_type inst(...);`
/// share a data-type/identifier prefix. A `#` right after the type name
/// means an instance with a parameter override; otherwise the type name is
/// followed by the instance (or variable) name, and it's the token after
/// *that* — `(` for an instance, anything else for a variable — that
/// disambiguates.
pub(crate) fn hierarchical_instance_or_variable(p: &mut Parser) {
    if p.nth(1) == SyntaxKind::HASH || (p.nth(1) == SyntaxKind::IDENT && p.nth(2) == SyntaxKind::L_PAREN) {
        hierarchical_instance(p);
    } else {
        variable_or_net_declaration(p, SyntaxKind::VARIABLE_DECLARATION);
    }
}

fn hierarchical_instance(p: &mut Parser) {
    p.start_node(SyntaxKind::HIERARCHICAL_INSTANCE);
    p.expect(SyntaxKind::IDENT); // type name
    p.skip_trivia();
    if p.at(SyntaxKind::HASH) {
        parameter_value_assignment(p);
    }
    p.skip_trivia();
    loop {
        instance_name(p);
        p.skip_trivia();
        if p.eat(SyntaxKind::COMMA) {
            p.skip_trivia();
            continue;
        }
        break;
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn parameter_value_assignment(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAMETER_VALUE_ASSIGNMENT);
    p.bump(); // '#'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        param_assignment(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn param_assignment(p: &mut Parser) {
    if p.at(SyntaxKind::DOT) {
        p.start_node(SyntaxKind::NAMED_PARAM_ASSIGNMENT);
        p.bump();
        p.skip_trivia();
        p.expect(SyntaxKind::IDENT);
        p.skip_trivia();
        p.expect(SyntaxKind::L_PAREN);
        p.skip_trivia();
        if !p.at(SyntaxKind::R_PAREN) {
            expression(p);
            p.skip_trivia();
        }
        p.expect(SyntaxKind::R_PAREN);
        p.finish_node();
    } else {
        p.start_node(SyntaxKind::ORDERED_PARAM_ASSIGNMENT);
        expression(p);
        p.finish_node();
    }
}

fn instance_name(p: &mut Parser) {
    p.start_node(SyntaxKind::INSTANCE_NAME);
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        port_connection(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn port_connection(p: &mut Parser) {
    p.start_node(SyntaxKind::PORT_CONNECTION);
    if p.eat(SyntaxKind::DOT) {
        p.skip_trivia();
        p.expect(SyntaxKind::IDENT);
        p.skip_trivia();
        if p.eat(SyntaxKind::L_PAREN) {
            p.skip_trivia();
            if !p.at(SyntaxKind::R_PAREN) {
                expression(p);
                p.skip_trivia();
            }
            p.expect(SyntaxKind::R_PAREN);
        }
    } else {
        expression(p);
    }
    p.finish_node();
}

fn procedural_block(p: &mut Parser) {
    p.start_node(SyntaxKind::PROCEDURAL_BLOCK);
    p.bump(); // always*/initial/final
    p.skip_trivia();
    statement(p);
    p.finish_node();
}

fn generate_region(p: &mut Parser) {
    p.bump(); // 'generate'
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDGENERATE_KW) {
            break;
        }
        module_body_item(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDGENERATE_KW);
}

fn generate_if(p: &mut Parser) {
    p.start_node(SyntaxKind::GENERATE_IF);
    p.bump(); // 'if'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    generate_block_or_item(p);
    p.skip_trivia();
    if p.eat(SyntaxKind::ELSE_KW) {
        p.skip_trivia();
        if p.at(SyntaxKind::IF_KW) {
            generate_if(p);
        } else {
            generate_block_or_item(p);
        }
    }
    p.finish_node();
}

fn generate_for(p: &mut Parser) {
    p.start_node(SyntaxKind::GENERATE_FOR);
    p.bump(); // 'for'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::SEMICOLON) || p.at_eof() {
            break;
        }
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    if !p.at(SyntaxKind::SEMICOLON) {
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    if !p.at(SyntaxKind::R_PAREN) {
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    generate_block_or_item(p);
    p.finish_node();
}

fn generate_block_or_item(p: &mut Parser) {
    if p.eat(SyntaxKind::BEGIN_KW) {
        p.start_node(SyntaxKind::GENERATE_BLOCK);
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
            module_body_item(p);
        }
        p.skip_trivia();
        p.expect(SyntaxKind::END_KW);
        p.finish_node();
    } else {
        module_body_item(p);
    }
}

fn modport_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::MODPORT_DECLARATION);
    p.bump(); // 'modport'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        modport_port(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn modport_port(p: &mut Parser) {
    p.start_node(SyntaxKind::MODPORT_PORT);
    if p.at(SyntaxKind::INPUT_KW) || p.at(SyntaxKind::OUTPUT_KW) || p.at(SyntaxKind::INOUT_KW) {
        p.bump();
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.finish_node();
}

fn import_item(p: &mut Parser) {
    p.start_node(SyntaxKind::IMPORT_ITEM);
    p.bump(); // 'import'
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.expect(SyntaxKind::COLON_COLON);
    p.skip_trivia();
    if !p.eat(SyntaxKind::STAR) {
        p.expect(SyntaxKind::IDENT);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub fn port_list(p: &mut Parser) {
    p.start_node(SyntaxKind::PORT_LIST);
    p.bump(); // '('
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        ansi_port(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn ansi_port(p: &mut Parser) {
    p.start_node(SyntaxKind::ANSI_PORT);
    if p.at_any(&[SyntaxKind::INPUT_KW, SyntaxKind::OUTPUT_KW, SyntaxKind::INOUT_KW]) {
        p.bump();
        p.skip_trivia();
    }
    if at_data_type_start(p) && p.nth(1) != SyntaxKind::COMMA && p.nth(1) != SyntaxKind::R_PAREN {
        data_type(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    while p.at(SyntaxKind::L_BRACKET) {
        unpacked_dimension(p);
        p.skip_trivia();
    }
    if p.eat(SyntaxKind::EQ) {
        p.skip_trivia();
        expression(p);
    }
    p.finish_node();
}

pub fn parameter_port_list(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAMETER_PORT_LIST);
    p.bump(); // '#'
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
            break;
        }
        parameter_declaration(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

fn parameter_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAMETER_DECLARATION);
    p.eat(SyntaxKind::PARAMETER_KW);
    p.eat(SyntaxKind::LOCALPARAM_KW);
    p.skip_trivia();
    if at_data_type_start(p) && p.nth(1) != SyntaxKind::EQ && p.nth(1) != SyntaxKind::COMMA && p.nth(1) != SyntaxKind::R_PAREN {
        data_type(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.eat(SyntaxKind::EQ) {
        p.skip_trivia();
        expression(p);
    }
    p.finish_node();
}

/// A standalone `parameter`/`localparam` declaration statement inside a
/// module body (as opposed to `parameter_declaration`, used only inside a
/// `#(...)` parameter port list, which has no terminating semicolon and
/// never stands alone as a body item).
pub(crate) fn parameter_declaration_item(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAMETER_DECLARATION);
    p.bump(); // 'parameter'/'localparam'
    p.skip_trivia();
    if at_data_type_start(p) && p.nth(1) != SyntaxKind::EQ && p.nth(1) != SyntaxKind::SEMICOLON {
        data_type(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.eat(SyntaxKind::EQ) {
        p.skip_trivia();
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub fn data_type(p: &mut Parser) {
    p.start_node(SyntaxKind::DATA_TYPE);
    match p.current_kind() {
        SyntaxKind::STRUCT_KW | SyntaxKind::UNION_KW => {
            p.bump();
            p.skip_trivia();
            p.eat(SyntaxKind::PACKED_KW);
            p.skip_trivia();
            struct_union_body(p);
        }
        SyntaxKind::ENUM_KW => {
            p.bump();
            p.skip_trivia();
            enum_body(p);
        }
        _ => {
            p.bump(); // base type keyword or IDENT (user-defined type name)
        }
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SIGNED_KW);
    p.eat(SyntaxKind::UNSIGNED_KW);
    p.skip_trivia();
    while p.at(SyntaxKind::L_BRACKET) {
        packed_dimension(p);
        p.skip_trivia();
    }
    p.finish_node();
}

fn struct_union_body(p: &mut Parser) {
    p.start_node(SyntaxKind::STRUCT_UNION_BODY);
    p.expect(SyntaxKind::L_BRACE);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_BRACE) || p.at_eof() {
            break;
        }
        struct_union_member(p);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

fn struct_union_member(p: &mut Parser) {
    p.start_node(SyntaxKind::STRUCT_UNION_MEMBER);
    data_type(p);
    p.skip_trivia();
    loop {
        p.expect(SyntaxKind::IDENT);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
        p.skip_trivia();
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn enum_body(p: &mut Parser) {
    p.start_node(SyntaxKind::ENUM_BODY);
    p.expect(SyntaxKind::L_BRACE);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::R_BRACE) || p.at_eof() {
            break;
        }
        enum_member(p);
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

fn enum_member(p: &mut Parser) {
    p.start_node(SyntaxKind::ENUM_MEMBER);
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.eat(SyntaxKind::EQ) {
        p.skip_trivia();
        expression(p);
    }
    p.finish_node();
}

fn packed_dimension(p: &mut Parser) {
    p.start_node(SyntaxKind::PACKED_DIMENSION);
    p.bump(); // '['
    p.skip_trivia();
    expression(p);
    p.skip_trivia();
    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

fn unpacked_dimension(p: &mut Parser) {
    p.start_node(SyntaxKind::UNPACKED_DIMENSION);
    p.bump(); // '['
    p.skip_trivia();
    if !p.at(SyntaxKind::R_BRACKET) {
        expression(p);
        p.skip_trivia();
        if p.eat(SyntaxKind::COLON) {
            p.skip_trivia();
            expression(p);
            p.skip_trivia();
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

pub(crate) fn typedef_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::TYPEDEF_DECLARATION);
    p.bump(); // 'typedef'
    p.skip_trivia();
    data_type(p);
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn variable_or_net_declaration(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    if kind == SyntaxKind::NET_DECLARATION {
        p.bump(); // net keyword
        p.skip_trivia();
    }
    if at_data_type_start(p) {
        data_type(p);
        p.skip_trivia();
    }
    loop {
        p.expect(SyntaxKind::IDENT);
        p.skip_trivia();
        while p.at(SyntaxKind::L_BRACKET) {
            unpacked_dimension(p);
            p.skip_trivia();
        }
        if p.eat(SyntaxKind::EQ) {
            p.skip_trivia();
            expression(p);
            p.skip_trivia();
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
        p.skip_trivia();
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

pub(crate) fn function_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::FUNCTION_DECLARATION);
    p.bump(); // 'function'
    p.skip_trivia();
    p.eat(SyntaxKind::AUTOMATIC_KW);
    p.skip_trivia();
    if at_data_type_start(p) && p.nth(1) != SyntaxKind::L_PAREN && p.nth(1) != SyntaxKind::SEMICOLON {
        data_type(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.eat(SyntaxKind::L_PAREN) {
        loop {
            p.skip_trivia();
            if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
                break;
            }
            formal_argument(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.skip_trivia();
        p.expect(SyntaxKind::R_PAREN);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDFUNCTION_KW) {
            break;
        }
        if at_data_type_start(p) && p.nth(1) == SyntaxKind::IDENT {
            variable_or_net_declaration(p, SyntaxKind::VARIABLE_DECLARATION);
        } else {
            statement(p);
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDFUNCTION_KW);
    p.finish_node();
}

pub(crate) fn task_declaration(p: &mut Parser) {
    p.start_node(SyntaxKind::TASK_DECLARATION);
    p.bump(); // 'task'
    p.skip_trivia();
    p.eat(SyntaxKind::AUTOMATIC_KW);
    p.skip_trivia();
    p.expect(SyntaxKind::IDENT);
    p.skip_trivia();
    if p.eat(SyntaxKind::L_PAREN) {
        loop {
            p.skip_trivia();
            if p.at(SyntaxKind::R_PAREN) || p.at_eof() {
                break;
            }
            formal_argument(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.skip_trivia();
        p.expect(SyntaxKind::R_PAREN);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at(SyntaxKind::ENDTASK_KW) {
            break;
        }
        if at_data_type_start(p) && p.nth(1) == SyntaxKind::IDENT {
            variable_or_net_declaration(p, SyntaxKind::VARIABLE_DECLARATION);
        } else {
            statement(p);
        }
    }
    p.skip_trivia();
    p.expect(SyntaxKind::ENDTASK_KW);
    p.finish_node();
}

fn formal_argument(p: &mut Parser) {
    p.start_node(SyntaxKind::FORMAL_ARGUMENT);
    if p.at_any(&[SyntaxKind::INPUT_KW, SyntaxKind::OUTPUT_KW, SyntaxKind::INOUT_KW]) {
        p.bump();
        p.skip_trivia();
    }
    if at_data_type_start(p) && p.nth(1) != SyntaxKind::COMMA && p.nth(1) != SyntaxKind::R_PAREN {
        data_type(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::IDENT);
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{AstNode, ModuleItem, SourceFile};
    use crate::parser::parse_source_file_text;

    #[test]
    fn parses_empty_module() {
        let parse = parse_source_file_text("module m; endmodule");
        assert!(parse.ok());
        let file = SourceFile::cast(parse.syntax()).unwrap();
        assert!(matches!(file.items().next(), Some(ModuleItem::Module(_))));
    }

    #[test]
    fn parses_module_with_ports_and_params() {
        let src = "module adder #(parameter WIDTH = 8) (input logic [WIDTH-1:0] a, input logic [WIDTH-1:0] b, output logic [WIDTH-1:0] sum); endmodule";
        let parse = parse_source_file_text(src);
        assert!(parse.ok());
    }

    #[test]
    fn parses_typedef_and_instance() {
        let src = "module top; typedef logic [7:0] byte_t; adder #(8) u1(.a(x), .b(y)); endmodule";
        let parse = parse_source_file_text(src);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn parses_instance_without_parameter_override() {
        let src = "module top; adder u1(.a(x), .b(y)); endmodule";
        let parse = parse_source_file_text(src);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }

    #[test]
    fn parses_struct_typedef_and_class_with_extends() {
        let src = "package pkg; typedef struct packed { logic [7:0] lo; logic [7:0] hi; } pair_t; endpackage class base; endclass class derived extends base; int x; endclass";
        let parse = parse_source_file_text(src);
        assert!(parse.ok(), "errors: {:?}", parse.errors);
    }
}
