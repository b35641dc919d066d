//! Syntax kinds for the rowan-based CST.
//!
//! Structured the way the teacher's `parser::syntax_kind` lays out a rowan
//! `Language`: trivia first, then literals, punctuation, keywords, and
//! finally composite node kinds, with the numeric ranges used by
//! `is_trivia`/`is_keyword`/`is_punct` helpers below.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =====================================================================
    // TRIVIA
    // =====================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DIRECTIVE_TRIVIA,
    SKIPPED_TOKEN_TRIVIA,
    DISABLED_TEXT_TRIVIA,

    // =====================================================================
    // LITERALS / NAMES
    // =====================================================================
    IDENT,
    ESCAPED_IDENT,
    SYSTEM_IDENT,
    DIRECTIVE_NAME,
    STRING_LITERAL,
    DECIMAL_LITERAL,
    SIZED_INT_LITERAL,
    UNSIZED_BASED_INT_LITERAL,
    UNBASED_UNSIZED_LITERAL,
    REAL_LITERAL,
    TIME_LITERAL,

    // =====================================================================
    // PUNCTUATION
    // =====================================================================
    L_BRACE,
    R_BRACE,
    L_BRACKET,
    R_BRACKET,
    L_PAREN,
    R_PAREN,
    SEMICOLON,
    COLON,
    COLON_COLON,
    COLON_EQ,
    COMMA,
    DOT,
    APOSTROPHE_L_BRACE,
    APOSTROPHE,
    QUESTION,
    QUESTION_QUESTION,
    EQ,
    EQ_EQ,
    EQ_EQ_EQ,
    EQ_QUESTION,
    BANG_EQ,
    BANG_EQ_EQ,
    BANG_QUESTION,
    LT,
    LT_EQ,
    GT,
    GT_EQ,
    LT_LT,
    GT_GT,
    LT_LT_LT,
    GT_GT_GT,
    PLUS,
    MINUS,
    STAR,
    STAR_STAR,
    SLASH,
    PERCENT,
    AMP,
    AMP_AMP,
    PIPE,
    PIPE_PIPE,
    CARET,
    CARET_TILDE,
    TILDE,
    TILDE_AMP,
    TILDE_PIPE,
    TILDE_CARET,
    BANG,
    ARROW,
    HASH,
    AT,
    AT_AT,
    DOLLAR,

    // =====================================================================
    // KEYWORDS
    // =====================================================================
    MODULE_KW,
    ENDMODULE_KW,
    INTERFACE_KW,
    ENDINTERFACE_KW,
    PROGRAM_KW,
    ENDPROGRAM_KW,
    PACKAGE_KW,
    ENDPACKAGE_KW,
    CLASS_KW,
    ENDCLASS_KW,
    EXTENDS_KW,
    IMPLEMENTS_KW,
    CHECKER_KW,
    ENDCHECKER_KW,
    PRIMITIVE_KW,
    ENDPRIMITIVE_KW,
    FUNCTION_KW,
    ENDFUNCTION_KW,
    TASK_KW,
    ENDTASK_KW,
    RETURN_KW,
    PARAMETER_KW,
    LOCALPARAM_KW,
    SPECPARAM_KW,
    DEFPARAM_KW,
    GENVAR_KW,
    GENERATE_KW,
    ENDGENERATE_KW,
    MODPORT_KW,
    BIND_KW,
    ALIAS_KW,
    IMPORT_KW,
    EXPORT_KW,
    CLOCKING_KW,
    ENDCLOCKING_KW,
    SPECIFY_KW,
    ENDSPECIFY_KW,
    COVERGROUP_KW,
    ENDGROUP_KW,

    // Data type keywords
    BIT_KW,
    LOGIC_KW,
    REG_KW,
    BYTE_KW,
    SHORTINT_KW,
    INT_KW,
    LONGINT_KW,
    INTEGER_KW,
    TIME_KW,
    SHORTREAL_KW,
    REAL_KW,
    REALTIME_KW,
    SIGNED_KW,
    UNSIGNED_KW,
    VOID_KW,
    STRING_KW,
    CHANDLE_KW,
    EVENT_KW,
    STRUCT_KW,
    UNION_KW,
    ENUM_KW,
    TYPEDEF_KW,
    PACKED_KW,
    UNPACKED_KW,
    TAGGED_KW,
    TYPE_KW,

    // Port / net keywords
    INPUT_KW,
    OUTPUT_KW,
    INOUT_KW,
    WIRE_KW,
    WAND_KW,
    WOR_KW,
    TRI_KW,
    SUPPLY0_KW,
    SUPPLY1_KW,

    // Procedural keywords
    ALWAYS_KW,
    ALWAYS_COMB_KW,
    ALWAYS_FF_KW,
    ALWAYS_LATCH_KW,
    INITIAL_KW,
    FINAL_KW,
    BEGIN_KW,
    END_KW,
    FORK_KW,
    JOIN_KW,
    JOIN_ANY_KW,
    JOIN_NONE_KW,
    IF_KW,
    ELSE_KW,
    CASE_KW,
    CASEX_KW,
    CASEZ_KW,
    ENDCASE_KW,
    DEFAULT_KW,
    FOR_KW,
    WHILE_KW,
    DO_KW,
    REPEAT_KW,
    FOREVER_KW,
    FOREACH_KW,
    BREAK_KW,
    CONTINUE_KW,
    DISABLE_KW,

    // Class qualifiers
    LOCAL_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    STATIC_KW,
    VIRTUAL_KW,
    PURE_KW,
    EXTERN_KW,
    CONST_KW,
    RAND_KW,
    RANDC_KW,
    AUTOMATIC_KW,

    // Assertions
    ASSERT_KW,
    ASSUME_KW,
    COVER_KW,
    PROPERTY_KW,
    SEQUENCE_KW,
    ENDPROPERTY_KW,
    ENDSEQUENCE_KW,

    NULL_KW,
    NEW_KW,
    THIS_KW,
    SUPER_KW,

    // =====================================================================
    // NODE KINDS
    // =====================================================================
    SOURCE_FILE,
    ERROR_NODE,

    MODULE_DECLARATION,
    INTERFACE_DECLARATION,
    PROGRAM_DECLARATION,
    PACKAGE_DECLARATION,
    CLASS_DECLARATION,
    CHECKER_DECLARATION,

    PORT_LIST,
    ANSI_PORT,
    PARAMETER_PORT_LIST,
    PARAMETER_DECLARATION,
    NET_DECLARATION,
    VARIABLE_DECLARATION,
    DATA_TYPE,
    PACKED_DIMENSION,
    UNPACKED_DIMENSION,
    TYPEDEF_DECLARATION,
    STRUCT_UNION_BODY,
    STRUCT_UNION_MEMBER,
    ENUM_BODY,
    ENUM_MEMBER,

    HIERARCHICAL_INSTANCE,
    INSTANCE_NAME,
    PARAMETER_VALUE_ASSIGNMENT,
    NAMED_PARAM_ASSIGNMENT,
    ORDERED_PARAM_ASSIGNMENT,
    PORT_CONNECTION,

    FUNCTION_DECLARATION,
    TASK_DECLARATION,
    FUNCTION_PROTOTYPE,
    SCOPED_NAME,
    ARGUMENT_LIST,
    FORMAL_ARGUMENT,

    GENERATE_BLOCK,
    GENERATE_IF,
    GENERATE_FOR,
    GENERATE_CASE,

    MODPORT_DECLARATION,
    MODPORT_PORT,

    CLASS_QUALIFIER_LIST,
    CLASS_MEMBER,

    STATEMENT,
    BLOCK_STATEMENT,
    IF_STATEMENT,
    CASE_STATEMENT,
    CASE_ITEM,
    FOR_STATEMENT,
    WHILE_STATEMENT,
    DO_WHILE_STATEMENT,
    FOREACH_STATEMENT,
    RETURN_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    EXPRESSION_STATEMENT,
    ASSIGNMENT_STATEMENT,
    PROCEDURAL_BLOCK,
    LABELED_STATEMENT,

    EXPRESSION,
    BINARY_EXPRESSION,
    UNARY_EXPRESSION,
    CONDITIONAL_EXPRESSION,
    CONCATENATION_EXPRESSION,
    REPLICATION_EXPRESSION,
    CALL_EXPRESSION,
    INDEX_EXPRESSION,
    RANGE_EXPRESSION,
    MEMBER_ACCESS_EXPRESSION,
    PAREN_EXPRESSION,
    LITERAL_EXPRESSION,
    IDENT_EXPRESSION,
    ASSIGNMENT_PATTERN_EXPRESSION,
    CAST_EXPRESSION,

    IMPORT_ITEM,
    EXPORT_ITEM,

    /// Sentinel marking the end of valid kinds; never produced directly.
    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        (self as u16) <= (Self::DISABLED_TEXT_TRIVIA as u16)
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MODULE_KW as u16) && (self as u16) <= (Self::SUPER_KW as u16)
    }

    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::DOLLAR as u16)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::ESCAPED_IDENT
                | Self::SYSTEM_IDENT
                | Self::STRING_LITERAL
                | Self::DECIMAL_LITERAL
                | Self::SIZED_INT_LITERAL
                | Self::UNSIZED_BASED_INT_LITERAL
                | Self::UNBASED_UNSIZED_LITERAL
                | Self::REAL_LITERAL
                | Self::TIME_LITERAL
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we only ever construct `rowan::SyntaxKind`s from `SyntaxKind as u16`.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Marker type tying `SyntaxKind` to rowan's generic tree machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SvLanguage {}

impl rowan::Language for SvLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<SvLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<SvLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<SvLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<SvLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_range_is_correct() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::DISABLED_TEXT_TRIVIA.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
    }

    #[test]
    fn keyword_range_is_correct() {
        assert!(SyntaxKind::MODULE_KW.is_keyword());
        assert!(SyntaxKind::LOGIC_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
    }

    #[test]
    fn rowan_kind_round_trips() {
        let raw: rowan::SyntaxKind = SyntaxKind::MODULE_DECLARATION.into();
        let back: SyntaxKind = raw.into();
        assert_eq!(back, SyntaxKind::MODULE_DECLARATION);
    }
}
