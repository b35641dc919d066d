//! Typed AST wrappers over the rowan CST (spec §4.4). Same pattern as the
//! teacher's `parser::ast`: an `ast_node!` macro stamps out a newtype over
//! `SyntaxNode` plus an [`AstNode`] impl that casts by kind, and hand-written
//! accessor methods walk `children()`/`children_with_tokens()` to pull out
//! the pieces callers actually want (a name token, a port list, a body).

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Finds the first direct-child token of the given kind (used for the `IDENT`
/// that names a declaration, immediately following its introducing keyword).
fn token_child(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn node_child<T: AstNode>(node: &SyntaxNode) -> Option<T> {
    node.children().find_map(T::cast)
}

fn node_children<T: AstNode>(node: &SyntaxNode) -> impl Iterator<Item = T> {
    node.children().filter_map(T::cast)
}

// ===========================================================================
// Root
// ===========================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn items(&self) -> impl Iterator<Item = ModuleItem> + '_ {
        self.syntax().children().filter_map(ModuleItem::cast)
    }

    /// Every direct child a `ScriptSession`'s `$unit` scope (spec §6.1) may
    /// see: design-unit declarations plus the bare declaration/instance/
    /// expression forms `grammar::source_file` also accepts at top level.
    pub fn script_items(&self) -> impl Iterator<Item = ScriptItem> + '_ {
        self.syntax().children().filter_map(ScriptItem::cast)
    }
}

/// A `SourceFile` child as seen by script-scope parsing: either a whole
/// design-unit declaration or one of the bare top-level forms
/// `top_level_expression_statement`/`hierarchical_instance_or_variable`
/// produce directly under `SOURCE_FILE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptItem {
    Module(ModuleDeclaration),
    Interface(InterfaceDeclaration),
    Program(ProgramDeclaration),
    Package(PackageDeclaration),
    Class(ClassDeclaration),
    Checker(CheckerDeclaration),
    Function(FunctionDeclaration),
    Task(TaskDeclaration),
    Typedef(TypedefDeclaration),
    Parameter(ParameterDeclaration),
    Instance(HierarchicalInstance),
    Variable(VariableDeclaration),
    Expression(ExpressionStatement),
}

impl AstNode for ScriptItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::MODULE_DECLARATION
                | SyntaxKind::INTERFACE_DECLARATION
                | SyntaxKind::PROGRAM_DECLARATION
                | SyntaxKind::PACKAGE_DECLARATION
                | SyntaxKind::CLASS_DECLARATION
                | SyntaxKind::CHECKER_DECLARATION
                | SyntaxKind::FUNCTION_DECLARATION
                | SyntaxKind::TASK_DECLARATION
                | SyntaxKind::TYPEDEF_DECLARATION
                | SyntaxKind::PARAMETER_DECLARATION
                | SyntaxKind::HIERARCHICAL_INSTANCE
                | SyntaxKind::VARIABLE_DECLARATION
                | SyntaxKind::EXPRESSION_STATEMENT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::MODULE_DECLARATION => ModuleDeclaration::cast(node).map(Self::Module),
            SyntaxKind::INTERFACE_DECLARATION => InterfaceDeclaration::cast(node).map(Self::Interface),
            SyntaxKind::PROGRAM_DECLARATION => ProgramDeclaration::cast(node).map(Self::Program),
            SyntaxKind::PACKAGE_DECLARATION => PackageDeclaration::cast(node).map(Self::Package),
            SyntaxKind::CLASS_DECLARATION => ClassDeclaration::cast(node).map(Self::Class),
            SyntaxKind::CHECKER_DECLARATION => CheckerDeclaration::cast(node).map(Self::Checker),
            SyntaxKind::FUNCTION_DECLARATION => FunctionDeclaration::cast(node).map(Self::Function),
            SyntaxKind::TASK_DECLARATION => TaskDeclaration::cast(node).map(Self::Task),
            SyntaxKind::TYPEDEF_DECLARATION => TypedefDeclaration::cast(node).map(Self::Typedef),
            SyntaxKind::PARAMETER_DECLARATION => ParameterDeclaration::cast(node).map(Self::Parameter),
            SyntaxKind::HIERARCHICAL_INSTANCE => HierarchicalInstance::cast(node).map(Self::Instance),
            SyntaxKind::VARIABLE_DECLARATION => VariableDeclaration::cast(node).map(Self::Variable),
            SyntaxKind::EXPRESSION_STATEMENT => ExpressionStatement::cast(node).map(Self::Expression),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Module(n) => n.syntax(),
            Self::Interface(n) => n.syntax(),
            Self::Program(n) => n.syntax(),
            Self::Package(n) => n.syntax(),
            Self::Class(n) => n.syntax(),
            Self::Checker(n) => n.syntax(),
            Self::Function(n) => n.syntax(),
            Self::Task(n) => n.syntax(),
            Self::Typedef(n) => n.syntax(),
            Self::Parameter(n) => n.syntax(),
            Self::Instance(n) => n.syntax(),
            Self::Variable(n) => n.syntax(),
            Self::Expression(n) => n.syntax(),
        }
    }
}

/// Any top-level design-unit declaration a compilation unit may contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleItem {
    Module(ModuleDeclaration),
    Interface(InterfaceDeclaration),
    Program(ProgramDeclaration),
    Package(PackageDeclaration),
    Class(ClassDeclaration),
    Checker(CheckerDeclaration),
}

impl AstNode for ModuleItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::MODULE_DECLARATION
                | SyntaxKind::INTERFACE_DECLARATION
                | SyntaxKind::PROGRAM_DECLARATION
                | SyntaxKind::PACKAGE_DECLARATION
                | SyntaxKind::CLASS_DECLARATION
                | SyntaxKind::CHECKER_DECLARATION
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::MODULE_DECLARATION => ModuleDeclaration::cast(node).map(Self::Module),
            SyntaxKind::INTERFACE_DECLARATION => InterfaceDeclaration::cast(node).map(Self::Interface),
            SyntaxKind::PROGRAM_DECLARATION => ProgramDeclaration::cast(node).map(Self::Program),
            SyntaxKind::PACKAGE_DECLARATION => PackageDeclaration::cast(node).map(Self::Package),
            SyntaxKind::CLASS_DECLARATION => ClassDeclaration::cast(node).map(Self::Class),
            SyntaxKind::CHECKER_DECLARATION => CheckerDeclaration::cast(node).map(Self::Checker),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Module(n) => n.syntax(),
            Self::Interface(n) => n.syntax(),
            Self::Program(n) => n.syntax(),
            Self::Package(n) => n.syntax(),
            Self::Class(n) => n.syntax(),
            Self::Checker(n) => n.syntax(),
        }
    }
}

// ===========================================================================
// Design units
// ===========================================================================

ast_node!(ModuleDeclaration, MODULE_DECLARATION);

impl ModuleDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn port_list(&self) -> Option<PortList> {
        node_child(self.syntax())
    }

    pub fn parameter_port_list(&self) -> Option<ParameterPortList> {
        node_child(self.syntax())
    }

    pub fn items(&self) -> impl Iterator<Item = ModuleBodyItem> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(InterfaceDeclaration, INTERFACE_DECLARATION);

impl InterfaceDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn port_list(&self) -> Option<PortList> {
        node_child(self.syntax())
    }

    pub fn items(&self) -> impl Iterator<Item = ModuleBodyItem> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(ProgramDeclaration, PROGRAM_DECLARATION);

impl ProgramDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }
}

ast_node!(PackageDeclaration, PACKAGE_DECLARATION);

impl PackageDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn items(&self) -> impl Iterator<Item = ModuleBodyItem> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(ClassDeclaration, CLASS_DECLARATION);

impl ClassDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    /// The base class named in an `extends` clause, if any. Represented as a
    /// raw scoped-name node rather than a resolved symbol — binding happens
    /// downstream in `crate::binder`.
    pub fn extends(&self) -> Option<ScopedName> {
        node_child(self.syntax())
    }

    pub fn members(&self) -> impl Iterator<Item = ClassMember> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(CheckerDeclaration, CHECKER_DECLARATION);

impl CheckerDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }
}

// ===========================================================================
// Ports / parameters
// ===========================================================================

ast_node!(PortList, PORT_LIST);

impl PortList {
    pub fn ports(&self) -> impl Iterator<Item = AnsiPort> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(AnsiPort, ANSI_PORT);

impl AnsiPort {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }
}

ast_node!(ParameterPortList, PARAMETER_PORT_LIST);

impl ParameterPortList {
    pub fn parameters(&self) -> impl Iterator<Item = ParameterDeclaration> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(ParameterDeclaration, PARAMETER_DECLARATION);

impl ParameterDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }

    pub fn default_value(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    /// `localparam` (no override allowed at instantiation) vs. `parameter`.
    pub fn is_local(&self) -> bool {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|t| t.kind() == SyntaxKind::LOCALPARAM_KW)
    }
}

// ===========================================================================
// Types
// ===========================================================================

ast_node!(DataType, DATA_TYPE);

impl DataType {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_keyword())
    }

    pub fn packed_dimensions(&self) -> impl Iterator<Item = PackedDimension> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(PackedDimension, PACKED_DIMENSION);

impl PackedDimension {
    /// The left-hand bound of a `[msb:lsb]` range, or the sole expression of
    /// a `[n]` unsized-style dimension (in which case `lsb` is `None`).
    pub fn msb(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn lsb(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }
}

ast_node!(UnpackedDimension, UNPACKED_DIMENSION);
ast_node!(TypedefDeclaration, TYPEDEF_DECLARATION);

impl TypedefDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }
}

ast_node!(StructUnionBody, STRUCT_UNION_BODY);

impl StructUnionBody {
    pub fn members(&self) -> impl Iterator<Item = StructUnionMember> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(StructUnionMember, STRUCT_UNION_MEMBER);
ast_node!(EnumBody, ENUM_BODY);
ast_node!(EnumMember, ENUM_MEMBER);

// ===========================================================================
// Module body items
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleBodyItem {
    Net(NetDeclaration),
    Variable(VariableDeclaration),
    Parameter(ParameterDeclaration),
    Typedef(TypedefDeclaration),
    Function(FunctionDeclaration),
    Task(TaskDeclaration),
    Instance(HierarchicalInstance),
    Generate(GenerateBlock),
    ProceduralBlock(ProceduralBlock),
    Modport(ModportDeclaration),
    Import(ImportItem),
}

impl AstNode for ModuleBodyItem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NET_DECLARATION
                | SyntaxKind::VARIABLE_DECLARATION
                | SyntaxKind::PARAMETER_DECLARATION
                | SyntaxKind::TYPEDEF_DECLARATION
                | SyntaxKind::FUNCTION_DECLARATION
                | SyntaxKind::TASK_DECLARATION
                | SyntaxKind::HIERARCHICAL_INSTANCE
                | SyntaxKind::GENERATE_BLOCK
                | SyntaxKind::PROCEDURAL_BLOCK
                | SyntaxKind::MODPORT_DECLARATION
                | SyntaxKind::IMPORT_ITEM
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NET_DECLARATION => NetDeclaration::cast(node).map(Self::Net),
            SyntaxKind::VARIABLE_DECLARATION => VariableDeclaration::cast(node).map(Self::Variable),
            SyntaxKind::PARAMETER_DECLARATION => ParameterDeclaration::cast(node).map(Self::Parameter),
            SyntaxKind::TYPEDEF_DECLARATION => TypedefDeclaration::cast(node).map(Self::Typedef),
            SyntaxKind::FUNCTION_DECLARATION => FunctionDeclaration::cast(node).map(Self::Function),
            SyntaxKind::TASK_DECLARATION => TaskDeclaration::cast(node).map(Self::Task),
            SyntaxKind::HIERARCHICAL_INSTANCE => HierarchicalInstance::cast(node).map(Self::Instance),
            SyntaxKind::GENERATE_BLOCK => GenerateBlock::cast(node).map(Self::Generate),
            SyntaxKind::PROCEDURAL_BLOCK => ProceduralBlock::cast(node).map(Self::ProceduralBlock),
            SyntaxKind::MODPORT_DECLARATION => ModportDeclaration::cast(node).map(Self::Modport),
            SyntaxKind::IMPORT_ITEM => ImportItem::cast(node).map(Self::Import),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Net(n) => n.syntax(),
            Self::Variable(n) => n.syntax(),
            Self::Parameter(n) => n.syntax(),
            Self::Typedef(n) => n.syntax(),
            Self::Function(n) => n.syntax(),
            Self::Task(n) => n.syntax(),
            Self::Instance(n) => n.syntax(),
            Self::Generate(n) => n.syntax(),
            Self::ProceduralBlock(n) => n.syntax(),
            Self::Modport(n) => n.syntax(),
            Self::Import(n) => n.syntax(),
        }
    }
}

ast_node!(NetDeclaration, NET_DECLARATION);

impl NetDeclaration {
    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }

    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
    }
}

ast_node!(VariableDeclaration, VARIABLE_DECLARATION);

impl VariableDeclaration {
    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }

    pub fn names(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
    }

    pub fn initializer(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

ast_node!(FunctionDeclaration, FUNCTION_DECLARATION);

impl FunctionDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn return_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }

    pub fn arguments(&self) -> impl Iterator<Item = FormalArgument> + '_ {
        node_children(self.syntax())
    }

    pub fn body(&self) -> impl Iterator<Item = Statement> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(TaskDeclaration, TASK_DECLARATION);

impl TaskDeclaration {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn arguments(&self) -> impl Iterator<Item = FormalArgument> + '_ {
        node_children(self.syntax())
    }

    pub fn body(&self) -> impl Iterator<Item = Statement> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(FormalArgument, FORMAL_ARGUMENT);

impl FormalArgument {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn data_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }
}

ast_node!(HierarchicalInstance, HIERARCHICAL_INSTANCE);

impl HierarchicalInstance {
    pub fn type_name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn parameter_assignment(&self) -> Option<ParameterValueAssignment> {
        node_child(self.syntax())
    }

    pub fn instances(&self) -> impl Iterator<Item = InstanceName> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(InstanceName, INSTANCE_NAME);

impl InstanceName {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn port_connections(&self) -> impl Iterator<Item = PortConnection> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(ParameterValueAssignment, PARAMETER_VALUE_ASSIGNMENT);
ast_node!(NamedParamAssignment, NAMED_PARAM_ASSIGNMENT);
ast_node!(OrderedParamAssignment, ORDERED_PARAM_ASSIGNMENT);
ast_node!(PortConnection, PORT_CONNECTION);

impl PortConnection {
    /// `.name(...)`'s name, if this connection is named rather than ordered.
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn value(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

/// One element of a `#(...)` parameter value assignment — either
/// `.name(expr)` or a bare positional `expr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamAssignment {
    Named(NamedParamAssignment),
    Ordered(OrderedParamAssignment),
}

impl AstNode for ParamAssignment {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::NAMED_PARAM_ASSIGNMENT | SyntaxKind::ORDERED_PARAM_ASSIGNMENT)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAMED_PARAM_ASSIGNMENT => NamedParamAssignment::cast(node).map(Self::Named),
            SyntaxKind::ORDERED_PARAM_ASSIGNMENT => OrderedParamAssignment::cast(node).map(Self::Ordered),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Named(n) => n.syntax(),
            Self::Ordered(n) => n.syntax(),
        }
    }
}

impl ParameterValueAssignment {
    pub fn assignments(&self) -> impl Iterator<Item = ParamAssignment> + '_ {
        node_children(self.syntax())
    }
}

impl NamedParamAssignment {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn value(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

impl OrderedParamAssignment {
    pub fn value(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

ast_node!(GenerateBlock, GENERATE_BLOCK);

impl GenerateBlock {
    pub fn items(&self) -> impl Iterator<Item = ModuleBodyItem> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(GenerateIf, GENERATE_IF);
ast_node!(GenerateFor, GENERATE_FOR);
ast_node!(GenerateCase, GENERATE_CASE);
ast_node!(ModportDeclaration, MODPORT_DECLARATION);
ast_node!(ModportPort, MODPORT_PORT);
ast_node!(ImportItem, IMPORT_ITEM);
ast_node!(ExportItem, EXPORT_ITEM);
ast_node!(ScopedName, SCOPED_NAME);

ast_node!(ClassMember, CLASS_MEMBER);

impl ClassMember {
    pub fn qualifiers(&self) -> Option<ClassQualifierList> {
        node_child(self.syntax())
    }
}

ast_node!(ClassQualifierList, CLASS_QUALIFIER_LIST);

// ===========================================================================
// Statements
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Block(BlockStatement),
    If(IfStatement),
    Case(CaseStatement),
    For(ForStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    Foreach(ForeachStatement),
    Return(ReturnStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Expression(ExpressionStatement),
    Assignment(AssignmentStatement),
    Procedural(ProceduralBlock),
    Labeled(LabeledStatement),
    Variable(VariableDeclaration),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BLOCK_STATEMENT
                | SyntaxKind::IF_STATEMENT
                | SyntaxKind::CASE_STATEMENT
                | SyntaxKind::FOR_STATEMENT
                | SyntaxKind::WHILE_STATEMENT
                | SyntaxKind::DO_WHILE_STATEMENT
                | SyntaxKind::FOREACH_STATEMENT
                | SyntaxKind::RETURN_STATEMENT
                | SyntaxKind::BREAK_STATEMENT
                | SyntaxKind::CONTINUE_STATEMENT
                | SyntaxKind::EXPRESSION_STATEMENT
                | SyntaxKind::ASSIGNMENT_STATEMENT
                | SyntaxKind::PROCEDURAL_BLOCK
                | SyntaxKind::LABELED_STATEMENT
                | SyntaxKind::VARIABLE_DECLARATION
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BLOCK_STATEMENT => BlockStatement::cast(node).map(Self::Block),
            SyntaxKind::IF_STATEMENT => IfStatement::cast(node).map(Self::If),
            SyntaxKind::CASE_STATEMENT => CaseStatement::cast(node).map(Self::Case),
            SyntaxKind::FOR_STATEMENT => ForStatement::cast(node).map(Self::For),
            SyntaxKind::WHILE_STATEMENT => WhileStatement::cast(node).map(Self::While),
            SyntaxKind::DO_WHILE_STATEMENT => DoWhileStatement::cast(node).map(Self::DoWhile),
            SyntaxKind::FOREACH_STATEMENT => ForeachStatement::cast(node).map(Self::Foreach),
            SyntaxKind::RETURN_STATEMENT => ReturnStatement::cast(node).map(Self::Return),
            SyntaxKind::BREAK_STATEMENT => BreakStatement::cast(node).map(Self::Break),
            SyntaxKind::CONTINUE_STATEMENT => ContinueStatement::cast(node).map(Self::Continue),
            SyntaxKind::EXPRESSION_STATEMENT => ExpressionStatement::cast(node).map(Self::Expression),
            SyntaxKind::ASSIGNMENT_STATEMENT => AssignmentStatement::cast(node).map(Self::Assignment),
            SyntaxKind::PROCEDURAL_BLOCK => ProceduralBlock::cast(node).map(Self::Procedural),
            SyntaxKind::LABELED_STATEMENT => LabeledStatement::cast(node).map(Self::Labeled),
            SyntaxKind::VARIABLE_DECLARATION => VariableDeclaration::cast(node).map(Self::Variable),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::Case(n) => n.syntax(),
            Self::For(n) => n.syntax(),
            Self::While(n) => n.syntax(),
            Self::DoWhile(n) => n.syntax(),
            Self::Foreach(n) => n.syntax(),
            Self::Return(n) => n.syntax(),
            Self::Break(n) => n.syntax(),
            Self::Continue(n) => n.syntax(),
            Self::Expression(n) => n.syntax(),
            Self::Assignment(n) => n.syntax(),
            Self::Procedural(n) => n.syntax(),
            Self::Labeled(n) => n.syntax(),
            Self::Variable(n) => n.syntax(),
        }
    }
}

ast_node!(BlockStatement, BLOCK_STATEMENT);

impl BlockStatement {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(IfStatement, IF_STATEMENT);

impl IfStatement {
    pub fn condition(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn branches(&self) -> impl Iterator<Item = Statement> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(CaseStatement, CASE_STATEMENT);

impl CaseStatement {
    pub fn subject(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn items(&self) -> impl Iterator<Item = CaseItem> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(CaseItem, CASE_ITEM);

impl CaseItem {
    pub fn labels(&self) -> impl Iterator<Item = Expression> + '_ {
        node_children(self.syntax())
    }

    pub fn body(&self) -> Option<Statement> {
        node_child(self.syntax())
    }
}

ast_node!(ForStatement, FOR_STATEMENT);

impl ForStatement {
    pub fn init(&self) -> Option<Statement> {
        node_child(self.syntax())
    }

    pub fn condition(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    /// The increment clause between the second `;` and the closing `)`.
    /// Sits between `init` and `body` in document order, so it can't be
    /// reached with `first`/`last` the way those two are.
    pub fn step(&self) -> Option<Statement> {
        self.syntax().children().filter_map(Statement::cast).nth(1)
    }

    pub fn body(&self) -> Option<Statement> {
        self.syntax().children().filter_map(Statement::cast).last()
    }
}

ast_node!(WhileStatement, WHILE_STATEMENT);

impl WhileStatement {
    pub fn condition(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn body(&self) -> Option<Statement> {
        node_child(self.syntax())
    }
}

ast_node!(DoWhileStatement, DO_WHILE_STATEMENT);
ast_node!(ForeachStatement, FOREACH_STATEMENT);

impl ForeachStatement {
    pub fn array(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn body(&self) -> Option<Statement> {
        node_children(self.syntax()).last()
    }
}

ast_node!(ReturnStatement, RETURN_STATEMENT);

impl ReturnStatement {
    pub fn value(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

ast_node!(BreakStatement, BREAK_STATEMENT);
ast_node!(ContinueStatement, CONTINUE_STATEMENT);
ast_node!(ExpressionStatement, EXPRESSION_STATEMENT);

impl ExpressionStatement {
    pub fn expression(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

ast_node!(AssignmentStatement, ASSIGNMENT_STATEMENT);

impl AssignmentStatement {
    pub fn target(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn value(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }
}

ast_node!(ProceduralBlock, PROCEDURAL_BLOCK);

impl ProceduralBlock {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_keyword())
    }

    pub fn body(&self) -> Option<Statement> {
        node_child(self.syntax())
    }
}

ast_node!(LabeledStatement, LABELED_STATEMENT);

impl LabeledStatement {
    pub fn label(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }

    pub fn statement(&self) -> Option<Statement> {
        node_child(self.syntax())
    }
}

// ===========================================================================
// Expressions
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Conditional(ConditionalExpression),
    Concatenation(ConcatenationExpression),
    Replication(ReplicationExpression),
    Call(CallExpression),
    Index(IndexExpression),
    Range(RangeExpression),
    MemberAccess(MemberAccessExpression),
    Paren(ParenExpression),
    Literal(LiteralExpression),
    Ident(IdentExpression),
    AssignmentPattern(AssignmentPatternExpression),
    Cast(CastExpression),
}

impl AstNode for Expression {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BINARY_EXPRESSION
                | SyntaxKind::UNARY_EXPRESSION
                | SyntaxKind::CONDITIONAL_EXPRESSION
                | SyntaxKind::CONCATENATION_EXPRESSION
                | SyntaxKind::REPLICATION_EXPRESSION
                | SyntaxKind::CALL_EXPRESSION
                | SyntaxKind::INDEX_EXPRESSION
                | SyntaxKind::RANGE_EXPRESSION
                | SyntaxKind::MEMBER_ACCESS_EXPRESSION
                | SyntaxKind::PAREN_EXPRESSION
                | SyntaxKind::LITERAL_EXPRESSION
                | SyntaxKind::IDENT_EXPRESSION
                | SyntaxKind::ASSIGNMENT_PATTERN_EXPRESSION
                | SyntaxKind::CAST_EXPRESSION
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BINARY_EXPRESSION => BinaryExpression::cast(node).map(Self::Binary),
            SyntaxKind::UNARY_EXPRESSION => UnaryExpression::cast(node).map(Self::Unary),
            SyntaxKind::CONDITIONAL_EXPRESSION => ConditionalExpression::cast(node).map(Self::Conditional),
            SyntaxKind::CONCATENATION_EXPRESSION => ConcatenationExpression::cast(node).map(Self::Concatenation),
            SyntaxKind::REPLICATION_EXPRESSION => ReplicationExpression::cast(node).map(Self::Replication),
            SyntaxKind::CALL_EXPRESSION => CallExpression::cast(node).map(Self::Call),
            SyntaxKind::INDEX_EXPRESSION => IndexExpression::cast(node).map(Self::Index),
            SyntaxKind::RANGE_EXPRESSION => RangeExpression::cast(node).map(Self::Range),
            SyntaxKind::MEMBER_ACCESS_EXPRESSION => MemberAccessExpression::cast(node).map(Self::MemberAccess),
            SyntaxKind::PAREN_EXPRESSION => ParenExpression::cast(node).map(Self::Paren),
            SyntaxKind::LITERAL_EXPRESSION => LiteralExpression::cast(node).map(Self::Literal),
            SyntaxKind::IDENT_EXPRESSION => IdentExpression::cast(node).map(Self::Ident),
            SyntaxKind::ASSIGNMENT_PATTERN_EXPRESSION => {
                AssignmentPatternExpression::cast(node).map(Self::AssignmentPattern)
            }
            SyntaxKind::CAST_EXPRESSION => CastExpression::cast(node).map(Self::Cast),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Binary(n) => n.syntax(),
            Self::Unary(n) => n.syntax(),
            Self::Conditional(n) => n.syntax(),
            Self::Concatenation(n) => n.syntax(),
            Self::Replication(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Index(n) => n.syntax(),
            Self::Range(n) => n.syntax(),
            Self::MemberAccess(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
            Self::Literal(n) => n.syntax(),
            Self::Ident(n) => n.syntax(),
            Self::AssignmentPattern(n) => n.syntax(),
            Self::Cast(n) => n.syntax(),
        }
    }
}

ast_node!(BinaryExpression, BINARY_EXPRESSION);

impl BinaryExpression {
    pub fn lhs(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn rhs(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_punct())
    }
}

ast_node!(UnaryExpression, UNARY_EXPRESSION);

impl UnaryExpression {
    pub fn operand(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_punct())
    }
}

ast_node!(ConditionalExpression, CONDITIONAL_EXPRESSION);

impl ConditionalExpression {
    pub fn condition(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn then_branch(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }

    pub fn else_branch(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(2)
    }
}

ast_node!(ConcatenationExpression, CONCATENATION_EXPRESSION);

impl ConcatenationExpression {
    pub fn elements(&self) -> impl Iterator<Item = Expression> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(ReplicationExpression, REPLICATION_EXPRESSION);

impl ReplicationExpression {
    pub fn count(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn value(&self) -> Option<ConcatenationExpression> {
        node_child(self.syntax())
    }
}

ast_node!(CallExpression, CALL_EXPRESSION);

impl CallExpression {
    pub fn callee(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn arguments(&self) -> Option<ArgumentList> {
        node_child(self.syntax())
    }
}

ast_node!(ArgumentList, ARGUMENT_LIST);

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Expression> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(IndexExpression, INDEX_EXPRESSION);

impl IndexExpression {
    pub fn base(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn index(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }
}

ast_node!(RangeExpression, RANGE_EXPRESSION);

impl RangeExpression {
    pub fn base(&self) -> Option<Expression> {
        node_children(self.syntax()).next()
    }

    pub fn msb(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(1)
    }

    pub fn lsb(&self) -> Option<Expression> {
        node_children(self.syntax()).nth(2)
    }
}

ast_node!(MemberAccessExpression, MEMBER_ACCESS_EXPRESSION);

impl MemberAccessExpression {
    pub fn base(&self) -> Option<Expression> {
        node_child(self.syntax())
    }

    pub fn member(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }
}

ast_node!(ParenExpression, PAREN_EXPRESSION);

impl ParenExpression {
    pub fn inner(&self) -> Option<Expression> {
        node_child(self.syntax())
    }
}

ast_node!(LiteralExpression, LITERAL_EXPRESSION);

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_literal())
    }
}

ast_node!(IdentExpression, IDENT_EXPRESSION);

impl IdentExpression {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_child(self.syntax(), SyntaxKind::IDENT)
    }
}

ast_node!(AssignmentPatternExpression, ASSIGNMENT_PATTERN_EXPRESSION);

impl AssignmentPatternExpression {
    pub fn elements(&self) -> impl Iterator<Item = Expression> + '_ {
        node_children(self.syntax())
    }
}

ast_node!(CastExpression, CAST_EXPRESSION);

impl CastExpression {
    pub fn target_type(&self) -> Option<DataType> {
        node_child(self.syntax())
    }

    pub fn operand(&self) -> Option<Expression> {
        node_children(self.syntax()).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source_file_text;

    #[test]
    fn module_declaration_exposes_name_and_ports() {
        let parse = parse_source_file_text("module m(input logic a); endmodule");
        let file = SourceFile::cast(parse.syntax()).unwrap();
        let m = match file.items().next().unwrap() {
            ModuleItem::Module(m) => m,
            _ => panic!("expected module"),
        };
        assert_eq!(m.name().unwrap().text(), "m");
        assert!(m.port_list().unwrap().ports().next().is_some());
    }
}
