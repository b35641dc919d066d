//! The root container a `ScriptSession` (and any other caller) elaborates
//! against (spec §4.5, §6.1). Mirrors the teacher's
//! `semantic::workspace::Workspace`: a plain struct owning a symbol table
//! plus per-file bookkeeping, populated eagerly as each syntax tree is
//! added rather than through `salsa`'s incremental-query machinery — this
//! library evaluates a `ScriptSession` input once, not continuously against
//! an editor buffer, so `salsa`'s memoized-query plumbing (the teacher's
//! `hir::db::RootDatabase`) would add a dependency with nothing for it to
//! incrementally recompute. Dropped; see `DESIGN.md`.
//!
//! Scope population is eager (spec §4.5 phase 1): every design-unit
//! declaration, function/task, variable, and parameter a script evaluates
//! is registered into the root (`$unit`) scope as soon as its syntax tree
//! is added. Per-symbol elaboration — a parameter's folded value in
//! particular — is lazy and memoized (phase 2), computed by
//! [`Compilation::elaborate_instance`] the first time an instance is
//! declared and cached in `values` keyed by `SymbolId`, exactly the
//! "computed on first request and memoized" rule spec §4.5 describes.

mod options;

pub use options::{CompilationOptions, LanguageVersion};

use crate::base::Name;
use crate::binder::{BindContext, Diagnostic, NameResolver};
use crate::eval::value::ConstantValue;
use crate::eval::{ConstantEvaluator, Environment};
use crate::parser::ast::{
    AstNode, Expression, HierarchicalInstance, ModuleBodyItem, ModuleDeclaration, ParamAssignment, ParameterDeclaration,
    ScriptItem, SourceFile,
};
use crate::parser::parser::Parse;
use crate::parser::syntax_kind::SyntaxNode;
use crate::source::SourceManager;
use crate::symbols::{ScopeId, Symbol, SymbolId, SymbolKind, SymbolTable};
use crate::types::TypeTable;
use rustc_hash::{FxHashMap, FxHashSet};

/// Parses `source` as a standalone compilation unit, with no attached
/// `SourceManager` (spec §6.1's `parse_from_text`). `options` is accepted
/// for signature fidelity; nothing in it currently changes how `grammar`
/// parses (see `CompilationOptions`'s doc comment).
pub fn parse_from_text(source: &str, _options: &CompilationOptions) -> Parse {
    crate::parser::parse_source_file_text(source)
}

/// Reads `path` out of `source_manager` and parses it (spec §6.1's
/// `parse_from_file`). Returns `None` if the file doesn't exist — per
/// spec §7's error taxonomy this is an I/O error communicated through
/// `SourceBuffer`'s boolean-false form; the caller is responsible for
/// turning a `None` into the "one diagnostic" boundary behavior (spec §8).
pub fn parse_from_file(source_manager: &SourceManager, path: &str, _options: &CompilationOptions) -> Option<Parse> {
    let buffer = source_manager.read_source(path);
    let id = buffer.id()?;
    Some(crate::parser::parse_source_file(source_manager, id))
}

/// Resolves an already-elaborated instance's hierarchical member
/// (`a0.LP`) by reading [`Compilation::values`] — never computes a new
/// value, since by the time a script queries a member the instance that
/// owns it has already run eagerly through
/// [`Compilation::elaborate_instance`]. Kept as a narrow `&SymbolTable` +
/// `&values` borrow (rather than implementing `NameResolver` directly on
/// `Compilation`) so a `BindContext` can hold a `&mut TypeTable` borrowed
/// from the same `Compilation` at the same time without aliasing it.
struct ElabResolver<'a> {
    symbols: &'a SymbolTable,
    values: &'a FxHashMap<SymbolId, ConstantValue>,
}

impl<'a> NameResolver for ElabResolver<'a> {
    fn resolve_member(&self, scope: ScopeId, member: &str) -> Option<ConstantValue> {
        let id = self.symbols.lookup(scope, member)?;
        self.values.get(&id).cloned()
    }
}

/// A read-only view over the compilation's top-level ($unit) scope (spec
/// §6.1's `get_root() -> RootSymbol`).
pub struct RootSymbol<'a> {
    compilation: &'a Compilation,
}

impl<'a> RootSymbol<'a> {
    pub fn members(&self) -> impl Iterator<Item = &'a Symbol> + 'a {
        let symbols = &self.compilation.symbols;
        symbols.get_scope(self.compilation.root).members().iter().map(move |id| symbols.get(*id))
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.compilation.symbols.lookup(self.compilation.root, name)
    }
}

/// Root container: arenas for symbols/types, the `$unit` scope every added
/// syntax tree's top-level declarations register into, and the memoized
/// elaborated-value table instance parameters fold down to (spec §4.5,
/// §4.6, §6.1).
pub struct Compilation {
    options: CompilationOptions,
    symbols: SymbolTable,
    types: TypeTable,
    root: ScopeId,
    values: FxHashMap<SymbolId, ConstantValue>,
    in_progress: FxHashSet<SymbolId>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn new(options: CompilationOptions) -> Self {
        let mut symbols = SymbolTable::new();
        let root = symbols.new_scope(None);
        Compilation {
            options,
            symbols,
            types: TypeTable::new(),
            root,
            values: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }

    pub fn get_root(&self) -> RootSymbol<'_> {
        RootSymbol { compilation: self }
    }

    /// The `$unit` scope's id, for callers (the serializer) that need to
    /// walk it directly rather than through [`RootSymbol`].
    pub fn root_scope(&self) -> ScopeId {
        self.root
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Read-only access to the symbol/scope arena, for callers (the
    /// serializer in particular) that need to walk a symbol's child scope.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The memoized elaborated value for a parameter/localparam/variable
    /// symbol, if one has been computed yet.
    pub fn value_of(&self, id: SymbolId) -> Option<&ConstantValue> {
        self.values.get(&id)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Registers every top-level declaration in `parse`'s tree into the
    /// `$unit` scope (spec §6.1's `add_syntax_tree`) and returns the value
    /// of the last bare expression/statement it contained, or
    /// `ConstantValue::Null` if it contained none — the same thing
    /// [`Self::eval_text`] returns, since both walk the same
    /// `SourceFile::script_items`.
    pub fn add_syntax_tree(&mut self, parse: Parse) -> ConstantValue {
        for err in &parse.errors {
            self.diagnostics.push(Diagnostic::error(err.message.clone(), err.range));
        }
        let Some(file) = SourceFile::cast(parse.syntax()) else {
            return ConstantValue::Error;
        };
        let mut result = ConstantValue::Null;
        for item in file.script_items() {
            result = self.process_script_item(item);
        }
        result
    }

    /// Parses `text` as one `ScriptSession` input and elaborates it
    /// against the cumulative `$unit` scope (spec §6.1).
    pub fn eval_text(&mut self, text: &str) -> ConstantValue {
        let parse = crate::parser::parse_source_file_text(text);
        self.add_syntax_tree(parse)
    }

    /// Reads and elaborates the file at `path` (spec §6.1's file-based
    /// entry point). An absent file can't be turned into a `Parse` at all
    /// (no tree to attach a diagnostic's range to), so this is the one
    /// place that turns `parse_from_file`'s `None` into the single
    /// diagnostic spec §8's boundary behavior calls for.
    pub fn add_file(&mut self, source_manager: &SourceManager, path: &str) -> ConstantValue {
        match parse_from_file(source_manager, path, &self.options) {
            Some(parse) => self.add_syntax_tree(parse),
            None => {
                self.diagnostics.push(Diagnostic::error(
                    format!("cannot find file '{path}'"),
                    crate::base::TextRange::empty(0.into()),
                ));
                ConstantValue::Error
            }
        }
    }

    /// Bindings for every root-scope symbol this compilation has already
    /// computed a value for — the `Environment` an identifier reference at
    /// script scope resolves against, since `ConstantEvaluator` looks
    /// variables up by name, not by `SymbolId`.
    fn root_environment(&self) -> Environment {
        let mut env = Environment::new();
        for &id in self.symbols.get_scope(self.root).members() {
            if let Some(value) = self.values.get(&id) {
                env.bind(self.symbols.get(id).name.clone(), value.clone());
            }
        }
        env
    }

    fn bind_and_eval(&mut self, scope: ScopeId, expr: &Expression, env: &Environment, resolver: Option<&dyn NameResolver>) -> ConstantValue {
        let mut ctx = BindContext::new(&self.symbols, &mut self.types, scope, usize::MAX);
        if let Some(resolver) = resolver {
            ctx = ctx.with_resolver(resolver);
        }
        let bound = ctx.bind_expr(expr);
        let range = expr.syntax().text_range();
        self.diagnostics.append(&mut ctx.take_diagnostics());
        let mut eval = ConstantEvaluator::new();
        match eval.eval_expr(&bound, env) {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics.push(Diagnostic::error(err.to_string(), range));
                ConstantValue::Error
            }
        }
    }

    fn process_script_item(&mut self, item: ScriptItem) -> ConstantValue {
        match item {
            ScriptItem::Module(m) => {
                if let Some(name) = m.name() {
                    self.symbols.add_symbol(self.root, SymbolKind::Module, Name::new(name.text()), Some(m.syntax().clone()));
                }
                ConstantValue::Null
            }
            ScriptItem::Interface(n) => self.register_named(n.syntax().clone(), n.name(), SymbolKind::Interface),
            ScriptItem::Program(n) => self.register_named(n.syntax().clone(), n.name(), SymbolKind::Program),
            ScriptItem::Package(n) => self.register_named(n.syntax().clone(), n.name(), SymbolKind::Package),
            ScriptItem::Class(n) => self.register_named(n.syntax().clone(), n.name(), SymbolKind::Class),
            ScriptItem::Checker(n) => self.register_named(n.syntax().clone(), n.name(), SymbolKind::Checker),
            ScriptItem::Function(f) => self.register_named(f.syntax().clone(), f.name(), SymbolKind::Function),
            ScriptItem::Task(t) => self.register_named(t.syntax().clone(), t.name(), SymbolKind::Task),
            ScriptItem::Typedef(t) => self.register_named(t.syntax().clone(), t.name(), SymbolKind::Typedef),
            ScriptItem::Parameter(p) => self.process_parameter(p),
            ScriptItem::Variable(v) => self.process_variable(v),
            ScriptItem::Instance(inst) => self.process_instance(inst),
            ScriptItem::Expression(e) => {
                let Some(expr) = e.expression() else { return ConstantValue::Error };
                let env = self.root_environment();
                let resolver = ElabResolver { symbols: &self.symbols, values: &self.values };
                self.bind_and_eval(self.root, &expr, &env, Some(&resolver))
            }
        }
    }

    fn register_named(
        &mut self,
        syntax: SyntaxNode,
        name: Option<crate::parser::syntax_kind::SyntaxToken>,
        kind: SymbolKind,
    ) -> ConstantValue {
        if let Some(name) = name {
            self.symbols.add_symbol(self.root, kind, Name::new(name.text()), Some(syntax));
        }
        ConstantValue::Null
    }

    fn process_parameter(&mut self, p: ParameterDeclaration) -> ConstantValue {
        let Some(name) = p.name() else { return ConstantValue::Error };
        let kind = if p.is_local() { SymbolKind::LocalParameter } else { SymbolKind::Parameter };
        let id = self.symbols.add_symbol(self.root, kind, Name::new(name.text()), Some(p.syntax().clone()));
        let env = self.root_environment();
        let value = match p.default_value() {
            Some(expr) => self.bind_and_eval(self.root, &expr, &env, None),
            None => ConstantValue::Error,
        };
        self.values.insert(id, value.clone());
        value
    }

    fn process_variable(&mut self, v: crate::parser::ast::VariableDeclaration) -> ConstantValue {
        let Some(name) = v.names().next() else { return ConstantValue::Error };
        let id = self.symbols.add_symbol(self.root, SymbolKind::Variable, Name::new(name.text()), Some(v.syntax().clone()));
        let env = self.root_environment();
        let value = match v.initializer() {
            Some(expr) => self.bind_and_eval(self.root, &expr, &env, None),
            None => ConstantValue::Error,
        };
        self.values.insert(id, value.clone());
        value
    }

    /// `A #(.P(2)) a0();` (scenario 8): looks up the module template `A`,
    /// elaborates its parameter/localparam chain into a fresh scope with
    /// the instance's overrides substituted in, and registers one `a0`
    /// symbol per name in the instance's name list, each pointing at that
    /// scope so a later `a0.LP` resolves through [`ElabResolver`].
    fn process_instance(&mut self, inst: HierarchicalInstance) -> ConstantValue {
        let Some(type_name) = inst.type_name() else { return ConstantValue::Error };
        let Some(module_id) = self.symbols.lookup(self.root, type_name.text()) else {
            self.diagnostics.push(Diagnostic::error(
                format!("unknown module '{}'", type_name.text()),
                inst.syntax().text_range(),
            ));
            return ConstantValue::Error;
        };
        let Some(module_node) = self.symbols.get(module_id).syntax.clone() else {
            return ConstantValue::Error;
        };
        let Some(module_decl) = ModuleDeclaration::cast(module_node) else {
            return ConstantValue::Error;
        };

        let inst_scope = self.elaborate_instance(&module_decl, &inst);

        let mut last = ConstantValue::Null;
        for name in inst.instances() {
            let Some(tok) = name.name() else { continue };
            let sym = self.symbols.add_symbol(self.root, SymbolKind::Instance, Name::new(tok.text()), Some(name.syntax().clone()));
            self.symbols.set_symbol_scope(sym, inst_scope);
            last = ConstantValue::Null;
        }
        last
    }

    /// Builds the elaborated parameter/localparam scope for one
    /// instantiation: module `A`'s ports first (override value if the
    /// instance names one, else the port's own default), then its body's
    /// `localparam`s in declaration order, each evaluated against an
    /// `Environment` accumulated from the ports/localparams already
    /// elaborated — SystemVerilog requires a parameter's default to only
    /// reference earlier parameters, so one forward pass suffices.
    fn elaborate_instance(&mut self, module_decl: &ModuleDeclaration, inst: &HierarchicalInstance) -> ScopeId {
        let inst_scope = self.symbols.new_scope(Some(self.root));

        let mut named_overrides: FxHashMap<String, Expression> = FxHashMap::default();
        let mut positional_overrides: Vec<Expression> = Vec::new();
        if let Some(pva) = inst.parameter_assignment() {
            for assign in pva.assignments() {
                match assign {
                    ParamAssignment::Named(n) => {
                        if let (Some(name), Some(value)) = (n.name(), n.value()) {
                            named_overrides.insert(name.text().to_string(), value);
                        }
                    }
                    ParamAssignment::Ordered(o) => {
                        if let Some(value) = o.value() {
                            positional_overrides.push(value);
                        }
                    }
                }
            }
        }

        let mut env = Environment::new();
        let ports: Vec<ParameterDeclaration> =
            module_decl.parameter_port_list().map(|l| l.parameters().collect()).unwrap_or_default();
        for (idx, port) in ports.iter().enumerate() {
            let Some(name_tok) = port.name() else { continue };
            let name = name_tok.text().to_string();
            let id = self.symbols.add_symbol(inst_scope, SymbolKind::Parameter, Name::new(&name), Some(port.syntax().clone()));
            let value = if let Some(expr) = named_overrides.get(&name) {
                self.bind_and_eval(self.root, expr, &env, None)
            } else if let Some(expr) = positional_overrides.get(idx) {
                self.bind_and_eval(self.root, expr, &env, None)
            } else if let Some(expr) = port.default_value() {
                self.bind_and_eval(inst_scope, &expr, &env, None)
            } else {
                ConstantValue::Error
            };
            env.bind(Name::new(&name), value.clone());
            self.values.insert(id, value);
        }

        for item in module_decl.items() {
            let ModuleBodyItem::Parameter(p) = item else { continue };
            if !p.is_local() {
                continue;
            }
            let Some(name_tok) = p.name() else { continue };
            let name = name_tok.text().to_string();
            let id = self.symbols.add_symbol(inst_scope, SymbolKind::LocalParameter, Name::new(&name), Some(p.syntax().clone()));
            let value = match p.default_value() {
                Some(expr) => self.bind_and_eval(inst_scope, &expr, &env, None),
                None => ConstantValue::Error,
            };
            env.bind(Name::new(&name), value.clone());
            self.values.insert(id, value);
        }

        inst_scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_a_variable_and_evaluates_against_it() {
        let mut c = Compilation::new(CompilationOptions::new());
        c.eval_text("int i = 4;");
        let result = c.eval_text("i + 9");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(13));
    }

    #[test]
    fn folds_a_function_call_through_the_root_scope() {
        let mut c = Compilation::new(CompilationOptions::new());
        c.eval_text("function logic [15:0] foo(int a, int b); return a + b; endfunction");
        let result = c.eval_text("foo(3, 4)");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(7));
        assert_eq!(result.as_integer().unwrap().width(), 16);
    }

    #[test]
    fn elaborates_an_instance_and_resolves_its_hierarchical_parameter() {
        let mut c = Compilation::new(CompilationOptions::new());
        c.eval_text("module A #(parameter int P); localparam LP = P + 3; endmodule");
        c.eval_text("A #(.P(2)) a0();");
        let result = c.eval_text("a0.LP");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(5));
    }
}
