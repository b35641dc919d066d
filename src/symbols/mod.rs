//! Symbols and scopes (spec §3.5): a `Symbol` carries kind, name, owning
//! scope, and a monotonic index; a `Scope` owns a name→symbol map populated
//! lazily, with lookup visibility governed by comparing indices.
//!
//! Mirrors the teacher's `semantic::symbol_table` (`Symbol`/`SymbolId` in
//! `symbol.rs`, `Scope` in `scope.rs`, the arena + lookup API in `table.rs`)
//! generalized onto this crate's `Idx<T>` arena (`base::arena`) in place of
//! the teacher's raw `usize` ids and `HashMap<String, SymbolId>`.
//!
//! **Division of responsibility for deferred members** (spec §3.5's
//! "first lookup ... triggers a deferred-members pass"): this module only
//! stores the mechanism — a scope's pending CST node and a materialized
//! flag — it does not itself run generate-for/`` `ifdef``/package-import
//! elaboration, since that requires constant evaluation and name
//! resolution (`crate::binder`, `crate::eval`) that would make `symbols`
//! depend on modules that themselves depend on `symbols`. `crate::compilation`
//! owns the actual materializer and calls [`SymbolTable::take_deferred`] /
//! [`SymbolTable::mark_materialized`] around it before every lookup that
//! scope might need.

use crate::base::{Arena, Idx, Name};
use crate::parser::syntax_kind::SyntaxNode;
use rustc_hash::FxHashMap;

pub type SymbolId = Idx<Symbol>;
pub type ScopeId = Idx<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Module,
    Interface,
    Program,
    Package,
    Class,
    Checker,
    Function,
    Task,
    Parameter,
    LocalParameter,
    Variable,
    Net,
    Typedef,
    Instance,
    FormalArgument,
    EnumValue,
    Field,
    GenerateBlock,
    Modport,
}

/// One named element (spec §3.5: kind, name, source location, owning
/// scope, index, next-sibling). The "next-sibling" link is realized as a
/// position in the owning `Scope`'s dense `members` vector rather than an
/// explicit pointer — the same trade the teacher's `Scope::symbols` map
/// makes by storing an ordered insertion sequence instead of linking
/// `Symbol`s to each other directly.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: Name,
    pub owner: ScopeId,
    /// Monotonically assigned as members are added to `owner`; spec §3.5's
    /// index-bounded visibility compares against this.
    pub index: usize,
    /// The declaring CST node, used both as the symbol's source location
    /// and as the binder's entry point for resolving its type/initializer
    /// the first time something asks.
    pub syntax: Option<SyntaxNode>,
    /// A child scope this symbol introduces (module/function/task/class
    /// body, generate block), if any.
    pub scope: Option<ScopeId>,
}

/// A lexical scope (spec §3.5). Lookup within one scope is index-bounded;
/// lookup that walks up to `parent` is not, matching spec §3.5's "visible
/// ... iff its index ≤ L or it is in an enclosing scope".
#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    members: Vec<SymbolId>,
    by_name: FxHashMap<Name, Vec<usize>>,
    deferred: Option<SyntaxNode>,
    materialized: bool,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            members: Vec::new(),
            by_name: FxHashMap::default(),
            deferred: None,
            materialized: true,
        }
    }

    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }

    pub fn needs_materialization(&self) -> bool {
        !self.materialized
    }
}

/// Per-`Compilation` owner of every `Symbol`/`Scope` (spec §9 arena
/// allocation: never freed individually, dropped with the owning table).
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Arena<Symbol>,
    scopes: Arena<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.alloc(Scope::new(parent))
    }

    /// A scope whose members are produced by a generate-like construct
    /// (spec §3.5) the caller hasn't walked yet. `needs_materialization`
    /// is `true` until `mark_materialized` is called.
    pub fn new_deferred_scope(&mut self, parent: Option<ScopeId>, deferred: SyntaxNode) -> ScopeId {
        let id = self.new_scope(parent);
        let scope = self.scopes.get_mut(id);
        scope.deferred = Some(deferred);
        scope.materialized = false;
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id)
    }

    pub fn get_scope(&self, id: ScopeId) -> &Scope {
        self.scopes.get(id)
    }

    /// Takes the pending CST node out of a deferred scope for the caller's
    /// materializer to walk. Returns `None` if the scope was never deferred
    /// or has already been taken.
    pub fn take_deferred(&mut self, scope: ScopeId) -> Option<SyntaxNode> {
        self.scopes.get_mut(scope).deferred.take()
    }

    pub fn mark_materialized(&mut self, scope: ScopeId) {
        self.scopes.get_mut(scope).materialized = true;
    }

    /// Appends a new member to `owner`, assigning it the next monotonic
    /// index in that scope (spec §3.5).
    pub fn add_symbol(
        &mut self,
        owner: ScopeId,
        kind: SymbolKind,
        name: Name,
        syntax: Option<SyntaxNode>,
    ) -> SymbolId {
        let index = self.scopes.get(owner).members.len();
        let id = self.symbols.alloc(Symbol {
            kind,
            name: name.clone(),
            owner,
            index,
            syntax,
            scope: None,
        });
        let scope = self.scopes.get_mut(owner);
        let position = scope.members.len();
        scope.members.push(id);
        scope.by_name.entry(name).or_default().push(position);
        id
    }

    /// Attaches a child scope to an already-added symbol (a module's port
    /// list and body, a function's locals, ...).
    pub fn set_symbol_scope(&mut self, symbol: SymbolId, scope: ScopeId) {
        self.symbols.get_mut(symbol).scope = Some(scope);
    }

    /// Index-bounded lookup within `scope` only, not following `parent`
    /// (spec §3.5: the most recent member named `name` whose index is
    /// `<= upto`). Returns the last-inserted match, since SystemVerilog
    /// redeclaration/shadowing within one scope always prefers the most
    /// recent visible binding.
    fn lookup_local(&self, scope: ScopeId, name: &str, upto: usize) -> Option<SymbolId> {
        let scope = self.scopes.get(scope);
        let positions = scope.by_name.get(name)?;
        positions
            .iter()
            .rev()
            .map(|&pos| scope.members[pos])
            .find(|&id| self.symbols.get(id).index <= upto)
    }

    /// Full index-bounded lookup (spec §3.5): searches `scope` restricted to
    /// `upto`, then walks enclosing scopes unrestricted (an enclosing
    /// scope's members are always visible regardless of position relative
    /// to the nested lookup site). Does **not** trigger deferred-members
    /// materialization — callers that need that call `crate::compilation`'s
    /// wrapper first.
    pub fn lookup_upto(&self, scope: ScopeId, name: &str, upto: usize) -> Option<SymbolId> {
        if let Some(found) = self.lookup_local(scope, name, upto) {
            return Some(found);
        }
        let mut current = self.scopes.get(scope).parent;
        while let Some(id) = current {
            if let Some(found) = self.lookup_local(id, name, usize::MAX) {
                return Some(found);
            }
            current = self.scopes.get(id).parent;
        }
        None
    }

    /// Convenience for callers outside the position-tracked flow (binding a
    /// module instance's type name, resolving a hierarchical root) where
    /// every member of the target scope is visible regardless of order.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.lookup_upto(scope, name, usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_symbol_is_not_visible_before_its_index() {
        let mut table = SymbolTable::new();
        let scope = table.new_scope(None);
        let a = table.add_symbol(scope, SymbolKind::Variable, "a".into(), None);
        let b = table.add_symbol(scope, SymbolKind::Variable, "b".into(), None);
        let a_index = table.get(a).index;
        assert_eq!(table.lookup_upto(scope, "a", a_index), Some(a));
        assert_eq!(table.lookup_upto(scope, "b", a_index), None);
        assert_eq!(table.lookup_upto(scope, "b", table.get(b).index), Some(b));
    }

    #[test]
    fn enclosing_scope_members_are_unconditionally_visible() {
        let mut table = SymbolTable::new();
        let outer = table.new_scope(None);
        let p = table.add_symbol(outer, SymbolKind::Parameter, "P".into(), None);
        let inner = table.new_scope(Some(outer));
        // Nothing has been added to `inner` yet, but `P` from `outer` must
        // still resolve regardless of the (trivial) upto bound used here.
        assert_eq!(table.lookup_upto(inner, "P", 0), Some(p));
    }

    #[test]
    fn redeclaration_in_the_same_scope_prefers_the_most_recent() {
        let mut table = SymbolTable::new();
        let scope = table.new_scope(None);
        let _first = table.add_symbol(scope, SymbolKind::Variable, "x".into(), None);
        let second = table.add_symbol(scope, SymbolKind::Variable, "x".into(), None);
        assert_eq!(table.lookup(scope, "x"), Some(second));
    }

    #[test]
    fn deferred_scope_reports_unmaterialized_until_marked() {
        let mut table = SymbolTable::new();
        let root = table.new_scope(None);
        let node = crate::parser::parse_source_file_text("module m; endmodule").syntax();
        let deferred = table.new_deferred_scope(Some(root), node);
        assert!(table.get_scope(deferred).needs_materialization());
        assert!(table.take_deferred(deferred).is_some());
        assert!(table.take_deferred(deferred).is_none());
        table.mark_materialized(deferred);
        assert!(!table.get_scope(deferred).needs_materialization());
    }
}
