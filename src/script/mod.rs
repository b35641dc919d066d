//! The scripting front-end (spec §6.1): a `ScriptSession` lets a caller
//! feed a `Compilation` one chunk of source text at a time — a
//! declaration, an instantiation, a bare expression — and read back
//! either the value that chunk evaluated to or the diagnostics it
//! produced, with every earlier chunk's declarations still in scope.
//!
//! This is deliberately a thin wrapper: all the actual elaboration lives
//! in `crate::compilation::Compilation`, which `add_syntax_tree`-style
//! batch compilation also drives. A `ScriptSession` is just "one
//! `Compilation`, evaluated incrementally."

use crate::binder::Diagnostic;
use crate::compilation::{Compilation, CompilationOptions};
use crate::eval::value::ConstantValue;

/// An incremental, single-`Compilation` evaluation session (spec §6.1).
/// Not `Sync`/`Send`-safe to share across threads — see the module's own
/// note on why a per-session `Compilation` isn't backed by `salsa`.
pub struct ScriptSession {
    compilation: Compilation,
}

impl ScriptSession {
    pub fn new() -> Self {
        Self::with_options(CompilationOptions::new())
    }

    pub fn with_options(options: CompilationOptions) -> Self {
        ScriptSession { compilation: Compilation::new(options) }
    }

    /// Parses and elaborates `text` against everything this session has
    /// already seen, returning the value of its last top-level expression
    /// (or `ConstantValue::Null` for a pure declaration, or
    /// `ConstantValue::Error` if nothing evaluated cleanly — check
    /// [`Self::diagnostics`] to tell those two apart).
    pub fn eval(&mut self, text: &str) -> ConstantValue {
        self.compilation.eval_text(text)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.compilation.diagnostics()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.compilation.take_diagnostics()
    }

    /// Escape hatch onto the underlying `Compilation` — for example to
    /// call `get_root()` and walk every symbol a session has declared.
    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }
}

impl Default for ScriptSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_declarations_across_eval_calls() {
        let mut session = ScriptSession::new();
        session.eval("int i = 4;");
        let result = session.eval("i + 9");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(13));
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn evaluates_a_bare_arithmetic_expression() {
        let mut session = ScriptSession::new();
        let result = session.eval("16'd10 * 16'd4");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(40));
    }

    #[test]
    fn calls_a_previously_declared_function() {
        let mut session = ScriptSession::new();
        session.eval("function int doubled(int x); return x * 2; endfunction");
        let result = session.eval("doubled(21)");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(42));
    }

    #[test]
    fn resolves_a_hierarchical_parameter_after_instantiation() {
        let mut session = ScriptSession::new();
        session.eval("module A #(parameter int P = 1); localparam LP = P + 3; endmodule");
        session.eval("A #(.P(2)) a0();");
        let result = session.eval("a0.LP");
        assert_eq!(result.as_integer().unwrap().to_u64(), Some(5));
    }

    #[test]
    fn reports_a_diagnostic_for_an_unknown_identifier() {
        let mut session = ScriptSession::new();
        session.eval("unknown_name + 1");
        assert!(!session.diagnostics().is_empty());
    }
}
