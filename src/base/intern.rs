//! String interning.
//!
//! Adapted from the teacher's `core::interner::Interner`, which deduplicated
//! strings behind `Rc<str>`. Identifier strings recur constantly across a
//! `Compilation` (every use of a net name, every member access), so here we
//! use `SmolStr` (inline storage up to 23 bytes, heap beyond that) as the
//! interned handle and an `FxHashSet` (the teacher's `rustc-hash` dependency)
//! as the dedup table, since most SystemVerilog identifiers are short.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// An interned name — cheap to clone and compare.
pub type Name = SmolStr;

/// Deduplicates identifier strings within one [`crate::compilation::Compilation`].
#[derive(Debug, Default)]
pub struct Interner {
    strings: FxHashSet<SmolStr>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the shared, cheaply-clonable handle.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(existing) = self.strings.get(s) {
            return existing.clone();
        }
        let name = SmolStr::new(s);
        self.strings.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_twice_dedups() {
        let mut interner = Interner::new();
        let a = interner.intern("clk");
        let b = interner.intern("clk");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn interning_distinct_strings() {
        let mut interner = Interner::new();
        interner.intern("clk");
        interner.intern("rst_n");
        assert_eq!(interner.len(), 2);
    }
}
