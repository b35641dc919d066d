//! # slang-front
//!
//! A SystemVerilog (IEEE 1800) front-end: source management, directive-aware
//! preprocessing, lossless CST parsing, and constant expression evaluation.
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! binder       → AST → ConstExpr/ConstStmt, context-determined widths
//!   ↓
//! symbols      → Lexically-scoped symbol tables, index-bounded visibility
//!   ↓
//! types        → The closed type sum and its four type relations
//!   ↓
//! parser       → Lexer's output reparsed into a rowan CST, plus typed AST
//!   ↓
//! preprocessor → `` ` ``-directive handling, macro expansion
//!   ↓
//! lexer        → Directive-aware tokenization
//!   ↓
//! eval         → Four-state bignum arithmetic, constant expression folding
//!   ↓
//! source       → Buffers, line/column tracking, macro-expansion provenance
//!   ↓
//! base         → Primitives: BufferId, SourceLocation, Name interning
//! ```
//!
//!
//! Above `compilation` sit the scripting front-end (`script`), the
//! optional JSON serializer (`serialize`, behind the `serialize`
//! feature), and the pretty-printer (`pretty`) — spec §6.

/// Foundation types: BufferId, SourceLocation, Name interning, arenas.
pub mod base;

/// Source buffer management: text storage, line/column mapping, provenance.
pub mod source;

/// Four-state arbitrary-precision integers and constant expression folding.
pub mod eval;

/// Directive-aware tokenization built on `logos`.
pub mod lexer;

/// `` ` ``-directive handling and macro expansion.
pub mod preprocessor;

/// Recursive-descent parsing into a lossless `rowan` CST, plus typed AST.
pub mod parser;

/// The closed type sum and the four type relations (spec §3.4).
pub mod types;

/// Symbols and lexically-scoped symbol tables (spec §3.5).
pub mod symbols;

/// AST → constant-foldable `ConstExpr`/`ConstStmt` trees, with
/// context-determined width/signedness equalization (spec §3.6, §4.5).
pub mod binder;

/// The root container a script or batch compile elaborates against:
/// symbol/type arenas, eager scope population, lazy memoized per-symbol
/// elaboration (spec §4.5, §6.1).
pub mod compilation;

/// Incremental per-chunk evaluation over one `Compilation` (spec §6.1).
pub mod script;

/// Serializable AST/symbol-table JSON output (spec §6.4).
#[cfg(feature = "serialize")]
pub mod serialize;

/// Renders a parsed syntax tree back to source text (spec §6.5).
pub mod pretty;

// Re-export the foundation types callers reach for constantly.
pub use base::{BufferId, Name, SourceLocation, SourceRange};
pub use source::SourceManager;
