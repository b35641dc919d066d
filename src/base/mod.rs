//! Foundation types for the front-end.
//!
//! Mirrors the teacher's `base` module (`FileId`, `Name`/`Interner`,
//! `TextRange`/`TextSize`, `Position`/`Span`) but replaces `FileId` with the
//! richer `BufferId`/`SourceLocation` pair spec §3.1 calls for, and adds the
//! arena primitive described in spec §9.

pub mod arena;
pub mod intern;
pub mod location;
pub mod position;

pub use arena::{Arena, Idx};
pub use intern::{Interner, Name};
pub use location::{BufferId, SourceLocation, SourceRange};
pub use position::{Position, Span};

// Re-export text-size types for convenience, as the teacher does; used for
// offsets *within* a single buffer's text (rowan's CST needs these), distinct
// from the cross-buffer `SourceLocation`.
pub use text_size::{TextRange, TextSize};
