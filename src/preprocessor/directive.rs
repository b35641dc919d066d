//! Directive recognition errors (spec §4.2, §7).

use crate::base::SourceLocation;

/// The kind of a recognized `` ` `` directive, used by callers that want to
/// branch on directive shape without re-parsing its name text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Ifdef,
    Ifndef,
    Elsif,
    Else,
    Endif,
    Define,
    Undef,
    UndefineAll,
    Include,
    Line,
    Timescale,
    DefaultNettype,
    UnconnectedDrive,
    NoUnconnectedDrive,
    Celldefine,
    Endcelldefine,
    Resetall,
    Pragma,
    Protect,
}

/// A problem found while scanning/applying directives; always recoverable
/// (the preprocessor keeps going) and reported back through the
/// compilation's [`crate::compilation::DiagnosticBag`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectiveError {
    #[error("`endif directive with no matching `ifdef/`ifndef")]
    UnmatchedEndif(SourceLocation),
    #[error("`include nesting exceeded the configured maximum depth")]
    IncludeDepthExceeded(SourceLocation),
    #[error("macro expansion exceeded the configured maximum depth: `{0}")]
    MacroExpansionTooDeep(String),
    #[error("unknown compiler directive `{0} at {1:?}")]
    UnknownDirective(String, SourceLocation),
    #[error("`include file not found: {0}")]
    IncludeNotFound(String),
}
