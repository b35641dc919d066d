//! Binder diagnostics. Mirrors the shape of `parser::SyntaxError` (a message
//! plus a `TextRange`) so the two read as siblings; `crate::compilation`
//! re-exports both behind one typed diagnostic surface (spec §6.3).

use crate::base::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Error, message: message.into(), range }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Warning, message: message.into(), range }
    }

    pub fn note(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Note, message: message.into(), range }
    }
}
