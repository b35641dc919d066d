//! Buffer storage: file buffers and macro-expansion buffers (spec §3.1).

use crate::base::{BufferId, Name, SourceLocation, SourceRange};
use std::path::PathBuf;
use std::sync::Arc;

/// What kind of buffer this is, and the provenance that distinguishes it.
#[derive(Debug, Clone)]
pub enum BufferKind {
    /// Holds a read-only byte array and a canonical file name.
    File {
        name: PathBuf,
        /// Location of the `` `include`` directive that pulled this file in,
        /// or `SourceLocation::NONE` for a root compilation-unit file.
        include_parent: SourceLocation,
    },
    /// Holds the original (definition) location, the range at the macro
    /// invocation site, and whether this buffer is a macro argument's
    /// expansion rather than the macro body's.
    Expansion {
        original: SourceLocation,
        expansion_range: SourceRange,
        is_macro_arg: bool,
        macro_name: Option<Name>,
    },
}

/// One entry in the `SourceManager`'s buffer table.
#[derive(Debug, Clone)]
pub struct BufferData {
    pub kind: BufferKind,
    /// Immutable byte contents, shared via `Arc` so readers never need the
    /// manager's lock once they hold a clone of it (spec §4.1 concurrency).
    pub text: Arc<str>,
    /// Byte offsets of the start of each line; computed lazily on first
    /// line-number query, per spec §4.1.
    pub line_offsets: Option<Vec<u32>>,
    /// Sorted (by in-file raw line) `` `line`` directives installed on this buffer.
    pub line_directives: Vec<LineDirective>,
}

#[derive(Debug, Clone, Copy)]
pub struct LineDirective {
    /// 1-based raw (pre-remap) line number the directive appears on.
    pub raw_line: u32,
    /// The line number to report from this point on.
    pub new_line: u32,
    pub level: u8,
}

impl BufferData {
    pub fn file(text: Arc<str>, name: PathBuf, include_parent: SourceLocation) -> Self {
        Self {
            kind: BufferKind::File {
                name,
                include_parent,
            },
            text,
            line_offsets: None,
            line_directives: Vec::new(),
        }
    }

    pub fn expansion(
        text: Arc<str>,
        original: SourceLocation,
        expansion_range: SourceRange,
        is_macro_arg: bool,
        macro_name: Option<Name>,
    ) -> Self {
        Self {
            kind: BufferKind::Expansion {
                original,
                expansion_range,
                is_macro_arg,
                macro_name,
            },
            text,
            line_offsets: None,
            line_directives: Vec::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, BufferKind::File { .. })
    }

    pub fn file_name(&self) -> Option<&std::path::Path> {
        match &self.kind {
            BufferKind::File { name, .. } => Some(name),
            BufferKind::Expansion { .. } => None,
        }
    }

    /// Compute (and cache) the offset-of-each-line table for this buffer.
    pub(crate) fn ensure_line_offsets(&mut self) -> &[u32] {
        if self.line_offsets.is_none() {
            let mut offsets = vec![0u32];
            for (i, b) in self.text.bytes().enumerate() {
                if b == b'\n' {
                    offsets.push((i + 1) as u32);
                }
            }
            self.line_offsets = Some(offsets);
        }
        self.line_offsets.as_deref().unwrap()
    }
}

/// A handle to a buffer created by a `SourceManager`, or the empty/"false"
/// value spec §4.1 uses to signal a read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceBuffer(Option<BufferId>);

impl SourceBuffer {
    pub(crate) fn new(id: BufferId) -> Self {
        SourceBuffer(Some(id))
    }

    pub const EMPTY: SourceBuffer = SourceBuffer(None);

    pub fn id(self) -> Option<BufferId> {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_some()
    }
}

impl From<SourceBuffer> for bool {
    fn from(buf: SourceBuffer) -> bool {
        buf.is_valid()
    }
}
