//! `SourceManager`: buffer/location service (spec §4.1).
//!
//! Shared by multiple parser threads; a `parking_lot::RwLock` protects the
//! buffer table, include-directory lists, and the canonical-path cache, the
//! way the teacher reaches for `parking_lot` anywhere shared mutable state
//! needs cheap, fair locking. Buffer byte contents are `Arc<str>` so a
//! reader that has already cloned one out of the table never needs the lock
//! again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::base::{BufferId, Name, Position, SourceLocation, SourceRange};

use super::buffer::{BufferData, BufferKind, LineDirective, SourceBuffer};

struct State {
    buffers: Vec<BufferData>,
    path_cache: FxHashMap<PathBuf, BufferId>,
    include_dirs_user: Vec<PathBuf>,
    include_dirs_system: Vec<PathBuf>,
    /// Buffers created in-memory via `assign_text` with an explicit name,
    /// searchable by `read_header` the same way a user include directory is.
    named_memory_buffers: FxHashMap<String, BufferId>,
    synthetic_counter: u32,
}

impl State {
    fn alloc_buffer(&mut self, data: BufferData) -> BufferId {
        let raw = self.buffers.len() as u32;
        self.buffers.push(data);
        BufferId::from_raw(raw)
    }
}

/// Buffer/location service: creates buffers, resolves includes, encodes and
/// decodes `SourceLocation`s, and remaps line numbers for `` `line`` directives.
pub struct SourceManager {
    state: parking_lot::RwLock<State>,
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            state: parking_lot::RwLock::new(State {
                buffers: Vec::new(),
                path_cache: FxHashMap::default(),
                include_dirs_user: Vec::new(),
                include_dirs_system: Vec::new(),
                named_memory_buffers: FxHashMap::default(),
                synthetic_counter: 0,
            }),
        }
    }

    pub fn add_user_include_dir(&self, dir: impl Into<PathBuf>) {
        self.state.write().include_dirs_user.push(dir.into());
    }

    pub fn add_system_include_dir(&self, dir: impl Into<PathBuf>) {
        self.state.write().include_dirs_system.push(dir.into());
    }

    /// Load a file from disk, canonicalizing and caching by canonical path.
    /// Returns the existing buffer if this path was already loaded.
    pub fn read_source(&self, path: impl AsRef<Path>) -> SourceBuffer {
        let path = path.as_ref();
        let canonical = match std::fs::canonicalize(path) {
            Ok(p) => p,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "read_source: canonicalize failed");
                return SourceBuffer::EMPTY;
            }
        };

        {
            let state = self.state.read();
            if let Some(&id) = state.path_cache.get(&canonical) {
                return SourceBuffer::new(id);
            }
        }

        let bytes = match std::fs::read(&canonical) {
            Ok(b) => b,
            Err(err) => {
                warn!(path = %canonical.display(), error = %err, "read_source: read failed");
                return SourceBuffer::EMPTY;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(err) => {
                warn!(path = %canonical.display(), error = %err, "read_source: non-UTF-8 bytes");
                return SourceBuffer::EMPTY;
            }
        };

        let mut state = self.state.write();
        // Re-check under the write lock: another thread may have loaded it
        // while we were reading the file.
        if let Some(&id) = state.path_cache.get(&canonical) {
            return SourceBuffer::new(id);
        }
        let data = BufferData::file(
            Arc::from(text.as_str()),
            canonical.clone(),
            SourceLocation::NONE,
        );
        let id = state.alloc_buffer(data);
        state.path_cache.insert(canonical.clone(), id);
        debug!(path = %canonical.display(), buffer = ?id, "read_source: loaded");
        SourceBuffer::new(id)
    }

    /// Resolve an `` `include`` directive: system includes search only the
    /// system dirs; user includes search (a) the including file's directory,
    /// (b) user include dirs, (c) named in-memory buffers.
    pub fn read_header(
        &self,
        path: &str,
        included_from: SourceLocation,
        is_system: bool,
    ) -> SourceBuffer {
        let search_dirs: Vec<PathBuf> = {
            let state = self.state.read();
            if is_system {
                state.include_dirs_system.clone()
            } else {
                let mut dirs = Vec::new();
                if let Some(buffer) = included_from.buffer() {
                    if let Some(name) = state.buffers[buffer.index_usize()].file_name() {
                        if let Some(parent) = name.parent() {
                            dirs.push(parent.to_path_buf());
                        }
                    }
                }
                dirs.extend(state.include_dirs_user.iter().cloned());
                dirs
            }
        };

        for dir in &search_dirs {
            let candidate = dir.join(path);
            if candidate.is_file() {
                let buf = self.read_source(&candidate);
                if buf.is_valid() {
                    return buf;
                }
            }
        }

        if !is_system {
            let state = self.state.read();
            if let Some(&id) = state.named_memory_buffers.get(path) {
                return SourceBuffer::new(id);
            }
        }

        warn!(path, "read_header: not found on any search path");
        SourceBuffer::EMPTY
    }

    /// Create a named (or synthetic-named) in-memory buffer.
    pub fn assign_text(
        &self,
        path: Option<&str>,
        text: &str,
        included_from: Option<SourceLocation>,
    ) -> SourceBuffer {
        let mut state = self.state.write();
        let name = match path {
            Some(p) => PathBuf::from(p),
            None => {
                state.synthetic_counter += 1;
                PathBuf::from(format!("<unnamed-{}>", state.synthetic_counter))
            }
        };
        let data = BufferData::file(
            Arc::from(text),
            name.clone(),
            included_from.unwrap_or(SourceLocation::NONE),
        );
        let id = state.alloc_buffer(data);
        if let Some(p) = path {
            state.named_memory_buffers.insert(p.to_string(), id);
        }
        SourceBuffer::new(id)
    }

    /// Allocate a macro-expansion buffer; `original` is the macro body (or
    /// argument) definition location, `expansion_range` is the invocation
    /// site in the *calling* buffer.
    pub fn create_expansion_loc(
        &self,
        original: SourceLocation,
        expansion_range: SourceRange,
        is_macro_arg: bool,
        macro_name: Option<Name>,
    ) -> SourceLocation {
        let mut state = self.state.write();
        let text = if let Some(buf) = original.buffer() {
            state.buffers[buf.index_usize()].text.clone()
        } else {
            Arc::from("")
        };
        let data = BufferData::expansion(
            text,
            original,
            expansion_range,
            is_macro_arg,
            macro_name,
        );
        let id = state.alloc_buffer(data);
        SourceLocation::new(id, 0)
    }

    pub fn get_source_text(&self, buffer: BufferId) -> Arc<str> {
        self.state.read().buffers[buffer.index_usize()].text.clone()
    }

    pub fn is_file_loc(&self, loc: SourceLocation) -> bool {
        match loc.buffer() {
            Some(b) => self.state.read().buffers[b.index_usize()].is_file(),
            None => false,
        }
    }

    pub fn is_macro_loc(&self, loc: SourceLocation) -> bool {
        match loc.buffer() {
            Some(b) => matches!(
                self.state.read().buffers[b.index_usize()].kind,
                BufferKind::Expansion { .. }
            ),
            None => false,
        }
    }

    pub fn is_macro_arg_loc(&self, loc: SourceLocation) -> bool {
        match loc.buffer() {
            Some(b) => matches!(
                self.state.read().buffers[b.index_usize()].kind,
                BufferKind::Expansion { is_macro_arg: true, .. }
            ),
            None => false,
        }
    }

    pub fn is_preprocessed_loc(&self, loc: SourceLocation) -> bool {
        self.is_macro_loc(loc)
    }

    pub fn get_macro_name(&self, loc: SourceLocation) -> Option<Name> {
        let buf = loc.buffer()?;
        match &self.state.read().buffers[buf.index_usize()].kind {
            BufferKind::Expansion { macro_name, .. } => macro_name.clone(),
            BufferKind::File { .. } => None,
        }
    }

    pub fn get_included_from(&self, loc: SourceLocation) -> SourceLocation {
        let Some(buf) = loc.buffer() else {
            return SourceLocation::NONE;
        };
        match &self.state.read().buffers[buf.index_usize()].kind {
            BufferKind::File { include_parent, .. } => *include_parent,
            BufferKind::Expansion { .. } => SourceLocation::NONE,
        }
    }

    /// One step up the expansion chain: the location of the macro invocation
    /// that produced `loc`, or `loc` unchanged if it is not a macro location.
    pub fn get_expansion_loc(&self, loc: SourceLocation) -> SourceLocation {
        let Some(buf) = loc.buffer() else {
            return loc;
        };
        match &self.state.read().buffers[buf.index_usize()].kind {
            BufferKind::Expansion { expansion_range, .. } => expansion_range.start,
            BufferKind::File { .. } => loc,
        }
    }

    /// One step up the expansion chain: the location inside the macro
    /// definition (or argument) that `loc` came from.
    pub fn get_original_loc(&self, loc: SourceLocation) -> SourceLocation {
        let Some(buf) = loc.buffer() else {
            return loc;
        };
        match &self.state.read().buffers[buf.index_usize()].kind {
            BufferKind::Expansion { original, .. } => original.offset_by(loc.offset()),
            BufferKind::File { .. } => loc,
        }
    }

    /// Walk expansion parents until reaching a file buffer, returning the
    /// invocation-site location (for diagnostics that should point at user
    /// code rather than inside a macro body).
    pub fn get_fully_expanded_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while self.is_macro_loc(loc) {
            loc = self.get_expansion_loc(loc);
        }
        loc
    }

    /// Walk original-location parents until reaching a file buffer or a
    /// macro-argument buffer (whose original traces back to the call site
    /// in user code, per spec §4.3).
    pub fn get_fully_original_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while self.is_macro_loc(loc) {
            loc = self.get_original_loc(loc);
        }
        loc
    }

    /// Chain of file/expansion buffer ids from `loc`'s buffer up to its file
    /// root, root first.
    fn provenance_chain(&self, mut loc: SourceLocation) -> Vec<BufferId> {
        let mut chain = Vec::new();
        loop {
            let Some(buf) = loc.buffer() else { break };
            chain.push(buf);
            let state = self.state.read();
            let parent = match &state.buffers[buf.index_usize()].kind {
                BufferKind::File { include_parent, .. } => *include_parent,
                BufferKind::Expansion { expansion_range, .. } => expansion_range.start,
            };
            drop(state);
            if parent.is_none() {
                break;
            }
            loc = parent;
        }
        chain.reverse();
        chain
    }

    /// Total order on locations sharing a common root file (spec §3.1,
    /// invariant 3 in spec §8): walk both provenance chains to their common
    /// ancestor buffer, then compare offsets within it (or expansion-site
    /// offsets if the divergence is below the common ancestor).
    pub fn is_before_in_compilation_unit(&self, a: SourceLocation, b: SourceLocation) -> bool {
        if a == b {
            return false;
        }
        let chain_a = self.provenance_chain(a);
        let chain_b = self.provenance_chain(b);

        let mut common_len = 0;
        while common_len < chain_a.len()
            && common_len < chain_b.len()
            && chain_a[common_len] == chain_b[common_len]
        {
            common_len += 1;
        }

        if common_len == 0 {
            // No shared root; fall back to buffer id order (deterministic,
            // if not meaningful across unrelated compilation units).
            return a.buffer().map(|b| b.raw()) < b.buffer().map(|b| b.raw());
        }

        // If one chain is a prefix of the other, the shorter one's location
        // at the point of divergence is an ancestor and therefore earlier.
        if common_len == chain_a.len() || common_len == chain_b.len() {
            return chain_a.len() < chain_b.len()
                || (chain_a.len() == chain_b.len() && a.offset() < b.offset());
        }

        let diverge_buf_a = chain_a[common_len];
        let diverge_buf_b = chain_b[common_len];
        if diverge_buf_a == diverge_buf_b {
            return a.offset() < b.offset();
        }

        // Compare the offsets, within the common ancestor buffer, at which
        // each chain's next hop (an include or macro invocation) occurs.
        let offset_in_ancestor = |buf: BufferId| -> usize {
            let state = self.state.read();
            match &state.buffers[buf.index_usize()].kind {
                BufferKind::File { include_parent, .. } => include_parent.offset(),
                BufferKind::Expansion { expansion_range, .. } => expansion_range.start.offset(),
            }
        };
        offset_in_ancestor(diverge_buf_a) < offset_in_ancestor(diverge_buf_b)
    }

    pub fn get_file_name(&self, loc: SourceLocation) -> Option<PathBuf> {
        let buf = self.get_fully_expanded_loc(loc).buffer()?;
        self.state.read().buffers[buf.index_usize()]
            .file_name()
            .map(|p| p.to_path_buf())
    }

    /// 1-based line number, after applying any `` `line`` remap installed on
    /// this buffer (spec §4.1).
    pub fn get_line_number(&self, loc: SourceLocation) -> u32 {
        let Some(buf) = loc.buffer() else { return 0 };
        let mut state = self.state.write();
        let offset = loc.offset() as u32;
        let raw_line = {
            let offsets = state.buffers[buf.index_usize()].ensure_line_offsets();
            match offsets.binary_search(&offset) {
                Ok(i) => (i + 1) as u32,
                Err(i) => i as u32,
            }
        };
        remap_line(&state.buffers[buf.index_usize()].line_directives, raw_line)
    }

    /// 1-based column number.
    pub fn get_column_number(&self, loc: SourceLocation) -> u32 {
        let Some(buf) = loc.buffer() else { return 0 };
        let mut state = self.state.write();
        let offset = loc.offset() as u32;
        let offsets = state.buffers[buf.index_usize()].ensure_line_offsets();
        let line_start = match offsets.binary_search(&offset) {
            Ok(i) => offsets[i],
            Err(i) => offsets[i - 1],
        };
        offset - line_start + 1
    }

    /// Install a `` `line`` remap. Line directives for a buffer are kept
    /// sorted by in-file raw line number.
    pub fn add_line_directive(&self, loc: SourceLocation, line_num: u32, _new_name: Option<String>, level: u8) {
        let Some(buf) = loc.buffer() else { return };
        let mut state = self.state.write();
        let raw_line = {
            let offsets = state.buffers[buf.index_usize()].ensure_line_offsets();
            let offset = loc.offset() as u32;
            match offsets.binary_search(&offset) {
                Ok(i) => (i + 1) as u32,
                Err(i) => i as u32,
            }
        };
        let directives = &mut state.buffers[buf.index_usize()].line_directives;
        let directive = LineDirective {
            raw_line,
            new_line: line_num,
            level,
        };
        let pos = directives
            .binary_search_by_key(&raw_line, |d| d.raw_line)
            .unwrap_or_else(|e| e);
        directives.insert(pos, directive);
    }

    pub fn position_of(&self, loc: SourceLocation) -> Position {
        Position::new(self.get_line_number(loc), self.get_column_number(loc))
    }
}

/// `new_line = directive.new_line + (raw_line - directive.raw_line) - 1`,
/// using the nearest preceding directive (binary search), per spec §4.1.
fn remap_line(directives: &[LineDirective], raw_line: u32) -> u32 {
    match directives.binary_search_by_key(&raw_line, |d| d.raw_line) {
        Ok(i) => directives[i].new_line,
        Err(0) => raw_line,
        Err(i) => {
            let d = &directives[i - 1];
            d.new_line + (raw_line - d.raw_line) - 1
        }
    }
}

impl BufferId {
    fn index_usize(self) -> usize {
        self.raw() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_text_round_trips() {
        let sm = SourceManager::new();
        let buf = sm.assign_text(None, "module m; endmodule\n", None);
        assert!(buf.is_valid());
        let id = buf.id().unwrap();
        assert_eq!(&*sm.get_source_text(id), "module m; endmodule\n");
    }

    #[test]
    fn line_and_column_numbers() {
        let sm = SourceManager::new();
        let buf = sm.assign_text(None, "a\nbb\nccc", None).id().unwrap();
        let loc_line2 = SourceLocation::new(buf, 2); // 'b' at offset 2
        assert_eq!(sm.get_line_number(loc_line2), 2);
        assert_eq!(sm.get_column_number(loc_line2), 1);
        let loc_line3 = SourceLocation::new(buf, 7); // second 'c'
        assert_eq!(sm.get_line_number(loc_line3), 3);
        assert_eq!(sm.get_column_number(loc_line3), 2);
    }

    #[test]
    fn missing_file_is_empty_buffer() {
        let sm = SourceManager::new();
        let buf = sm.read_source("/does/not/exist/anywhere.sv");
        assert!(!buf.is_valid());
    }

    #[test]
    fn line_directive_remaps_reported_line() {
        let sm = SourceManager::new();
        let buf = sm.assign_text(None, "one\ntwo\nthree\nfour\n", None).id().unwrap();
        // Installed at the start of line 2; claims line 2 is now "line 100".
        sm.add_line_directive(SourceLocation::new(buf, 4), 100, None, 0);
        let loc_line3 = SourceLocation::new(buf, 8); // 't' of "three"
        assert_eq!(sm.get_line_number(loc_line3), 101);
    }

    #[test]
    fn before_in_compilation_unit_is_strict_order_within_one_buffer() {
        let sm = SourceManager::new();
        let buf = sm.assign_text(None, "abcdef", None).id().unwrap();
        let a = SourceLocation::new(buf, 0);
        let b = SourceLocation::new(buf, 3);
        assert!(sm.is_before_in_compilation_unit(a, b));
        assert!(!sm.is_before_in_compilation_unit(b, a));
        assert!(!sm.is_before_in_compilation_unit(a, a));
    }

    #[test]
    fn expansion_buffers_trace_back_to_argument_site() {
        let sm = SourceManager::new();
        let file = sm.assign_text(None, "FOO(x)", None).id().unwrap();
        let arg_site = SourceRange::new(
            SourceLocation::new(file, 4),
            SourceLocation::new(file, 5),
        );
        let expansion_loc = sm.create_expansion_loc(
            arg_site.start,
            arg_site,
            true,
            None,
        );
        assert!(sm.is_macro_arg_loc(expansion_loc));
        assert_eq!(sm.get_fully_original_loc(expansion_loc).buffer(), Some(file));
    }
}
