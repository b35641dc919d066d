//! Low-level recursive-descent driver (spec §4.3): a token cursor over a
//! flat slice plus a rowan [`GreenNodeBuilder`], producing a lossless CST —
//! every trivia token, every skipped/error token, ends up somewhere in the
//! tree (spec §3.2 invariant).
//!
//! Structured like the teacher's `parser::parser::Parser`: `tokens`/`pos`
//! cursor, `builder`/`start_node`/`finish_node`, `at`/`nth`/`bump`/`eat`/
//! `expect`, `error`/`error_recover`. Grammar modules under
//! [`crate::parser::grammar`] call these directly rather than through a
//! trait indirection layer, since (unlike the teacher, which parses two
//! related-but-distinct languages from one `Parser`) this parser only ever
//! targets one grammar.

use super::syntax_kind::SyntaxKind;
use crate::preprocessor::PpToken;
use rowan::{GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

/// One diagnosable parse problem: an expected construct wasn't found, or an
/// unexpected token had to be skipped to resynchronize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// The result of parsing one buffer: a green tree (lossless — reconstructing
/// it yields the exact original text) plus any syntax errors found along the
/// way.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn syntax(&self) -> super::syntax_kind::SyntaxNode {
        super::syntax_kind::SyntaxNode::new_root(self.green.clone())
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) struct Parser<'a> {
    tokens: &'a [PpToken],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [PpToken]) -> Self {
        Parser {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // -- token inspection -----------------------------------------------

    fn current(&self) -> Option<&PpToken> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR_NODE)
    }

    pub(crate) fn current_text(&self) -> &str {
        self.current().map(|t| t.text.as_str()).unwrap_or("")
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Looks ahead to the `n`th non-trivia token from the cursor (`n == 0`
    /// is the current token).
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR_NODE
    }

    // -- token consumption ------------------------------------------------

    pub(crate) fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), &token.text);
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            let expected = super::kind_to_name(kind);
            let found = self
                .current()
                .map(|t| super::kind_to_name(t.kind))
                .unwrap_or("end of file");
            self.error(format!("expected {expected}, found {found}"));
            false
        }
    }

    pub(crate) fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // -- error handling ----------------------------------------------------

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| {
                let start = TextSize::try_from(t.location.offset() as u32).unwrap_or_default();
                TextRange::at(start, TextSize::of(t.text.as_str()))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Wraps unexpected tokens in an `ERROR_NODE` and advances until `recovery`
    /// (or EOF), guaranteeing forward progress even when `recovery` matches
    /// the very next token.
    pub(crate) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR_NODE);
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // -- node building ------------------------------------------------------

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// A checkpoint to retroactively wrap already-emitted nodes/tokens in a
    /// new parent (used for left-recursive constructs like binary
    /// expressions, where the left operand is parsed before we know whether
    /// it needs wrapping).
    pub(crate) fn checkpoint(&self) -> rowan::Checkpoint {
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }
}
