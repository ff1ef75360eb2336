use crate::model::LinkTarget;
use crate::token::{Token, TokenKind};

/// A read position in the token list: the current token and how many bytes
/// of its text have already been consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    index: usize,
    offset: usize,
}

/// The unconsumed part of a token.
#[derive(Clone, Copy, Debug)]
pub struct TokenView<'t> {
    token: &'t Token,
    offset: usize,
}

impl<'t> TokenView<'t> {
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    pub fn text(&self) -> &'t str {
        &self.token.text[self.offset..]
    }

    /// Source offset of the unconsumed part. Text shortened by escapes has no
    /// per-char mapping, so a partly consumed escaped token maps to its start.
    pub fn pos(&self) -> usize {
        if self.token.is_verbatim() {
            self.token.pos + self.offset
        } else {
            self.token.pos
        }
    }

    /// Source offset just past the token
    pub fn end(&self) -> usize {
        self.token.end
    }

    pub fn link_target(&self) -> Option<&'t LinkTarget> {
        self.token.link_target.as_ref()
    }

    pub fn link_text(&self) -> Option<&'t str> {
        self.token.link_text.as_deref()
    }
}

/// Lookahead over a token list with one level of backtracking.
///
/// `mark()` remembers the current position, `release()` jumps back to it.
/// Only one mark can be active at a time.
pub struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
    offset: usize,
    mark: Option<Checkpoint>,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Cursor {
            tokens,
            index: 0,
            offset: 0,
            mark: None,
        }
    }

    pub fn done(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn peek(&self) -> TokenView<'t> {
        assert!(!self.done(), "peek() past the end of the token stream");
        TokenView {
            token: &self.tokens[self.index],
            offset: self.offset,
        }
    }

    pub fn take(&mut self) -> TokenView<'t> {
        let view = self.peek();
        self.index += 1;
        self.offset = 0;
        view
    }

    /// Consume the first `len` bytes of the current token's remaining text,
    /// leaving the rest to be read by the next `peek()`/`take()`.
    pub fn consume_prefix(&mut self, len: usize) {
        let remaining = self.peek().text();
        assert!(
            remaining.is_char_boundary(len),
            "consume_prefix() outside of the current token"
        );

        if len == remaining.len() {
            self.index += 1;
            self.offset = 0;
        } else {
            self.offset += len;
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            index: self.index,
            offset: self.offset,
        }
    }

    /// Whether the cursor has reached `end` (or the end of input)
    pub fn at(&self, end: Checkpoint) -> bool {
        self.done() || self.checkpoint() == end
    }

    pub fn mark(&mut self) {
        assert!(
            self.mark.is_none(),
            "Can only mark one location for backtracking at a time"
        );
        self.mark = Some(self.checkpoint());
    }

    pub fn release(&mut self) {
        let Some(mark) = self.mark.take() else {
            panic!("release() called without an active mark");
        };
        self.index = mark.index;
        self.offset = mark.offset;
    }
}
