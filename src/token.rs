use crate::model::LinkTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    NewLine,
    /// Inline code span or fenced block, kept verbatim
    Code,
    /// `@name`, classified by the parser
    Tag,
    /// Legacy JSDoc `{Type}` after a tag, always discarded
    TypeAnnotation,
    OpenBrace,
    CloseBrace,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,

    /// Byte offset of the token in the tokenized text
    pub pos: usize,

    /// Byte offset where the token's source span ends. Escapes make the span
    /// longer than `text`.
    pub end: usize,

    /// Set by symbol resolution for `@link` tags, never by the lexer
    pub link_target: Option<LinkTarget>,
    pub link_text: Option<String>,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, pos: usize) -> Self {
        let text = text.into();
        Token {
            kind,
            end: pos + text.len(),
            text,
            pos,
            link_target: None,
            link_text: None,
        }
    }

    pub fn with_end(mut self, end: usize) -> Self {
        self.end = end;
        self
    }

    /// Whether `text` is the verbatim source of the span
    pub fn is_verbatim(&self) -> bool {
        self.end - self.pos == self.text.len()
    }

    pub fn with_link_target(mut self, target: LinkTarget, text: Option<String>) -> Self {
        self.link_target = Some(target);
        self.link_text = text;
        self
    }
}
