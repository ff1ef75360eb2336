//! Comment tokenizer.
//!
//! Turns the text of a comment (delimiters and `*` gutter already removed)
//! into a flat list of [`Token`]s. Tag classification is left to the parser;
//! the lexer only decides what *looks* like a tag, a brace, or code. Nothing
//! here can fail: anything unrecognized ends up as text.

use crate::token::{Token, TokenKind};

/// Tokenize the text of a comment.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).run()
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    tokens: Vec<Token>,

    // Pending text token
    buf: String,
    buf_pos: usize,

    // Only whitespace since the last line break
    line_start: bool,

    // End of the last escape sequence, an escaped char never starts a tag
    escape_end: Option<usize>,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn count_backticks(s: &str) -> usize {
    s.len() - s.trim_start_matches('`').len()
}

/// Length of the `@name` at the start of `s`, if there is one
fn tag_len(s: &str) -> Option<usize> {
    let name = s.strip_prefix('@')?;
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let len = name
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(name.len());
    Some(len + 1)
}

/// End of a fenced block opened by the `ticks` backticks at the start of `s`
fn fence_end(s: &str, ticks: usize) -> Option<usize> {
    let body = &s[ticks..];
    let mut search = 0;

    while let Some(nl) = body[search..].find('\n') {
        let line_begin = search + nl + 1;
        let line = &body[line_begin..];
        let trimmed = line.trim_start_matches(is_blank);
        let indent = line.len() - trimmed.len();
        let closing = count_backticks(trimmed);
        if closing >= ticks {
            return Some(ticks + line_begin + indent + closing);
        }
        search = line_begin;
    }

    None
}

/// End of an inline code span opened by the `ticks` backticks at the start
/// of `s`. Spans never cross a blank line.
fn span_end(s: &str, ticks: usize) -> Option<usize> {
    let body = &s[ticks..];
    let mut i = 0;

    while let Some(c) = body[i..].chars().next() {
        match c {
            '`' => {
                let run = count_backticks(&body[i..]);
                if run == ticks {
                    return Some(ticks + i + run);
                }
                i += run;
                continue;
            }
            '\n' => {
                let next = body[i + 1..].trim_start_matches(|c| is_blank(c) || c == '\r');
                if next.starts_with('\n') {
                    return None;
                }
            }
            _ => (),
        }
        i += c.len_utf8();
    }

    None
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer {
            text,
            pos: 0,
            tokens: Vec::new(),
            buf: String::new(),
            buf_pos: 0,
            line_start: true,
            escape_end: None,
        }
    }

    fn run(mut self) -> Vec<Token> {
        let text = self.text;
        while let Some(c) = text[self.pos..].chars().next() {
            let rest = &text[self.pos..];
            match c {
                '\n' => self.newline(1),
                '\r' if rest[1..].starts_with('\n') => self.newline(2),
                '\\' => self.escape(),
                '`' => self.backticks(),
                '@' => match tag_len(rest).filter(|_| self.at_tag_boundary()) {
                    Some(len) => self.tag(len),
                    None => self.push_char(c),
                },
                '{' => self.single(TokenKind::OpenBrace, "{"),
                '}' => self.single(TokenKind::CloseBrace, "}"),
                _ => self.push_char(c),
            }
        }

        self.flush();
        self.tokens
    }

    fn at_tag_boundary(&self) -> bool {
        if self.escape_end == Some(self.pos) {
            return false;
        }

        match self.text[..self.pos].chars().next_back() {
            None => true,
            Some(prev) => prev.is_whitespace() || prev == '{',
        }
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            let text = std::mem::take(&mut self.buf);
            self.tokens
                .push(Token::new(TokenKind::Text, text, self.buf_pos).with_end(self.pos));
        }
    }

    fn push_str(&mut self, s: &str, consumed: usize) {
        if self.buf.is_empty() {
            self.buf_pos = self.pos;
        }
        self.buf.push_str(s);
        self.pos += consumed;
    }

    fn push_char(&mut self, c: char) {
        if !c.is_whitespace() {
            self.line_start = false;
        }
        let mut tmp = [0; 4];
        self.push_str(c.encode_utf8(&mut tmp), c.len_utf8());
    }

    fn emit(&mut self, kind: TokenKind, text: &str) {
        self.flush();
        self.tokens.push(Token::new(kind, text, self.pos));
        self.pos += text.len();
    }

    fn single(&mut self, kind: TokenKind, text: &str) {
        self.line_start = false;
        self.emit(kind, text);
    }

    fn newline(&mut self, len: usize) {
        self.flush();
        self.tokens
            .push(Token::new(TokenKind::NewLine, "\n", self.pos).with_end(self.pos + len));
        self.pos += len;
        self.line_start = true;
    }

    fn escape(&mut self) {
        self.line_start = false;
        match self.text[self.pos + 1..].chars().next() {
            Some(c @ ('@' | '{' | '}')) => {
                let mut tmp = [0; 4];
                self.push_str(c.encode_utf8(&mut tmp), 2);
                self.escape_end = Some(self.pos);
            }
            // Left for markdown, but must not open a code span
            Some('`') => self.push_str("\\`", 2),
            _ => self.push_str("\\", 1),
        }
    }

    fn backticks(&mut self) {
        let text = self.text;
        let rest = &text[self.pos..];
        let ticks = count_backticks(rest);
        let end = if ticks >= 3 && self.line_start {
            fence_end(rest, ticks)
        } else {
            span_end(rest, ticks)
        };

        self.line_start = false;
        match end {
            Some(len) => self.emit(TokenKind::Code, &rest[..len]),
            None => self.push_str(&rest[..ticks], ticks),
        }
    }

    fn tag(&mut self, len: usize) {
        let text = self.text;
        let name = &text[self.pos..self.pos + len];
        self.single(TokenKind::Tag, name);
        if !self.in_inline_tag() {
            self.type_annotation();
        }
    }

    /// Whether the tag just emitted opens an inline tag
    fn in_inline_tag(&self) -> bool {
        match self.tokens.as_slice() {
            [.., brace, _] if brace.kind == TokenKind::OpenBrace => true,
            [.., brace, blank, _] => {
                brace.kind == TokenKind::OpenBrace
                    && blank.kind == TokenKind::Text
                    && blank.text.trim().is_empty()
            }
            _ => false,
        }
    }

    /// `@param {string} name`: a braced type right after a tag, closed on the
    /// same line and not an inline tag.
    fn type_annotation(&mut self) {
        let text = self.text;
        let rest = &text[self.pos..];
        let after = rest.trim_start_matches(is_blank);
        let blanks = rest.len() - after.len();

        if !after.starts_with('{') || after[1..].trim_start_matches(is_blank).starts_with('@') {
            return;
        }

        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in after.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i + 1);
                        break;
                    }
                }
                '\n' | '\r' => break,
                _ => (),
            }
        }

        if let Some(end) = end {
            if blanks > 0 {
                self.push_str(&rest[..blanks], blanks);
            }
            self.emit(TokenKind::TypeAnnotation, &after[..end]);
        }
    }
}
