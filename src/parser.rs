use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{CommentParserConfig, TagTable};
use crate::cursor::{Checkpoint, Cursor, TokenView};
use crate::diagnostic::{DiagnosticSink, Message, SourceFile};
use crate::lexer::tokenize;
use crate::model::{Comment, CommentTag, DisplayPart};
use crate::token::{Token, TokenKind};
use crate::validation;

pub(crate) const INHERIT_DOC: &str = "@inheritDoc";
const EXAMPLE: &str = "@example";

const ALIASED_TAGS: &[(&str, &str)] = &[("@return", "@returns")];

static CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<caption>(.*?)</caption>\s*(\n|$)").unwrap());

fn make_code_block(text: &str) -> String {
    format!("```ts\n{}\n```", text)
}

/// Parses comment token streams into [`Comment`]s.
///
/// The tag tables are built once from the configuration; a parser can then
/// be shared between threads, each parse reporting into its own sink.
///
/// Example:
/// ```
/// use doc_comment_parser::{CommentParser, CommentParserConfig, Diagnostic, DisplayPart};
///
/// let parser = CommentParser::new(CommentParserConfig::default());
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
///
/// let comment = parser.parse_text("Summary\n@param x The x", "index.ts", &mut diagnostics);
///
/// assert_eq!(comment.summary, vec![DisplayPart::text("Summary")]);
/// assert_eq!(comment.block_tags[0].name.as_deref(), Some("x"));
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Debug)]
pub struct CommentParser {
    config: CommentParserConfig,
    tags: TagTable,
}

impl CommentParser {
    pub fn new(config: CommentParserConfig) -> Self {
        let tags = TagTable::new(&config);
        CommentParser { config, tags }
    }

    pub fn config(&self) -> &CommentParserConfig {
        &self.config
    }

    /// Parse the tokens of one comment. Never fails: malformed input is
    /// recovered from and reported to `sink`.
    pub fn parse(
        &self,
        tokens: &[Token],
        file: &SourceFile,
        sink: &mut dyn DiagnosticSink,
    ) -> Comment {
        tracing::trace!(file = file.name(), tokens = tokens.len(), "parsing comment");

        let mut parser = BlockParser {
            config: &self.config,
            tags: &self.tags,
            file,
            cursor: Cursor::new(tokens),
            comment: Comment::default(),
        };

        parser.comment.summary = parser.block_content(sink);
        while !parser.cursor.done() {
            let tag = parser.block_tag(sink);
            parser.comment.block_tags.push(tag);
        }

        let mut comment = parser.comment;
        let (start, end) = tokens.first().map_or((0, 0), |t| (t.pos, t.end));
        validation::post_process_comment(&mut comment, |message| {
            sink.report(file.diagnostic(message, start, end))
        });

        comment
    }

    /// Tokenize and parse comment text (delimiters and gutter removed).
    pub fn parse_text(&self, text: &str, file_name: &str, sink: &mut dyn DiagnosticSink) -> Comment {
        let tokens = tokenize(text);
        let file = SourceFile::new(file_name, text);
        self.parse(&tokens, &file, sink)
    }
}

/// State of one parse.
pub(crate) struct BlockParser<'a, 'f, 't> {
    pub(crate) config: &'a CommentParserConfig,
    pub(crate) tags: &'a TagTable,
    pub(crate) file: &'a SourceFile<'f>,
    pub(crate) cursor: Cursor<'t>,
    pub(crate) comment: Comment,
}

impl<'a, 'f, 't> BlockParser<'a, 'f, 't> {
    pub(crate) fn warn(&self, sink: &mut dyn DiagnosticSink, message: Message, token: TokenView) {
        sink.report(self.file.diagnostic(message, token.pos(), token.end()));
    }

    /// The tag name of a `Tag` token with the casing of `@inheritDoc` fixed
    pub(crate) fn tag_name(
        &self,
        token: TokenView<'t>,
        sink: &mut dyn DiagnosticSink,
    ) -> &'t str {
        let name = token.text();
        if name != INHERIT_DOC && name.eq_ignore_ascii_case(INHERIT_DOC) {
            if !self.config.js_doc_compatibility.inherit_doc_tag {
                self.warn(sink, Message::InheritDocTagProperlyCapitalized, token);
            }
            return INHERIT_DOC;
        }
        name
    }

    /// Parse display parts until the next block tag or the end of input.
    pub(crate) fn block_content(&mut self, sink: &mut dyn DiagnosticSink) -> Vec<DisplayPart> {
        let mut content = Vec::new();
        let mut at_new_line = true;

        while !self.cursor.done() {
            let next = self.cursor.peek();

            match next.kind() {
                TokenKind::Text | TokenKind::NewLine => content.push(DisplayPart::text(next.text())),
                TokenKind::Code => content.push(DisplayPart::code(next.text())),
                TokenKind::Tag => {
                    let tag = self.tag_name(next, sink);
                    let class = self.tags.get(tag);
                    if class.modifier {
                        self.comment.modifier_tags.insert(tag.to_owned());
                    } else if !at_new_line && !class.block {
                        // Unknown tag in running text, best effort
                        self.comment.modifier_tags.insert(tag.to_owned());
                        self.warn(
                            sink,
                            Message::TreatingUnrecognizedTagAsModifier(tag.to_owned()),
                            next,
                        );
                    } else {
                        // Start of the next block tag, handled by the caller
                        break;
                    }
                }
                // Redundant in TS files, and we don't use them for JS
                TokenKind::TypeAnnotation => (),
                TokenKind::CloseBrace => {
                    if !self.config.js_doc_compatibility.ignore_unescaped_braces {
                        self.warn(sink, Message::UnmatchedClosingBrace, next);
                    }
                    content.push(DisplayPart::text(next.text()));
                }
                TokenKind::OpenBrace => {
                    self.inline_tag(&mut content, sink);
                    at_new_line = false;
                    continue;
                }
            }

            let taken = self.cursor.take();
            match taken.kind() {
                TokenKind::NewLine => at_new_line = true,
                TokenKind::Text | TokenKind::Code | TokenKind::CloseBrace
                    if !taken.text().trim().is_empty() =>
                {
                    at_new_line = false
                }
                _ => (),
            }
        }

        merge_text_parts(&mut content);
        trim_parts(&mut content);
        content
    }

    pub(crate) fn block_tag(&mut self, sink: &mut dyn DiagnosticSink) -> CommentTag {
        let token = self.cursor.take();
        assert_eq!(
            token.kind(),
            TokenKind::Tag,
            "block_tag() called not at the start of a block tag"
        );

        let name = self.tag_name(token, &mut ());
        let name = ALIASED_TAGS
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, canonical)| *canonical);

        if !self.tags.get(name).block {
            self.warn(sink, Message::UnknownBlockTag(name.to_owned()), token);
        }

        if name == EXAMPLE {
            return self.example_block(sink);
        }

        let content = if (name == "@default" || name == "@defaultValue")
            && self.config.js_doc_compatibility.default_tag
        {
            self.default_block_content(sink)
        } else {
            self.block_content(sink)
        };

        CommentTag::new(name, content)
    }

    /// Parse the block without reporting anything to find where it ends,
    /// then rewind.
    fn speculate(&mut self) -> (Vec<DisplayPart>, Checkpoint) {
        self.cursor.mark();
        let content = self.block_content(&mut ());
        let end = self.cursor.checkpoint();
        self.cursor.release();
        (content, end)
    }

    fn raw_text_until(&mut self, end: Checkpoint) -> String {
        let mut text = String::new();
        while !self.cursor.at(end) {
            text.push_str(self.cursor.take().text());
        }
        text
    }

    /// Legacy JSDoc `@default` values are usually code and would produce
    /// brace warnings if parsed as rich text.
    fn default_block_content(&mut self, sink: &mut dyn DiagnosticSink) -> Vec<DisplayPart> {
        let (content, end) = self.speculate();

        if content.iter().any(DisplayPart::is_code) {
            return self.block_content(sink);
        }

        tracing::debug!("wrapping @default value in a code block");
        let text = self.raw_text_until(end);
        vec![DisplayPart::code(make_code_block(text.trim()))]
    }

    /// `@example` is code in legacy JSDoc unless it contains a fenced block.
    /// Otherwise its first line is the example name.
    fn example_block(&mut self, sink: &mut dyn DiagnosticSink) -> CommentTag {
        let (content, end) = self.speculate();

        let has_fence = content
            .iter()
            .any(|part| part.is_code() && part.get_text().starts_with("```"));

        if !self.config.js_doc_compatibility.example_tag || has_fence {
            let name = self.example_name(end, sink);

            if let Some(caption) = CAPTION.captures(&name) {
                let content = if has_fence {
                    self.block_content(sink)
                } else {
                    let text = self.raw_text_until(end);
                    vec![DisplayPart::code(make_code_block(text.trim()))]
                };
                return CommentTag::new(EXAMPLE, content).with_name(&caption[1]);
            }

            let mut tag = CommentTag::new(EXAMPLE, self.block_content(sink));
            let name = name.trim();
            if !name.is_empty() {
                tag.name = Some(name.to_owned());
            }
            return tag;
        }

        tracing::debug!("treating @example block as legacy code");
        let text = self.raw_text_until(end);
        let text = text.trim();

        match CAPTION.captures(text) {
            Some(caption) => {
                let code = &text[caption[0].len()..];
                CommentTag::new(EXAMPLE, vec![DisplayPart::code(make_code_block(code))])
                    .with_name(&caption[1])
            }
            None => CommentTag::new(EXAMPLE, vec![DisplayPart::code(make_code_block(text))]),
        }
    }

    /// Read the first line of an example, taken literally. Leading blank
    /// lines are skipped; once past them, a non-text token means the
    /// example has no name.
    fn example_name(&mut self, end: Checkpoint, sink: &mut dyn DiagnosticSink) -> String {
        let mut name = String::new();
        let mut past_tag_line = false;
        let mut warned = false;

        while !self.cursor.at(end) {
            let next = self.cursor.peek();
            match next.kind() {
                TokenKind::NewLine => {
                    self.cursor.take();
                    if !name.trim().is_empty() {
                        break;
                    }
                    past_tag_line = true;
                }
                TokenKind::Text => match next.text().find('\n') {
                    Some(newline) => {
                        name.push_str(&next.text()[..newline]);
                        self.cursor.consume_prefix(newline + 1);
                        if !name.trim().is_empty() {
                            break;
                        }
                        past_tag_line = true;
                    }
                    None => name.push_str(self.cursor.take().text()),
                },
                TokenKind::Code
                | TokenKind::Tag
                | TokenKind::TypeAnnotation
                | TokenKind::OpenBrace
                | TokenKind::CloseBrace => {
                    if past_tag_line && name.trim().is_empty() {
                        break;
                    }
                    if !warned {
                        self.warn(sink, Message::ExampleTagLiteralName, next);
                        warned = true;
                    }
                    name.push_str(self.cursor.take().text());
                }
            }
        }

        name
    }
}

/// Concatenate adjacent text parts
pub(crate) fn merge_text_parts(parts: &mut Vec<DisplayPart>) {
    let mut merged: Vec<DisplayPart> = Vec::with_capacity(parts.len());
    for part in parts.drain(..) {
        match (merged.last_mut(), part) {
            (Some(DisplayPart::Text { text: prev }), DisplayPart::Text { text }) => {
                prev.push_str(&text)
            }
            (_, part) => merged.push(part),
        }
    }
    *parts = merged;
}

/// Trim the start of the first part and the end of the last part, inline
/// tags on both sides, then drop text parts left empty.
fn trim_parts(parts: &mut Vec<DisplayPart>) {
    let mut i = 0;
    while i < parts.len() {
        let inline = parts[i].is_inline_tag(None);
        let last = i + 1 == parts.len();

        let text = parts[i].text_mut();
        if i == 0 || inline {
            let leading = text.len() - text.trim_start().len();
            text.drain(..leading);
        }
        if last || inline {
            let kept = text.trim_end().len();
            text.truncate(kept);
        }

        if parts[i].is_text() && parts[i].get_text().is_empty() {
            parts.remove(i);
        } else {
            i += 1;
        }
    }
}
