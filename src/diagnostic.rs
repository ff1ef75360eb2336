use std::fmt;

use serde_derive::Serialize;

use crate::model::{Position, Range};

/// What went wrong. Each variant has a stable key for translation layers;
/// `Display` gives the default English text.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    InheritDocTagProperlyCapitalized,
    TreatingUnrecognizedTagAsModifier(String),
    UnknownBlockTag(String),
    UnmatchedClosingBrace,
    UnescapedOpenBraceWithoutInlineTag,
    UnknownInlineTag(String),
    OpenBraceWithinInlineTag,
    InlineTagNotClosed,
    ExampleTagLiteralName,
    InlineInheritDocInBlockTag,
    AtMostOneRemarksTag,
    AtMostOneReturnsTag,
    AtMostOneInheritDocTag,
    SummaryOverwrittenByInheritDoc,
    RemarksOverwrittenByInheritDoc,
}

impl Message {
    pub fn key(&self) -> &'static str {
        match self {
            Message::InheritDocTagProperlyCapitalized => "inheritdoc_tag_properly_capitalized",
            Message::TreatingUnrecognizedTagAsModifier(_) => {
                "treating_unrecognized_tag_0_as_modifier"
            }
            Message::UnknownBlockTag(_) => "unknown_block_tag_0",
            Message::UnmatchedClosingBrace => "unmatched_closing_brace",
            Message::UnescapedOpenBraceWithoutInlineTag => {
                "unescaped_open_brace_without_inline_tag"
            }
            Message::UnknownInlineTag(_) => "unknown_inline_tag_0",
            Message::OpenBraceWithinInlineTag => "open_brace_within_inline_tag",
            Message::InlineTagNotClosed => "inline_tag_not_closed",
            Message::ExampleTagLiteralName => "example_tag_literal_name",
            Message::InlineInheritDocInBlockTag => {
                "inline_inheritdoc_should_not_appear_in_block_tag_in_comment_at_0"
            }
            Message::AtMostOneRemarksTag => "at_most_one_remarks_tag_expected_in_comment_at_0",
            Message::AtMostOneReturnsTag => "at_most_one_returns_tag_expected_in_comment_at_0",
            Message::AtMostOneInheritDocTag => {
                "at_most_one_inheritdoc_tag_expected_in_comment_at_0"
            }
            Message::SummaryOverwrittenByInheritDoc => {
                "content_in_summary_overwritten_by_inheritdoc_in_comment_at_0"
            }
            Message::RemarksOverwrittenByInheritDoc => {
                "content_in_remarks_block_overwritten_by_inheritdoc_in_comment_at_0"
            }
        }
    }

    /// Parameters for the `_0` placeholder of the key, if any. Location
    /// placeholders are filled from the diagnostic's range.
    pub fn params(&self) -> Vec<&str> {
        match self {
            Message::TreatingUnrecognizedTagAsModifier(tag)
            | Message::UnknownBlockTag(tag)
            | Message::UnknownInlineTag(tag) => vec![tag.as_str()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::InheritDocTagProperlyCapitalized => {
                write!(f, "The @inheritDoc tag should be properly capitalized")
            }
            Message::TreatingUnrecognizedTagAsModifier(tag) => {
                write!(f, "Treating unrecognized tag {} as a modifier tag", tag)
            }
            Message::UnknownBlockTag(tag) => write!(f, "Encountered an unknown block tag {}", tag),
            Message::UnmatchedClosingBrace => write!(f, "Unmatched closing brace"),
            Message::UnescapedOpenBraceWithoutInlineTag => {
                write!(f, "Encountered an unescaped open brace without an inline tag")
            }
            Message::UnknownInlineTag(tag) => {
                write!(f, "Encountered an unknown inline tag {}", tag)
            }
            Message::OpenBraceWithinInlineTag => {
                write!(f, "Encountered an open brace within an inline tag, this is likely a mistake")
            }
            Message::InlineTagNotClosed => write!(f, "Inline tag is not closed"),
            Message::ExampleTagLiteralName => write!(
                f,
                "The first line of an example tag will be taken literally as the example name, and should only contain text"
            ),
            Message::InlineInheritDocInBlockTag => write!(
                f,
                "An inline @inheritDoc tag should not appear within a block tag as it will not be processed"
            ),
            Message::AtMostOneRemarksTag => write!(f, "At most one @remarks tag is expected"),
            Message::AtMostOneReturnsTag => write!(f, "At most one @returns tag is expected"),
            Message::AtMostOneInheritDocTag => {
                write!(f, "At most one @inheritDoc tag is expected")
            }
            Message::SummaryOverwrittenByInheritDoc => write!(
                f,
                "Content in the summary section will be overwritten by the @inheritDoc tag"
            ),
            Message::RemarksOverwrittenByInheritDoc => write!(
                f,
                "Content in the @remarks block will be overwritten by the @inheritDoc tag"
            ),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub range: Range,
    pub message: Message,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.range.start.line_col;
        write!(f, "{}:{}:{} - {}", self.file, line, col, self.message)
    }
}

/// Receives diagnostics while a comment is parsed.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Drops everything
impl DiagnosticSink for () {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing` as warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            file = %diagnostic.file,
            line = diagnostic.range.start.line_col.0,
            key = diagnostic.message.key(),
            "{}",
            diagnostic.message
        );
    }
}

/// The text a comment was tokenized from, used to turn token offsets into
/// diagnostic ranges.
pub struct SourceFile<'a> {
    name: String,
    text: &'a str,
    lookup: line_col::LineColLookup<'a>,
    first_line: usize,
}

impl<'a> SourceFile<'a> {
    pub fn new<S: Into<String>>(name: S, text: &'a str) -> Self {
        SourceFile {
            name: name.into(),
            text,
            lookup: line_col::LineColLookup::new(text),
            first_line: 1,
        }
    }

    /// Line of the enclosing file on which the comment text starts (1-based)
    pub fn with_first_line(mut self, line: usize) -> Self {
        self.first_line = line.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offsets past the end or inside a char are moved back to a char boundary.
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range {
            start: Position::new(&self.lookup, self.boundary(start), self.first_line),
            end: Position::new(&self.lookup, self.boundary(end), self.first_line),
        }
    }

    fn boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    pub(crate) fn diagnostic(&self, message: Message, start: usize, end: usize) -> Diagnostic {
        Diagnostic {
            file: self.name.clone(),
            range: self.range(start, end),
            message,
        }
    }
}
