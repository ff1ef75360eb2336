use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostic::{DiagnosticSink, SourceFile};
use crate::lexer::tokenize;
use crate::model::Comment;
use crate::parser::CommentParser;

static GUTTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\*[ \t]?)?").unwrap());

/// Body of a `/** ... */` comment, delimiters excluded.
#[derive(Debug, PartialEq, Eq)]
pub struct DocComment<'a> {
    /// Byte offset of `content` in the source
    pub offset: usize,
    pub content: &'a str,
}

/// Find the doc comment ending right before `pos`, i.e. the documentation of
/// the declaration starting at `pos`.
///
/// Only whitespace and `//` line comments may be between the comment and
/// `pos`.
pub fn find_doc_comment(source: &str, pos: usize) -> Option<DocComment> {
    let mut rest = source.get(..pos)?;

    loop {
        rest = rest.trim_end();
        let line_start = rest.rfind('\n').map_or(0, |i| i + 1);
        if rest[line_start..].trim_start().starts_with("//") {
            rest = &rest[..line_start];
            continue;
        }

        // Block comments don't nest: the comment opens at the first `/*`
        // after the previous `*/`
        let body = rest.strip_suffix("*/")?;
        let after_previous = body.rfind("*/").map_or(0, |i| i + 2);
        let open = after_previous + body[after_previous..].find("/*")?;

        if body[open..].starts_with("/**") {
            return Some(DocComment {
                offset: open + 3,
                content: &body[open + 3..],
            });
        }

        // Plain block comment, keep looking
        rest = &body[..open];
    }
}

/// Remove the `*` gutter of each line. The number of lines is kept.
pub fn strip_gutter(content: &str) -> String {
    GUTTER.replace_all(content, "").into_owned()
}

/// Find, tokenize and parse the doc comment of the declaration at `pos`.
///
/// Diagnostics point to the lines of `source`.
pub fn parse_doc_comment(
    parser: &CommentParser,
    source: &str,
    file_name: &str,
    pos: usize,
    sink: &mut dyn DiagnosticSink,
) -> Option<Comment> {
    let doc = find_doc_comment(source, pos)?;
    let text = strip_gutter(doc.content);

    let first_line = line_col::LineColLookup::new(source)
        .get_by_cluster(doc.offset)
        .0;
    tracing::trace!(file = file_name, line = first_line, "found doc comment");

    let file = SourceFile::new(file_name, &text).with_first_line(first_line);
    let tokens = tokenize(&text);
    Some(parser.parse(&tokens, &file, sink))
}
