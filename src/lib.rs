//! Parser for TypeDoc style documentation comments.
//!
//! A comment is tokenized with [`tokenize`], then [`CommentParser::parse`]
//! turns the tokens into a [`Comment`]: a summary, block tags (`@param`,
//! `@returns`, ...) and modifier tags (`@beta`, ...). Parsing never fails;
//! malformed input is recovered from and reported as [`Diagnostic`]s.
//!
//! ```
//! use doc_comment_parser::{CommentParser, CommentParserConfig, Diagnostic, DisplayPart};
//!
//! let parser = CommentParser::new(CommentParserConfig::default());
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let comment = parser.parse_text("See {@link Foo}.\n@beta", "foo.ts", &mut diagnostics);
//!
//! assert_eq!(comment.summary[1], DisplayPart::inline_tag("@link", "Foo"));
//! assert!(comment.has_modifier("@beta"));
//! ```

mod config;
mod cursor;
mod diagnostic;
mod error;
mod inline;
mod javadoc;
mod lexer;
mod model;
mod parser;
mod tag_name;
mod token;
pub mod traverse;
mod validation;

pub use config::{
    CommentParserConfig, CommentParserConfigBuilder, CommentParserConfigBuilderError,
    JsDocCompatibility, DEFAULT_BLOCK_TAGS, DEFAULT_INLINE_TAGS, DEFAULT_MODIFIER_TAGS,
};
pub use cursor::{Checkpoint, Cursor, TokenView};
pub use diagnostic::{Diagnostic, DiagnosticSink, LogSink, Message, SourceFile};
pub use error::ConfigError;
pub use javadoc::{find_doc_comment, parse_doc_comment, strip_gutter, DocComment};
pub use lexer::tokenize;
pub use model::{Comment, CommentTag, DisplayPart, LinkTarget, Position, Range, ReflectionId};
pub use parser::CommentParser;
pub use tag_name::extract_tag_name;
pub use token::{Token, TokenKind};
