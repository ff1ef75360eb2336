use std::collections::BTreeSet;

use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,

    /// 1-based line and column
    pub line_col: (usize, usize),
}

impl Position {
    pub(crate) fn new(lookup: &line_col::LineColLookup, offset: usize, first_line: usize) -> Self {
        let (line, col) = lookup.get_by_cluster(offset);
        Position {
            offset,
            line_col: (line + first_line - 1, col),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Identifier of a reflection, assigned by the converter which owns the
/// symbol table. Stable for the lifetime of a project.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReflectionId(pub u32);

/// Where an inline link points once resolved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum LinkTarget {
    Reflection(ReflectionId),
    Url(String),
}

/// One atomic unit of parsed comment content.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DisplayPart {
    Text {
        text: String,
    },
    /// Code span or fenced block, backticks included.
    Code {
        text: String,
    },
    InlineTag {
        tag: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<LinkTarget>,
        #[serde(
            default,
            rename = "tsLinkText",
            skip_serializing_if = "Option::is_none"
        )]
        ts_link_text: Option<String>,
    },
}

impl DisplayPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        DisplayPart::Text { text: text.into() }
    }

    pub fn code<S: Into<String>>(text: S) -> Self {
        DisplayPart::Code { text: text.into() }
    }

    pub fn inline_tag<S: Into<String>, T: Into<String>>(tag: S, text: T) -> Self {
        DisplayPart::InlineTag {
            tag: tag.into(),
            text: text.into(),
            target: None,
            ts_link_text: None,
        }
    }

    pub fn get_text(&self) -> &str {
        match self {
            DisplayPart::Text { text }
            | DisplayPart::Code { text }
            | DisplayPart::InlineTag { text, .. } => text,
        }
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        match self {
            DisplayPart::Text { text }
            | DisplayPart::Code { text }
            | DisplayPart::InlineTag { text, .. } => text,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DisplayPart::Text { .. })
    }

    pub fn is_code(&self) -> bool {
        matches!(self, DisplayPart::Code { .. })
    }

    /// True for an inline tag with the given `@name`, any tag if `None`
    pub fn is_inline_tag(&self, name: Option<&str>) -> bool {
        match self {
            DisplayPart::InlineTag { tag, .. } => name.map_or(true, |n| tag == n),
            _ => false,
        }
    }
}

/// A block tag: `@name` followed by its content until the next block tag.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CommentTag {
    pub tag: String,

    /// User supplied identifier, e.g. the parameter name of a `@param` tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub content: Vec<DisplayPart>,
}

impl CommentTag {
    pub fn new<S: Into<String>>(tag: S, content: Vec<DisplayPart>) -> Self {
        CommentTag {
            tag: tag.into(),
            name: None,
            content,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A parsed documentation comment.
///
/// Built by [`crate::CommentParser`]; consumers treat it as immutable apart
/// from resolving link targets and cloning it for inherited members.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub summary: Vec<DisplayPart>,
    pub block_tags: Vec<CommentTag>,
    pub modifier_tags: BTreeSet<String>,
}

impl Comment {
    pub fn new(summary: Vec<DisplayPart>) -> Self {
        Comment {
            summary,
            ..Default::default()
        }
    }

    pub fn has_modifier(&self, tag: &str) -> bool {
        self.modifier_tags.contains(tag)
    }

    pub fn remove_modifier(&mut self, tag: &str) -> bool {
        self.modifier_tags.remove(tag)
    }

    /// First block tag with the given name
    pub fn get_tag(&self, tag: &str) -> Option<&CommentTag> {
        self.block_tags.iter().find(|t| t.tag == tag)
    }

    pub fn get_tags<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a CommentTag> + 'a {
        self.block_tags.iter().filter(move |t| t.tag == tag)
    }

    /// Block tag with the given name whose user identifier is `identifier`,
    /// e.g. `get_identified_tag("x", "@param")`
    pub fn get_identified_tag(&self, identifier: &str, tag: &str) -> Option<&CommentTag> {
        self.block_tags
            .iter()
            .find(|t| t.tag == tag && t.name.as_deref() == Some(identifier))
    }

    pub fn remove_tags(&mut self, tag: &str) {
        self.block_tags.retain(|t| t.tag != tag);
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.block_tags.is_empty() && self.modifier_tags.is_empty()
    }

    /// Whether rendering this comment would show anything. Modifier tags
    /// alone are rendered as flags, not content.
    pub fn has_visible_component(&self) -> bool {
        self.summary.iter().any(|p| !p.get_text().trim().is_empty())
            || !self.block_tags.is_empty()
    }

    /// Render display parts back into comment markup.
    pub fn combine_display_parts(parts: &[DisplayPart]) -> String {
        parts.iter().fold(String::new(), |mut out, part| {
            match part {
                DisplayPart::Text { text } | DisplayPart::Code { text } => out.push_str(text),
                DisplayPart::InlineTag { tag, text, .. } => {
                    out.push('{');
                    out.push_str(tag);
                    if !text.is_empty() {
                        out.push(' ');
                        out.push_str(text);
                    }
                    out.push('}');
                }
            }
            out
        })
    }
}
