use std::collections::{HashMap, HashSet};
use std::path::Path;

use derive_builder::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_derive::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BLOCK_TAGS: &[&str] = &[
    "@augments",
    "@author",
    "@callback",
    "@category",
    "@categoryDescription",
    "@default",
    "@defaultValue",
    "@deprecated",
    "@document",
    "@example",
    "@expandType",
    "@extends",
    "@group",
    "@groupDescription",
    "@import",
    "@inheritDoc",
    "@inlineType",
    "@jsx",
    "@license",
    "@mergeModuleWith",
    "@module",
    "@param",
    "@preventExpand",
    "@preventInline",
    "@privateRemarks",
    "@prop",
    "@property",
    "@remarks",
    "@return",
    "@returns",
    "@satisfies",
    "@see",
    "@since",
    "@sortStrategy",
    "@summary",
    "@template",
    "@this",
    "@throws",
    "@type",
    "@typedef",
    "@typeParam",
    "@yields",
];

pub const DEFAULT_INLINE_TAGS: &[&str] = &[
    "@include",
    "@includeCode",
    "@inheritDoc",
    "@label",
    "@link",
    "@linkcode",
    "@linkplain",
];

pub const DEFAULT_MODIFIER_TAGS: &[&str] = &[
    "@abstract",
    "@alpha",
    "@beta",
    "@class",
    "@enum",
    "@event",
    "@eventProperty",
    "@expand",
    "@experimental",
    "@hidden",
    "@hideCategories",
    "@hideconstructor",
    "@hideGroups",
    "@ignore",
    "@inline",
    "@interface",
    "@internal",
    "@namespace",
    "@overload",
    "@override",
    "@packageDocumentation",
    "@primaryExport",
    "@private",
    "@protected",
    "@public",
    "@readonly",
    "@sealed",
    "@showCategories",
    "@showGroups",
    "@useDeclaredType",
    "@virtual",
];

static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new("^@[A-Za-z][A-Za-z0-9]*$").unwrap());

fn tag_set(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|t| (*t).to_owned()).collect()
}

/// Switches for legacy JSDoc habits.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct JsDocCompatibility {
    /// Treat `@example` content as code unless it contains a fenced block
    pub example_tag: bool,

    /// Treat `@default`/`@defaultValue` content as code unless it contains code
    pub default_tag: bool,

    /// Accept `@inheritdoc` silently. When off, the casing is still fixed
    /// but a warning is emitted.
    pub inherit_doc_tag: bool,

    /// Don't warn about unescaped `{` and `}`
    pub ignore_unescaped_braces: bool,
}

impl Default for JsDocCompatibility {
    fn default() -> Self {
        JsDocCompatibility {
            example_tag: true,
            default_tag: true,
            inherit_doc_tag: true,
            ignore_unescaped_braces: true,
        }
    }
}

/// Parser configuration: which tags exist, and how lenient to be.
///
/// Example:
/// ```
/// use doc_comment_parser::{CommentParserConfigBuilder, JsDocCompatibility};
///
/// let config = CommentParserConfigBuilder::default()
///     .js_doc_compatibility(JsDocCompatibility {
///         ignore_unescaped_braces: false,
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert!(config.block_tags.contains("@param"));
/// ```
#[derive(Builder, Deserialize, Clone, Debug, PartialEq)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
#[serde(default, rename_all = "camelCase")]
pub struct CommentParserConfig {
    pub block_tags: HashSet<String>,
    pub inline_tags: HashSet<String>,
    pub modifier_tags: HashSet<String>,
    pub js_doc_compatibility: JsDocCompatibility,
}

impl Default for CommentParserConfig {
    fn default() -> Self {
        CommentParserConfig {
            block_tags: tag_set(DEFAULT_BLOCK_TAGS),
            inline_tags: tag_set(DEFAULT_INLINE_TAGS),
            modifier_tags: tag_set(DEFAULT_MODIFIER_TAGS),
            js_doc_compatibility: JsDocCompatibility::default(),
        }
    }
}

fn check_tag_names<'a, I: IntoIterator<Item = &'a String>>(tags: I) -> Result<(), String> {
    match tags.into_iter().find(|t| !TAG_NAME.is_match(t)) {
        Some(invalid) => Err(invalid.clone()),
        None => Ok(()),
    }
}

impl CommentParserConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        [&self.block_tags, &self.inline_tags, &self.modifier_tags]
            .into_iter()
            .flatten()
            .try_for_each(check_tag_names)
            .map_err(|tag| format!("Invalid tag name `{}`, expected `@name`", tag))
    }
}

impl CommentParserConfig {
    /// Load from JSON; missing keys keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CommentParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading comment parser config");
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        [&self.block_tags, &self.inline_tags, &self.modifier_tags]
            .into_iter()
            .try_for_each(check_tag_names)
            .map_err(ConfigError::InvalidTagName)
    }
}

/// How a tag name may be used. A tag can be in several classes, e.g.
/// `@inheritDoc` is both a block and an inline tag by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TagClass {
    pub block: bool,
    pub inline: bool,
    pub modifier: bool,
}

/// The three tag sets of a config folded into one lookup table.
#[derive(Debug)]
pub(crate) struct TagTable {
    classes: HashMap<String, TagClass>,
}

impl TagTable {
    pub(crate) fn new(config: &CommentParserConfig) -> Self {
        let mut classes: HashMap<String, TagClass> = HashMap::new();

        for tag in &config.block_tags {
            classes.entry(tag.clone()).or_default().block = true;
        }
        for tag in &config.inline_tags {
            classes.entry(tag.clone()).or_default().inline = true;
        }
        for tag in &config.modifier_tags {
            classes.entry(tag.clone()).or_default().modifier = true;
        }

        TagTable { classes }
    }

    pub(crate) fn get(&self, tag: &str) -> TagClass {
        self.classes.get(tag).copied().unwrap_or_default()
    }
}
