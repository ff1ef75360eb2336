use crate::model::{Comment, CommentTag, DisplayPart};

/// Determine which sections of a comment are traversed
#[derive(Clone, Copy, Debug)]
pub enum PartFilter {
    /// Only the summary
    SummaryOnly,
    /// Only the content of block tags
    BlockTagsOnly,
    /// Summary, then block tags in order
    All,
}

impl PartFilter {
    fn summary(self) -> bool {
        !matches!(self, PartFilter::BlockTagsOnly)
    }

    fn block_tags(self) -> bool {
        !matches!(self, PartFilter::SummaryOnly)
    }
}

/// Traverse the display parts of a comment and provide them to the given
/// closure, together with the block tag they belong to (`None` for the
/// summary).
///
/// This function works like the visitor pattern. The sections visited are
/// determined by the given filter.
pub fn walk_display_parts<'a, F>(comment: &'a Comment, filter: PartFilter, mut f: F)
where
    F: FnMut(Option<&'a CommentTag>, &'a DisplayPart),
{
    if filter.summary() {
        comment.summary.iter().for_each(|p| f(None, p));
    }

    if filter.block_tags() {
        comment
            .block_tags
            .iter()
            .for_each(|tag| tag.content.iter().for_each(|p| f(Some(tag), p)));
    }
}

/// Same as [`walk_display_parts`], with mutable access to the parts, e.g. to
/// fill in link targets once symbols are resolved.
pub fn walk_display_parts_mut<F>(comment: &mut Comment, filter: PartFilter, mut f: F)
where
    F: FnMut(&mut DisplayPart),
{
    if filter.summary() {
        comment.summary.iter_mut().for_each(&mut f);
    }

    if filter.block_tags() {
        comment
            .block_tags
            .iter_mut()
            .for_each(|tag| tag.content.iter_mut().for_each(&mut f));
    }
}

/// Inline tags of a comment with the given `@name`, any tag if `None`
pub fn inline_tags<'a>(
    comment: &'a Comment,
    name: Option<&str>,
    filter: PartFilter,
) -> Vec<&'a DisplayPart> {
    let mut res = Vec::new();
    walk_display_parts(comment, filter, |_, part| {
        if part.is_inline_tag(name) {
            res.push(part);
        }
    });
    res
}
