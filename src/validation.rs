use crate::diagnostic::Message;
use crate::model::{Comment, CommentTag, DisplayPart};
use crate::parser::INHERIT_DOC;
use crate::tag_name::extract_tag_name;

/// Block tags whose content starts with a user supplied identifier
const HAS_USER_IDENTIFIER: &[&str] = &[
    "@callback",
    "@param",
    "@prop",
    "@property",
    "@template",
    "@typedef",
    "@typeParam",
    "@inheritDoc",
];

const REMARKS: &str = "@remarks";
const RETURNS: &str = "@returns";

/// Checks and fixes applied once a comment has been parsed.
///
/// `warning` receives comment level messages; the caller decides where in
/// the source they point.
pub(crate) fn post_process_comment<F: FnMut(Message)>(comment: &mut Comment, mut warning: F) {
    // Split identifiers off (e.g. `@param x desc`)
    comment.block_tags.iter_mut().for_each(|tag| {
        split_user_identifier(tag);

        if tag
            .content
            .iter()
            .any(|p| p.is_inline_tag(Some(INHERIT_DOC)))
        {
            warning(Message::InlineInheritDocInBlockTag);
        }
    });

    // Check tags expected at most once
    let remarks = comment.get_tags(REMARKS).count();
    if remarks > 1 {
        warning(Message::AtMostOneRemarksTag);
        keep_first(&mut comment.block_tags, |t| t.tag == REMARKS);
    }

    let returns = comment.get_tags(RETURNS).count();
    if returns > 1 {
        warning(Message::AtMostOneReturnsTag);
        keep_first(&mut comment.block_tags, |t| t.tag == RETURNS);
    }

    // Inline and block @inheritDoc count together
    let inline_inherit_doc = comment
        .summary
        .iter()
        .filter(|p| p.is_inline_tag(Some(INHERIT_DOC)))
        .count();
    let block_inherit_doc = comment.get_tags(INHERIT_DOC).count();

    if inline_inherit_doc + block_inherit_doc > 1 {
        warning(Message::AtMostOneInheritDocTag);

        if inline_inherit_doc > 0 {
            keep_first(&mut comment.summary, |p| p.is_inline_tag(Some(INHERIT_DOC)));
            comment.remove_tags(INHERIT_DOC);
        } else {
            keep_first(&mut comment.block_tags, |t| t.tag == INHERIT_DOC);
        }
    }

    // Check content replaced when the documentation is inherited
    if inline_inherit_doc + block_inherit_doc > 0 {
        if comment
            .summary
            .iter()
            .any(|p| !p.is_inline_tag(None) && !p.get_text().trim().is_empty())
        {
            warning(Message::SummaryOverwrittenByInheritDoc);
        }

        if remarks > 0 {
            warning(Message::RemarksOverwrittenByInheritDoc);
        }
    }
}

fn split_user_identifier(tag: &mut CommentTag) {
    if !HAS_USER_IDENTIFIER.contains(&tag.tag.as_str()) {
        return;
    }

    if let Some(DisplayPart::Text { text }) = tag.content.first_mut() {
        let (name, rest) = extract_tag_name(text);
        tag.name = Some(name);

        if rest.is_empty() {
            tag.content.remove(0);
        } else {
            *text = rest;
        }
    }
}

/// Remove all matching items but the first one
fn keep_first<T, F: FnMut(&T) -> bool>(items: &mut Vec<T>, mut matches: F) {
    let mut seen = false;
    items.retain(|item| {
        if !matches(item) {
            return true;
        }
        let first = !seen;
        seen = true;
        first
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(comment: &mut Comment) -> Vec<&'static str> {
        let mut messages = Vec::new();
        post_process_comment(comment, |m| messages.push(m.key()));
        messages
    }

    fn tag(name: &str, text: &str) -> CommentTag {
        CommentTag::new(name, vec![DisplayPart::text(text)])
    }

    #[test]
    fn test_split_user_identifier() {
        let mut comment = Comment::default();
        comment.block_tags = vec![
            tag("@param", "x - The x"),
            tag("@typeParam", "T"),
            tag("@since", "1.0 Initial"),
            CommentTag::new(
                "@param",
                vec![DisplayPart::code("`y`"), DisplayPart::text(" code first")],
            ),
        ];

        assert!(run(&mut comment).is_empty());
        assert_eq!(comment.block_tags[0], tag("@param", "The x").with_name("x"));
        assert_eq!(comment.block_tags[1], CommentTag::new("@typeParam", vec![]).with_name("T"));
        assert_eq!(comment.block_tags[2].name, None);
        assert_eq!(comment.block_tags[3].name, None);
    }

    #[test]
    fn test_inline_inherit_doc_in_block_tag() {
        let mut comment = Comment::default();
        comment.block_tags = vec![CommentTag::new(
            "@remarks",
            vec![DisplayPart::inline_tag(INHERIT_DOC, "")],
        )];

        assert_eq!(
            run(&mut comment),
            vec!["inline_inheritdoc_should_not_appear_in_block_tag_in_comment_at_0"]
        );
    }

    #[test]
    fn test_at_most_one_remarks() {
        let mut comment = Comment::default();
        comment.block_tags = vec![tag(REMARKS, "a"), tag("@since", "1"), tag(REMARKS, "b")];

        assert_eq!(run(&mut comment), vec!["at_most_one_remarks_tag_expected_in_comment_at_0"]);
        assert_eq!(comment.block_tags, vec![tag(REMARKS, "a"), tag("@since", "1")]);
    }

    #[test]
    fn test_at_most_one_returns() {
        // A single @remarks must not hide duplicated @returns tags
        let mut comment = Comment::default();
        comment.block_tags = vec![tag(REMARKS, "r"), tag(RETURNS, "a"), tag(RETURNS, "b")];

        assert_eq!(run(&mut comment), vec!["at_most_one_returns_tag_expected_in_comment_at_0"]);
        assert_eq!(comment.block_tags, vec![tag(REMARKS, "r"), tag(RETURNS, "a")]);
    }

    #[test]
    fn test_inline_inherit_doc_wins() {
        let mut comment = Comment::new(vec![
            DisplayPart::inline_tag(INHERIT_DOC, ""),
            DisplayPart::inline_tag(INHERIT_DOC, ""),
        ]);
        comment.block_tags = vec![CommentTag::new(INHERIT_DOC, vec![])];

        assert_eq!(run(&mut comment), vec!["at_most_one_inheritdoc_tag_expected_in_comment_at_0"]);
        assert_eq!(comment.summary, vec![DisplayPart::inline_tag(INHERIT_DOC, "")]);
        assert!(comment.block_tags.is_empty());
    }

    #[test]
    fn test_block_inherit_doc_collapsed() {
        let mut comment = Comment::default();
        comment.block_tags = vec![tag(INHERIT_DOC, "Base"), tag(INHERIT_DOC, "Other")];

        assert_eq!(run(&mut comment), vec!["at_most_one_inheritdoc_tag_expected_in_comment_at_0"]);
        assert_eq!(
            comment.block_tags,
            vec![CommentTag::new(INHERIT_DOC, vec![]).with_name("Base")]
        );
    }

    #[test]
    fn test_overwritten_content() {
        let mut comment = Comment::new(vec![DisplayPart::text("Lost")]);
        comment.block_tags = vec![tag(REMARKS, "Also lost"), CommentTag::new(INHERIT_DOC, vec![])];

        assert_eq!(
            run(&mut comment),
            vec![
                "content_in_summary_overwritten_by_inheritdoc_in_comment_at_0",
                "content_in_remarks_block_overwritten_by_inheritdoc_in_comment_at_0",
            ]
        );

        // Only the inherited part in the summary
        let mut comment = Comment::new(vec![DisplayPart::inline_tag(INHERIT_DOC, "")]);
        assert!(run(&mut comment).is_empty());
    }

    #[test]
    fn test_keep_first() {
        let mut items = vec![1, 2, 1, 3, 1];
        keep_first(&mut items, |i| *i == 1);
        assert_eq!(items, vec![1, 2, 3]);
    }
}
