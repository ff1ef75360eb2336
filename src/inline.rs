use crate::diagnostic::{DiagnosticSink, Message};
use crate::model::DisplayPart;
use crate::parser::BlockParser;
use crate::token::TokenKind;

impl<'a, 'f, 't> BlockParser<'a, 'f, 't> {
    /// Parse `{@tag text}` starting at an `OpenBrace` token and append it to
    /// `block`. A brace that doesn't open an inline tag is kept as text.
    pub(crate) fn inline_tag(&mut self, block: &mut Vec<DisplayPart>, sink: &mut dyn DiagnosticSink) {
        let open_brace = self.cursor.take();
        let warn_braces = !self.config.js_doc_compatibility.ignore_unescaped_braces;

        // `{` then optional whitespace then a tag, or it's just a brace
        if self.cursor.done()
            || !matches!(self.cursor.peek().kind(), TokenKind::Text | TokenKind::Tag)
        {
            if warn_braces {
                self.warn(sink, Message::UnescapedOpenBraceWithoutInlineTag, open_brace);
            }
            block.push(DisplayPart::text(open_brace.text()));
            return;
        }

        let mut tag_name = self.cursor.take();

        if self.cursor.done()
            || (tag_name.kind() == TokenKind::Text
                && (!tag_name.text().trim().is_empty()
                    || self.cursor.peek().kind() != TokenKind::Tag))
        {
            if warn_braces {
                self.warn(sink, Message::UnescapedOpenBraceWithoutInlineTag, open_brace);
            }
            block.push(DisplayPart::text(format!("{}{}", open_brace.text(), tag_name.text())));
            return;
        }

        if tag_name.kind() != TokenKind::Tag {
            tag_name = self.cursor.take();
        }

        let tag = self.tag_name(tag_name, sink);
        if !self.tags.get(tag).inline {
            self.warn(sink, Message::UnknownInlineTag(tag.to_owned()), tag_name);
        }

        let mut content = String::new();
        while !self.cursor.done() && self.cursor.peek().kind() != TokenKind::CloseBrace {
            let token = self.cursor.take();
            if token.kind() == TokenKind::OpenBrace {
                self.warn(sink, Message::OpenBraceWithinInlineTag, token);
            }
            content.push_str(if token.kind() == TokenKind::NewLine {
                " "
            } else {
                token.text()
            });
        }

        if self.cursor.done() {
            self.warn(sink, Message::InlineTagNotClosed, open_brace);
        } else {
            self.cursor.take();
        }

        let target = tag_name.link_target().cloned();
        let ts_link_text = target
            .as_ref()
            .and(tag_name.link_text())
            .map(str::to_owned);

        block.push(DisplayPart::InlineTag {
            tag: tag.to_owned(),
            text: content,
            target,
            ts_link_text,
        });
    }
}
