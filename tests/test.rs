use anyhow::{Context, Result};
use doc_comment_parser::traverse::{self, PartFilter};
use doc_comment_parser::{
    CommentParser, CommentParserConfig, CommentParserConfigBuilder, Diagnostic, DisplayPart,
    JsDocCompatibility, LinkTarget, LogSink, ReflectionId,
};

fn parse(text: &str) -> (doc_comment_parser::Comment, Vec<Diagnostic>) {
    let parser = CommentParser::new(CommentParserConfig::default());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let comment = parser.parse_text(text, "test.ts", &mut diagnostics);
    (comment, diagnostics)
}

#[test]
fn test_parse() -> Result<()> {
    let text = r#"Adds two numbers, see {@link sub}.

@param a - First operand
@param [b=0] Second operand
@returns The sum
@beta"#;

    let (comment, diagnostics) = parse(text);
    assert!(diagnostics.is_empty());

    insta::assert_json_snapshot!(comment, @r###"
    {
      "summary": [
        {
          "kind": "text",
          "text": "Adds two numbers, see "
        },
        {
          "kind": "inline-tag",
          "tag": "@link",
          "text": "sub"
        },
        {
          "kind": "text",
          "text": "."
        }
      ],
      "blockTags": [
        {
          "tag": "@param",
          "name": "a",
          "content": [
            {
              "kind": "text",
              "text": "First operand"
            }
          ]
        },
        {
          "tag": "@param",
          "name": "b",
          "content": [
            {
              "kind": "text",
              "text": "Second operand"
            }
          ]
        },
        {
          "tag": "@returns",
          "content": [
            {
              "kind": "text",
              "text": "The sum"
            }
          ]
        }
      ],
      "modifierTags": [
        "@beta"
      ]
    }
    "###);

    let b = comment
        .get_identified_tag("b", "@param")
        .context("Missing @param b")?;
    assert_eq!(b.content, vec![DisplayPart::text("Second operand")]);

    Ok(())
}

#[test]
fn test_parse_diagnostics() -> Result<()> {
    let (comment, diagnostics) = parse("{@linkx Foo");

    assert_eq!(comment.summary, vec![DisplayPart::inline_tag("@linkx", "Foo")]);

    insta::assert_ron_snapshot!(diagnostics, @r###"
    [
      Diagnostic(
        file: "test.ts",
        range: Range(
          start: Position(
            offset: 1,
            line_col: (1, 2),
          ),
          end: Position(
            offset: 7,
            line_col: (1, 8),
          ),
        ),
        message: UnknownInlineTag("@linkx"),
      ),
      Diagnostic(
        file: "test.ts",
        range: Range(
          start: Position(
            offset: 0,
            line_col: (1, 1),
          ),
          end: Position(
            offset: 1,
            line_col: (1, 2),
          ),
        ),
        message: InlineTagNotClosed,
      ),
    ]
    "###);

    Ok(())
}

#[test]
fn test_example_tag() -> Result<()> {
    let text = "@example\nBasic usage\n```ts\nadd(1, 2);\n```";
    let (comment, diagnostics) = parse(text);

    let example = comment.get_tag("@example").context("Missing @example")?;
    assert_eq!(example.name.as_deref(), Some("Basic usage"));
    assert_eq!(
        example.content,
        vec![DisplayPart::code("```ts\nadd(1, 2);\n```")]
    );
    assert!(diagnostics.is_empty());

    Ok(())
}

#[test]
fn test_inherit_doc() -> Result<()> {
    let text = "Summary that is lost\n\n@remarks Also lost\n@remarks Twice\n@inheritDoc Base";
    let (comment, diagnostics) = parse(text);

    let keys: Vec<_> = diagnostics.iter().map(|d| d.message.key()).collect();
    assert_eq!(
        keys,
        vec![
            "at_most_one_remarks_tag_expected_in_comment_at_0",
            "content_in_summary_overwritten_by_inheritdoc_in_comment_at_0",
            "content_in_remarks_block_overwritten_by_inheritdoc_in_comment_at_0",
        ]
    );

    // Comment level diagnostics point to the first token
    assert!(diagnostics.iter().all(|d| d.range.start.offset == 0));

    assert_eq!(comment.get_tags("@remarks").count(), 1);
    let inherit = comment.get_tag("@inheritDoc").context("Missing @inheritDoc")?;
    assert_eq!(inherit.name.as_deref(), Some("Base"));

    Ok(())
}

#[test]
fn test_strict_braces() {
    let config = CommentParserConfigBuilder::default()
        .js_doc_compatibility(JsDocCompatibility {
            ignore_unescaped_braces: false,
            ..Default::default()
        })
        .build()
        .unwrap();
    let parser = CommentParser::new(config);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let comment = parser.parse_text("Object { a }\nthen \\{ escaped \\}", "test.ts", &mut diagnostics);

    assert_eq!(
        comment.summary,
        vec![DisplayPart::text("Object { a }\nthen { escaped }")]
    );
    let rendered: Vec<_> = diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "test.ts:1:8 - Encountered an unescaped open brace without an inline tag",
            "test.ts:1:12 - Unmatched closing brace",
        ]
    );
}

#[test]
fn test_doc_comment_in_source() -> Result<()> {
    let source = r#"import { sub } from "./sub";

/**
 * Multiplies two numbers.
 *
 * @param a The first
 * @deprecated Use {@link mul2}
 */
export function mul(a: number, b: number) {}
"#;
    let pos = source.find("export").context("Missing declaration")?;
    let parser = CommentParser::new(CommentParserConfig::default());

    let comment = doc_comment_parser::parse_doc_comment(&parser, source, "mul.ts", pos, &mut LogSink)
        .context("Missing doc comment")?;

    assert_eq!(comment.summary, vec![DisplayPart::text("Multiplies two numbers.")]);
    assert_eq!(comment.block_tags.len(), 2);
    assert_eq!(
        comment.block_tags[1].content,
        vec![DisplayPart::text("Use "), DisplayPart::inline_tag("@link", "mul2")]
    );

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("doc-comment-parser-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "modifierTags": ["@sealed"], "blockTags": ["@param"] }"#)?;

    let config = CommentParserConfig::from_json_file(&path);
    std::fs::remove_file(&path)?;
    let parser = CommentParser::new(config?);

    let (comment, diagnostics) = {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let comment = parser.parse_text("Text @beta\n@sealed\n@returns x", "test.ts", &mut diagnostics);
        (comment, diagnostics)
    };

    assert!(comment.has_modifier("@sealed"));
    assert!(comment.has_modifier("@beta"));
    let keys: Vec<_> = diagnostics.iter().map(|d| d.message.key()).collect();
    assert_eq!(
        keys,
        vec!["treating_unrecognized_tag_0_as_modifier", "unknown_block_tag_0"]
    );

    Ok(())
}

#[test]
fn test_resolve_links() {
    let (mut comment, _) = parse("See {@link Foo} and {@link https://typedoc.org}");

    traverse::walk_display_parts_mut(&mut comment, PartFilter::All, |part| {
        if let DisplayPart::InlineTag { text, target, .. } = part {
            *target = Some(if text.starts_with("https://") {
                LinkTarget::Url(text.clone())
            } else {
                LinkTarget::Reflection(ReflectionId(12))
            });
        }
    });

    insta::assert_json_snapshot!(comment.summary, @r###"
    [
      {
        "kind": "text",
        "text": "See "
      },
      {
        "kind": "inline-tag",
        "tag": "@link",
        "text": "Foo",
        "target": 12
      },
      {
        "kind": "text",
        "text": " and "
      },
      {
        "kind": "inline-tag",
        "tag": "@link",
        "text": "https://typedoc.org",
        "target": "https://typedoc.org"
      }
    ]
    "###);
}

#[test]
fn test_shared_parser() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CommentParser>();

    let parser = CommentParser::new(CommentParserConfig::default());
    let inputs = ["First @beta", "Second\n@param x The x", "Third {@link Foo}"];

    let comments: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let parser = &parser;
                s.spawn(move || {
                    let mut diagnostics: Vec<Diagnostic> = Vec::new();
                    (parser.parse_text(input, "test.ts", &mut diagnostics), diagnostics)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(comments.len(), 3);
    assert!(comments[0].0.has_modifier("@beta"));
    assert_eq!(comments[1].0.block_tags[0].name.as_deref(), Some("x"));
    assert!(comments.iter().all(|(_, diagnostics)| diagnostics.is_empty()));
}
