use crate::harness::{record, rewrite, round_trip, Dom};
use tagscan::{HandlerResult, SelectorTarget, Tag, TagVisitor};

const DOCUMENT: &str = r#"<?xml version="1.0"?>
<!DOCTYPE html>
<html lang=en>
<head><meta charset="utf-8"><title>T &amp; t</title>
<script type="text/javascript">if (a < b && c > d) { x = "</p>"; }</script>
</head>
<body class='main' data-x>
<!-- comment -->
<![CDATA[ raw <data> ]]>
<!--[if IE]><p>ie</p><![endif]-->
<![if !IE]><p>other</p><![endif]>
<!--[if !IE]><!--><p>revealed</p><!--<![endif]-->
<img src=a.png alt="x"/>
<br>
<xmp><b>literal</b></xmp>
</body>
</html>
"#;

/// Rebuilds every tag from its parts.
struct Normalize;

impl TagVisitor for Normalize {
    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        tag.set_modified();

        Ok(())
    }

    fn script(&mut self, tag: &mut Tag<'_>, _body: &str) -> HandlerResult {
        self.tag(tag)
    }

    fn xmp(&mut self, tag: &mut Tag<'_>, _body: &str) -> HandlerResult {
        self.tag(tag)
    }

    fn xml(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.tag(tag)
    }
}

#[test]
fn unmodified_document_round_trips() {
    assert_eq!(round_trip(DOCUMENT), DOCUMENT);
    assert!(record(DOCUMENT).iter().all(|e| !e.is_error()));
}

#[test]
fn normalized_output_is_stable() {
    let normalized = rewrite(DOCUMENT, Normalize);

    assert_ne!(normalized, DOCUMENT);
    assert!(normalized.contains(r#"<html lang="en">"#));
    assert!(normalized.contains(r#"<body class="main" data-x>"#));
    assert!(normalized.contains(r#"<img src="a.png" alt="x"/>"#));
    assert!(normalized.contains(r#"<?xml version="1.0"?>"#));

    assert_eq!(record(&normalized), record(DOCUMENT));
    assert_eq!(rewrite(&normalized, Normalize), normalized);
}

#[test]
fn single_quoted_values_are_escaped() {
    let output = rewrite(r#"<a title='say "hi"'>x</a>"#, Normalize);

    assert_eq!(output, r#"<a title="say &quot;hi&quot;">x</a>"#);

    let dom = Dom::parse(&output);
    let a = dom.select("a")[0];

    assert_eq!(a.attribute("title", true).as_deref(), Some(r#"say "hi""#));
}

#[test]
fn modified_tags_are_rebuilt() {
    struct Sanitize;

    impl TagVisitor for Sanitize {
        fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
            if tag.name() == "b" {
                tag.set_name("strong");
            }

            tag.remove_attribute("onclick", false);

            if tag.name() == "a" && tag.tag_type().opens() {
                tag.set_attribute("rel", false, Some("nofollow"));
            }

            Ok(())
        }
    }

    assert_eq!(
        rewrite(
            r#"<p ONCLICK="x()"><b>bold</b> <a href=/x>link</a></p>"#,
            Sanitize
        ),
        r#"<p><strong>bold</strong> <a href="/x" rel="nofollow">link</a></p>"#
    );
}
