use crate::harness::{Event, EventRecorder};
use tagscan::{
    HandlerResult, Parser, ParserSettings, Position, Tag, TagAdapter, TagType, TagVisitor,
    TagVisitorChain,
};

#[derive(Default)]
struct OwnedTags(Vec<Tag<'static>>);

impl TagVisitor for OwnedTags {
    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.0.push(tag.to_owned());

        Ok(())
    }
}

struct Uppercase;

impl TagVisitor for Uppercase {
    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        let name = tag.name().to_ascii_uppercase();

        tag.set_name(name);

        Ok(())
    }
}

#[test]
fn chain_passes_modified_tags_along() {
    let mut recorder = EventRecorder::default();

    {
        let mut chain = TagVisitorChain::new();

        chain.push(Uppercase).push(&mut recorder);

        assert_eq!(chain.len(), 2);

        Parser::new("<p>x</p>").parse(&mut chain).unwrap();
    }

    assert_eq!(
        recorder.events,
        [Event::start("P", 1), Event::text("x"), Event::end("P", 1)]
    );
}

#[test]
fn chain_from_boxed_visitors() {
    let mut first = EventRecorder::default();
    let mut second = EventRecorder::default();

    {
        let visitors: Vec<Box<dyn TagVisitor + '_>> = vec![Box::new(&mut first), Box::new(&mut second)];
        let mut chain: TagVisitorChain<'_> = visitors.into_iter().collect();

        Parser::new("<!--c-->").parse(&mut chain).unwrap();
    }

    assert_eq!(first.events, [Event::Comment("c".into())]);
    assert_eq!(first.events, second.events);
}

#[test]
fn adapter_forwards_everything() {
    let mut adapter = TagAdapter::new(EventRecorder::default());

    Parser::new("<?xml a?><script>s</script><![CDATA[d]]>")
        .parse(&mut adapter)
        .unwrap();

    assert!(adapter.target().ended);
    assert_eq!(
        adapter.into_target().events,
        [
            Event::Xml("xml".into()),
            Event::Script("s".into()),
            Event::CData("d".into()),
        ]
    );
}

#[test]
fn dynamic_visitors() {
    let mut recorder = EventRecorder::default();

    Parser::new("<br/>")
        .parse(&mut recorder as &mut dyn TagVisitor)
        .unwrap();

    assert_eq!(recorder.events, [Event::self_closing("br", 1)]);

    let mut boxed: Box<dyn TagVisitor> = Box::new(EventRecorder::default());

    Parser::new("<br/>").parse(&mut boxed).unwrap();
}

#[test]
fn owned_tags_outlive_the_input() {
    let mut tags = OwnedTags::default();

    {
        let input = String::from("<a>\n  <b ID=x data-k>");

        Parser::new(&input).parse(&mut tags).unwrap();
    }

    let [a, b] = &tags.0[..] else {
        panic!("Expected two tags, got {}", tags.0.len());
    };

    assert_eq!(a.position(), Position { offset: 0, line: 1, column: 1 });
    assert_eq!(b.position(), Position { offset: 6, line: 2, column: 3 });
    assert_eq!(b.raw(), Some("<b ID=x data-k>"));
    assert_eq!(b.id(), Some("x"));
    assert_eq!(b.attribute_value("id", true), None);
    assert!(b.has_attribute("data-k", true));
    assert_eq!(b.attribute_value("data-k", true), None);
    assert_eq!(b.depth(), 2);
    assert_eq!(b.tag_type(), TagType::Start);
    assert_eq!(b.to_string(), "<b ID=x data-k>");
}

#[test]
fn positions_can_be_skipped() {
    let mut tags = OwnedTags::default();
    let settings = ParserSettings {
        calculate_position: false,
        ..ParserSettings::default()
    };

    Parser::with_settings("ab\n<c>", settings)
        .parse(&mut tags)
        .unwrap();

    assert_eq!(tags.0[0].position(), Position::offset_only(3));
    assert_eq!(tags.0[0].position().to_string(), "3");
}
