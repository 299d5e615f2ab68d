use tagscan::{HandlerResult, Parser, ParserSettings, Tag, TagType, TagVisitor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Tag {
        name: String,
        tag_type: TagType,
        depth: usize,
        attributes: Vec<(String, Option<String>)>,
    },
    Script(String),
    Xmp(String),
    Xml(String),
    Text(String),
    Comment(String),
    CData(String),
    Directive(String),
    CondCommentStart(String, bool, bool),
    CondCommentEnd(String, bool, bool),
    Error(String),
}

impl Event {
    pub fn start(name: &str, depth: usize) -> Self {
        Event::Tag {
            name: name.into(),
            tag_type: TagType::Start,
            depth,
            attributes: Vec::new(),
        }
    }

    pub fn end(name: &str, depth: usize) -> Self {
        Event::Tag {
            name: name.into(),
            tag_type: TagType::End,
            depth,
            attributes: Vec::new(),
        }
    }

    pub fn self_closing(name: &str, depth: usize) -> Self {
        Event::Tag {
            name: name.into(),
            tag_type: TagType::SelfClosing,
            depth,
            attributes: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr_name: &str, attr_value: Option<&str>) -> Self {
        if let Event::Tag { attributes, .. } = &mut self {
            attributes.push((attr_name.into(), attr_value.map(Into::into)));
        }

        self
    }

    pub fn text(text: &str) -> Self {
        Event::Text(text.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }
}

#[derive(Default)]
pub struct EventRecorder {
    pub events: Vec<Event>,
    pub started: bool,
    pub ended: bool,
}

impl EventRecorder {
    fn push(&mut self, event: Event) -> HandlerResult {
        assert!(self.started && !self.ended, "Event {event:?} outside of parsing");

        self.events.push(event);

        Ok(())
    }
}

impl TagVisitor for EventRecorder {
    fn start(&mut self) -> HandlerResult {
        assert!(!self.started, "Parsing started twice");
        self.started = true;

        Ok(())
    }

    fn end(&mut self) -> HandlerResult {
        assert!(!self.ended, "Parsing ended twice");
        self.ended = true;

        Ok(())
    }

    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.push(Event::Tag {
            name: tag.name().into(),
            tag_type: tag.tag_type(),
            depth: tag.depth(),
            attributes: tag
                .attributes()
                .iter()
                .map(|a| (a.name().into(), a.value().map(Into::into)))
                .collect(),
        })
    }

    fn script(&mut self, _tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.push(Event::Script(body.into()))
    }

    fn xmp(&mut self, _tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.push(Event::Xmp(body.into()))
    }

    fn xml(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.push(Event::Xml(tag.name().into()))
    }

    fn text(&mut self, text: &str) -> HandlerResult {
        self.push(Event::Text(text.into()))
    }

    fn comment(&mut self, comment: &str) -> HandlerResult {
        self.push(Event::Comment(comment.into()))
    }

    fn cdata(&mut self, cdata: &str) -> HandlerResult {
        self.push(Event::CData(cdata.into()))
    }

    fn directive(&mut self, directive: &str) -> HandlerResult {
        self.push(Event::Directive(directive.into()))
    }

    fn cond_comment_start(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        self.push(Event::CondCommentStart(
            expression.into(),
            downlevel_hidden,
            additional,
        ))
    }

    fn cond_comment_end(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        self.push(Event::CondCommentEnd(
            expression.into(),
            downlevel_hidden,
            additional,
        ))
    }

    fn error(&mut self, message: &str) -> HandlerResult {
        self.push(Event::Error(message.into()))
    }
}

pub fn record_with_settings(input: &str, settings: ParserSettings) -> Vec<Event> {
    let mut recorder = EventRecorder::default();

    Parser::with_settings(input, settings)
        .parse(&mut recorder)
        .unwrap();

    assert!(recorder.started && recorder.ended);

    recorder.events
}

pub fn record(input: &str) -> Vec<Event> {
    record_with_settings(input, ParserSettings::default())
}
