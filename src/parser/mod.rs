mod lexer;
mod tag;

use crate::base::{Position, PositionCursor, Range};
use crate::visitor::TagVisitor;
use cfg_if::cfg_if;
use log::{debug, warn};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Debug};
use std::time::Instant;
use thiserror::Error;

pub use self::tag::{Attribute, Tag, TagType};

cfg_if! {
    if #[cfg(feature = "integration_test")] {
        pub use self::lexer::{Lexer, Token};
    } else {
        use self::lexer::{Lexer, Token};
    }
}

const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

#[inline]
fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RawTextElement {
    Script,
    Xmp,
}

impl RawTextElement {
    fn from_tag_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("script") {
            Some(RawTextElement::Script)
        } else if name.eq_ignore_ascii_case("xmp") {
            Some(RawTextElement::Xmp)
        } else {
            None
        }
    }
}

/// Fatal parsing errors. Malformed markup is never fatal, it is reported
/// through [`TagVisitor::error`] instead.
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("A token has been pushed back while another pushed back token is pending.")]
    DoublePushback,

    #[error("Text token at {actual} doesn't continue the buffered text ending at {expected}.")]
    NonContiguousText { expected: usize, actual: usize },

    #[error("{0}")]
    HandlerError(#[from] Box<dyn Error + Send + Sync>),
}

pub type TagFilter = Box<dyn Fn(&str) -> bool>;

pub struct ParserSettings {
    /// Recognize conditional comments. When disabled, downlevel-hidden
    /// conditional comments are ordinary comments and other conditional
    /// comment markers are reported as errors and kept as text.
    pub enable_conditional_comments: bool,

    /// Compute line and column for error messages and tag positions.
    pub calculate_position: bool,

    /// Decides which tag names are treated as tags. Rejected tags are
    /// emitted as text.
    pub tag_filter: Option<TagFilter>,
}

impl ParserSettings {
    #[inline]
    pub fn tag_filter(mut self, filter: impl Fn(&str) -> bool + 'static) -> Self {
        self.tag_filter = Some(Box::new(filter));

        self
    }

    #[inline]
    fn should_parse_tag(&self, name: &str) -> bool {
        self.tag_filter.as_ref().map_or(true, |filter| filter(name))
    }
}

impl Default for ParserSettings {
    #[inline]
    fn default() -> Self {
        ParserSettings {
            enable_conditional_comments: true,
            calculate_position: true,
            tag_filter: None,
        }
    }
}

impl Debug for ParserSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserSettings")
            .field(
                "enable_conditional_comments",
                &self.enable_conditional_comments,
            )
            .field("calculate_position", &self.calculate_position)
            .field("tag_filter", &self.tag_filter.is_some())
            .finish()
    }
}

#[derive(Debug, Copy, Clone)]
struct Lexeme {
    token: Token,
    range: Range,
}

/// Single-pass markup parser over a complete input.
///
/// A parser is consumed by [`Parser::parse`]; create one per input.
pub struct Parser<'i> {
    input: &'i str,
    lexer: Lexer<'i>,
    settings: ParserSettings,
    pushed_back: Option<Lexeme>,
    text_buffer: Option<Range>,
    attributes_buffer: Vec<Attribute<'i>>,
    depth: usize,
    positions: PositionCursor,
}

impl<'i> Parser<'i> {
    #[inline]
    pub fn new(input: &'i str) -> Self {
        Parser::with_settings(input, ParserSettings::default())
    }

    pub fn with_settings(input: &'i str, settings: ParserSettings) -> Self {
        Parser {
            input,
            lexer: Lexer::new(input, settings.enable_conditional_comments),
            settings,
            pushed_back: None,
            text_buffer: None,
            attributes_buffer: Vec::new(),
            depth: 0,
            positions: PositionCursor::default(),
        }
    }

    /// Parses the whole input, delivering events to the visitor.
    pub fn parse<V: TagVisitor + ?Sized>(mut self, visitor: &mut V) -> Result<(), ParsingError> {
        let started = Instant::now();

        debug!("Parsing {} bytes of markup", self.input.len());

        visitor.start()?;

        loop {
            let lexeme = self.next_lexeme();

            match lexeme.token {
                Token::Eof => break,
                Token::Comment => {
                    self.flush_text(visitor)?;
                    visitor.comment(&self.input[lexeme.range.shrink(4, 3)])?;
                }
                Token::CData => {
                    self.flush_text(visitor)?;
                    visitor.cdata(&self.input[lexeme.range.shrink(9, 3)])?;
                }
                Token::Directive => {
                    self.flush_text(visitor)?;
                    visitor.directive(&self.input[lexeme.range.shrink(2, 1)])?;
                }
                Token::CondCommentStart => self.cond_comment_start(lexeme, visitor)?,
                Token::CondCommentEnd => self.cond_comment_end(lexeme, visitor)?,
                Token::Lt | Token::XmlLt => self.parse_tag(lexeme, visitor)?,
                Token::Unknown => {
                    let message = unterminated_markup_message(&self.input[lexeme.range]);

                    self.report_error(visitor, message, lexeme.range.start)?;
                    self.buffer_text(lexeme.range)?;
                }
                _ => self.buffer_text(lexeme.range)?,
            }
        }

        self.flush_text(visitor)?;
        visitor.end()?;

        debug!("Parsing finished in {:?}", started.elapsed());

        Ok(())
    }

    fn next_lexeme(&mut self) -> Lexeme {
        self.pushed_back.take().unwrap_or_else(|| {
            let token = self.lexer.next_token();

            Lexeme {
                token,
                range: self.lexer.current_range(),
            }
        })
    }

    fn next_lexeme_skipping_whitespace(&mut self) -> Lexeme {
        loop {
            let lexeme = self.next_lexeme();

            if lexeme.token != Token::Whitespace {
                return lexeme;
            }
        }
    }

    fn push_back(&mut self, lexeme: Lexeme) -> Result<(), ParsingError> {
        trace!(@pushback lexeme);

        if self.pushed_back.is_some() {
            return Err(ParsingError::DoublePushback);
        }

        self.pushed_back = Some(lexeme);

        Ok(())
    }

    fn buffer_text(&mut self, range: Range) -> Result<(), ParsingError> {
        let buffered = match self.text_buffer {
            Some(buffered) if buffered.end != range.start => {
                return Err(ParsingError::NonContiguousText {
                    expected: buffered.end,
                    actual: range.start,
                });
            }
            Some(buffered) => Range::new(buffered.start, range.end),
            None => range,
        };

        self.text_buffer = Some(buffered);

        Ok(())
    }

    fn flush_text<V: TagVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<(), ParsingError> {
        if let Some(range) = self.text_buffer.take() {
            visitor.text(&self.input[range])?;
        }

        Ok(())
    }

    // NOTE: tag starts and error offsets are requested in input order, so the
    // cursor only ever scans forward.
    #[inline]
    fn position(&mut self, offset: usize) -> Position {
        if self.settings.calculate_position {
            self.positions.advance(self.input, offset)
        } else {
            Position::offset_only(offset)
        }
    }

    #[inline]
    fn report_error<V: TagVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        message: String,
        offset: usize,
    ) -> Result<(), ParsingError> {
        let position = self.position(offset);

        self.report_error_at(visitor, message, position)
    }

    fn report_error_at<V: TagVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        message: String,
        position: Position,
    ) -> Result<(), ParsingError> {
        let message = if self.settings.calculate_position {
            format!("{message} Error at: {position}")
        } else {
            message
        };

        warn!("{message}");
        visitor.error(&message)?;

        Ok(())
    }

    fn cond_comment_start<V: TagVisitor + ?Sized>(
        &mut self,
        lexeme: Lexeme,
        visitor: &mut V,
    ) -> Result<(), ParsingError> {
        if !self.settings.enable_conditional_comments {
            return self.disabled_cond_comment(lexeme, visitor);
        }

        let raw = &self.input[lexeme.range];
        let downlevel_hidden = raw.starts_with("<!--");
        let additional = downlevel_hidden && raw.ends_with("]><!-->");
        let body = if additional { &raw[..raw.len() - 5] } else { raw };
        let prefix_len = if downlevel_hidden { 5 } else { 3 };
        let expression = &body[prefix_len..body.len() - 2];

        self.flush_text(visitor)?;
        visitor.cond_comment_start(expression, downlevel_hidden, additional)?;

        Ok(())
    }

    fn cond_comment_end<V: TagVisitor + ?Sized>(
        &mut self,
        lexeme: Lexeme,
        visitor: &mut V,
    ) -> Result<(), ParsingError> {
        if !self.settings.enable_conditional_comments {
            return self.disabled_cond_comment(lexeme, visitor);
        }

        let raw = &self.input[lexeme.range];
        let additional = raw.starts_with("<!--");
        let body = if additional { &raw[4..] } else { raw };
        let downlevel_hidden = body.ends_with("]-->");
        let suffix_len = if downlevel_hidden { 4 } else { 2 };
        let expression = &body[3..body.len() - suffix_len];

        self.flush_text(visitor)?;
        visitor.cond_comment_end(expression, downlevel_hidden, additional)?;

        Ok(())
    }

    fn disabled_cond_comment<V: TagVisitor + ?Sized>(
        &mut self,
        lexeme: Lexeme,
        visitor: &mut V,
    ) -> Result<(), ParsingError> {
        self.report_error(
            visitor,
            "Conditional comments disabled".into(),
            lexeme.range.start,
        )?;

        self.buffer_text(lexeme.range)
    }

    fn parse_tag<V: TagVisitor + ?Sized>(
        &mut self,
        lt: Lexeme,
        visitor: &mut V,
    ) -> Result<(), ParsingError> {
        let start = lt.range.start;
        let xml_declaration = lt.token == Token::XmlLt;
        let mut tag_type = TagType::Start;
        let mut lexeme = self.next_lexeme();

        if lexeme.token == Token::Slash {
            tag_type = TagType::End;
            lexeme = self.next_lexeme();
        }

        // NOTE: the lexer enters a tag only if a letter follows `<`, `</` or `<?`.
        if lexeme.token != Token::Word {
            self.lexer.rewind_to(lexeme.range.start, Lexer::data_state);

            return self.buffer_text(Range::new(start, lexeme.range.start));
        }

        let input = self.input;
        let name = &input[lexeme.range];

        if !self.settings.should_parse_tag(name) {
            self.lexer.rewind_to(lexeme.range.end, Lexer::data_state);

            return self.buffer_text(Range::new(start, lexeme.range.end));
        }

        let position = self.position(start);
        let mut attributes = std::mem::take(&mut self.attributes_buffer);
        let mut self_closing = false;
        let closed_as_xml;
        let end;

        loop {
            let lexeme = self.next_lexeme();

            match lexeme.token {
                Token::Whitespace => (),
                Token::Word => self.parse_attribute(lexeme, name, &mut attributes, visitor)?,
                Token::Slash => {
                    let next = self.next_lexeme();

                    if next.token == Token::Gt {
                        self_closing = true;
                        closed_as_xml = false;
                        end = next.range.end;
                        break;
                    }

                    self.report_invalid_token(visitor, name, lexeme)?;
                    self.push_back(next)?;
                }
                Token::Gt => {
                    closed_as_xml = false;
                    end = lexeme.range.end;
                    break;
                }
                Token::XmlGt => {
                    closed_as_xml = true;
                    end = lexeme.range.end;
                    break;
                }
                Token::Eof => {
                    self.report_error_at(
                        visitor,
                        format!("Expected end of tag <{name}>"),
                        position,
                    )?;

                    attributes.clear();
                    self.attributes_buffer = attributes;

                    return self.buffer_text(Range::new(start, self.input.len()));
                }
                _ => self.report_invalid_token(visitor, name, lexeme)?,
            }
        }

        if xml_declaration && !closed_as_xml {
            self.report_error_at(visitor, format!("Unmatched tag <?{name}>"), position)?;
        } else if !xml_declaration && closed_as_xml {
            self.report_error_at(visitor, format!("Unmatched tag <{name}?>"), position)?;
        }

        if self_closing && tag_type == TagType::Start {
            tag_type = TagType::SelfClosing;
        }

        self.flush_text(visitor)?;

        let raw = &input[start..end];
        let raw_text_element = RawTextElement::from_tag_name(name);
        let mut tag = Tag::new(
            name,
            tag_type,
            xml_declaration,
            attributes,
            raw,
            position,
            0,
        );

        let result = if xml_declaration {
            self.visit_nested(&mut tag, |tag| visitor.xml(tag))
        } else if let (Some(element), TagType::Start) = (raw_text_element, tag_type) {
            let (body, _) = self.lexer.consume_raw_text(name);
            let body = &input[body];

            self.visit_nested(&mut tag, |tag| match element {
                RawTextElement::Script => visitor.script(tag, body),
                RawTextElement::Xmp => visitor.xmp(tag, body),
            })
        } else {
            // NOTE: void elements never change the depth of what follows, whatever
            // their literal form, so `</br>` sits at the depth `<br>` would have.
            let void = is_void_element(name);

            if tag_type.opens() || void {
                self.depth += 1;
            }

            tag.set_depth(self.depth);

            let result = visitor.tag(&mut tag);

            if tag_type.closes() || void {
                self.depth = self.depth.saturating_sub(1);
            }

            result
        };

        self.attributes_buffer = tag.into_attributes();
        self.attributes_buffer.clear();

        result.map_err(ParsingError::HandlerError)
    }

    #[inline]
    fn visit_nested(
        &mut self,
        tag: &mut Tag<'i>,
        visit: impl FnOnce(&mut Tag<'i>) -> crate::HandlerResult,
    ) -> crate::HandlerResult {
        self.depth += 1;
        tag.set_depth(self.depth);

        let result = visit(tag);

        self.depth -= 1;

        result
    }

    fn parse_attribute<V: TagVisitor + ?Sized>(
        &mut self,
        name_lexeme: Lexeme,
        tag_name: &str,
        attributes: &mut Vec<Attribute<'i>>,
        visitor: &mut V,
    ) -> Result<(), ParsingError> {
        let input = self.input;
        let name = &input[name_lexeme.range];
        let lexeme = self.next_lexeme_skipping_whitespace();

        let value = match lexeme.token {
            Token::Equals => self.parse_attribute_value(name, tag_name, visitor)?,
            Token::Quote => {
                let message = format!("Orphan attribute: {}", &self.input[lexeme.range]);

                self.report_error(visitor, message, lexeme.range.start)?;

                None
            }
            _ => {
                self.push_back(lexeme)?;

                None
            }
        };

        attributes.push(Attribute::new(Cow::Borrowed(name), value));

        Ok(())
    }

    fn parse_attribute_value<V: TagVisitor + ?Sized>(
        &mut self,
        name: &str,
        tag_name: &str,
        visitor: &mut V,
    ) -> Result<Option<Cow<'i, str>>, ParsingError> {
        let lexeme = self.next_lexeme_skipping_whitespace();

        match lexeme.token {
            Token::Quote => Ok(Some(self.unquote(lexeme.range))),
            Token::Slash if self.input[lexeme.range.end..].starts_with('>') => {
                self.push_back(lexeme)?;

                Ok(Some(Cow::Borrowed("")))
            }
            Token::Word | Token::Equals | Token::Slash => {
                let mut range = lexeme.range;

                loop {
                    let next = self.next_lexeme();

                    match next.token {
                        Token::Word | Token::Equals => range.end = next.range.end,
                        Token::Slash if !self.input[next.range.end..].starts_with('>') => {
                            range.end = next.range.end;
                        }
                        _ => {
                            self.push_back(next)?;
                            break;
                        }
                    }
                }

                let input = self.input;

                Ok(Some(Cow::Borrowed(&input[range])))
            }
            Token::Unknown => {
                self.report_error(
                    visitor,
                    format!("Invalid attribute: {name}"),
                    lexeme.range.start,
                )?;

                Ok(None)
            }
            _ => {
                let message = format!("Tag <{tag_name}> invalid attribute value: {name}");

                self.report_error(visitor, message, lexeme.range.start)?;
                self.push_back(lexeme)?;

                Ok(None)
            }
        }
    }

    fn unquote(&self, range: Range) -> Cow<'i, str> {
        let quote = self.input.as_bytes()[range.start];
        let value = &self.input[range.shrink(1, 1)];

        if quote == b'\'' && value.contains('"') {
            Cow::Owned(value.replace('"', "&quot;"))
        } else {
            Cow::Borrowed(value)
        }
    }

    fn report_invalid_token<V: TagVisitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        tag_name: &str,
        lexeme: Lexeme,
    ) -> Result<(), ParsingError> {
        let message = format!(
            "Tag <{tag_name}> invalid token: {}",
            &self.input[lexeme.range]
        );

        self.report_error(visitor, message, lexeme.range.start)
    }
}

fn unterminated_markup_message(raw: &str) -> String {
    let construct = if raw.starts_with("<!--[if") || raw.starts_with("<![if") {
        "conditional comment"
    } else if raw.starts_with("<!--") {
        "comment"
    } else if raw.starts_with("<![CDATA[") {
        "CDATA section"
    } else {
        "directive"
    };

    format!("Unclosed {construct}")
}
