mod states;

use crate::base::{is_whitespace, Range};
use memchr::memchr_iter;

pub type State<'i> = fn(&mut Lexer<'i>) -> Token;

/// Lexical category of the current match. Tokens carry no payload, the
/// matched text is recovered with [`Lexer::current_text`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    Word,
    Quote,
    Slash,
    Equals,
    Whitespace,
    Text,
    Comment,
    CData,
    Directive,
    CondCommentStart,
    CondCommentEnd,
    XmlLt,
    XmlGt,
    Lt,
    Gt,
    Eof,
    Unknown,
}

pub struct Lexer<'i> {
    input: &'i str,
    pos: usize,
    token_start: usize,
    state: State<'i>,
    conditional_comments: bool,
}

impl<'i> Lexer<'i> {
    pub fn new(input: &'i str, conditional_comments: bool) -> Self {
        Lexer {
            input,
            pos: 0,
            token_start: 0,
            state: Lexer::data_state,
            conditional_comments,
        }
    }

    #[inline]
    pub fn input(&self) -> &'i str {
        self.input
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Token {
        self.token_start = self.pos;

        let token = if self.pos >= self.input.len() {
            Token::Eof
        } else {
            (self.state)(self)
        };

        trace!(@token token, self.current_text());

        token
    }

    #[inline]
    pub fn current_range(&self) -> Range {
        Range::new(self.token_start, self.pos)
    }

    #[inline]
    pub fn current_text(&self) -> &'i str {
        &self.input[self.current_range()]
    }

    #[inline]
    pub fn switch_state(&mut self, state: State<'i>) {
        self.state = state;
    }

    /// Moves the lexer back (or forward) to `pos` in the given state. The
    /// position must be on a char boundary.
    #[inline]
    pub fn rewind_to(&mut self, pos: usize, state: State<'i>) {
        debug_assert!(self.input.is_char_boundary(pos));

        self.pos = pos;
        self.token_start = pos;
        self.state = state;
    }

    /// Consumes the body of a raw text element up to and including its
    /// end tag (`</name` followed by optional whitespace and `>`, matched
    /// case-insensitively). Returns the body range and whether the end tag
    /// was found. Without an end tag the body extends to the end of input.
    pub fn consume_raw_text(&mut self, name: &str) -> (Range, bool) {
        let bytes = self.input.as_bytes();
        let name = name.as_bytes();
        let start = self.pos;

        self.token_start = start;
        self.state = Lexer::data_state;

        for lt in memchr_iter(b'<', &bytes[start..]).map(|i| start + i) {
            if let Some(end) = end_tag_end(bytes, lt, name) {
                self.pos = end;

                trace!(@raw_text String::from_utf8_lossy(name), &self.input[start..lt]);

                return (Range::new(start, lt), true);
            }
        }

        self.pos = bytes.len();

        (Range::new(start, bytes.len()), false)
    }
}

fn end_tag_end(bytes: &[u8], lt: usize, name: &[u8]) -> Option<usize> {
    let name_start = lt + 2;
    let name_end = name_start + name.len();

    if bytes.get(lt + 1) != Some(&b'/') || bytes.len() < name_end {
        return None;
    }

    if !bytes[name_start..name_end].eq_ignore_ascii_case(name) {
        return None;
    }

    let mut pos = name_end;

    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }

    (bytes.get(pos) == Some(&b'>')).then_some(pos + 1)
}
