use super::{Lexer, Token};
use crate::base::{is_alpha, is_quote, is_whitespace};
use memchr::{memchr, memchr2};

impl<'i> Lexer<'i> {
    pub fn data_state(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        let start = self.pos;

        if bytes[start] == b'<' {
            if let Some(token) = self.markup_start(start) {
                return token;
            }
        }

        let mut pos = start + 1;

        while let Some(i) = memchr(b'<', &bytes[pos..]) {
            let lt = pos + i;

            if starts_markup(bytes, lt) {
                self.pos = lt;

                return Token::Text;
            }

            pos = lt + 1;
        }

        self.pos = bytes.len();

        Token::Text
    }

    pub fn tag_state(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        let start = self.pos;

        match bytes[start] {
            b if is_whitespace(b) => self.whitespace(start),
            b'>' => {
                self.pos = start + 1;
                self.switch_state(Lexer::data_state);

                Token::Gt
            }
            b'?' if bytes.get(start + 1) == Some(&b'>') => {
                self.pos = start + 2;
                self.switch_state(Lexer::data_state);

                Token::XmlGt
            }
            b'/' => {
                self.pos = start + 1;

                Token::Slash
            }
            b'=' => {
                self.pos = start + 1;
                self.switch_state(Lexer::attribute_value_state);

                Token::Equals
            }
            b if is_quote(b) => self.quoted(start),
            _ => self.word(start),
        }
    }

    pub fn attribute_value_state(&mut self) -> Token {
        let bytes = self.input.as_bytes();
        let start = self.pos;

        match bytes[start] {
            b if is_whitespace(b) => self.whitespace(start),
            b if is_quote(b) => {
                self.switch_state(Lexer::tag_state);
                self.quoted(start)
            }
            b'>' => {
                self.pos = start + 1;
                self.switch_state(Lexer::data_state);

                Token::Gt
            }
            _ => {
                let mut pos = start;

                while pos < bytes.len() && !ends_unquoted_value(bytes, pos) {
                    pos += 1;
                }

                self.switch_state(Lexer::tag_state);

                if pos == start {
                    // NOTE: `/>` or `?>` right after `=`, leave them for the tag state.
                    return self.tag_state();
                }

                self.pos = pos;

                Token::Word
            }
        }
    }

    fn markup_start(&mut self, start: usize) -> Option<Token> {
        let bytes = self.input.as_bytes();

        if bytes.get(start + 1) == Some(&b'!') {
            return Some(self.bang_markup(start));
        }

        let (pos, token) = match (bytes.get(start + 1), bytes.get(start + 2)) {
            (Some(b'?'), Some(&b)) if is_alpha(b) => (start + 2, Token::XmlLt),
            (Some(b'/'), Some(&b)) if is_alpha(b) => (start + 1, Token::Lt),
            (Some(&b), _) if is_alpha(b) => (start + 1, Token::Lt),
            _ => return None,
        };

        self.pos = pos;
        self.switch_state(Lexer::tag_state);

        Some(token)
    }

    fn bang_markup(&mut self, start: usize) -> Token {
        let rest = &self.input[start..];

        if self.conditional_comments {
            if rest.starts_with("<!--[if") {
                let token = self.consume_until(start, 7, "]>", Token::CondCommentStart);

                if token == Token::CondCommentStart && self.input[self.pos..].starts_with("<!-->") {
                    self.pos += 5;
                }

                return token;
            }

            if let Some(end) = hidden_end_with_prefix(rest) {
                self.pos = start + end;

                return Token::CondCommentEnd;
            }
        }

        if rest.starts_with("<!--") {
            return self.consume_until(start, 4, "-->", Token::Comment);
        }

        if rest.starts_with("<![CDATA[") {
            return self.consume_until(start, 9, "]]>", Token::CData);
        }

        if let Some(after) = rest.strip_prefix("<![endif]") {
            if after.starts_with("-->") {
                self.pos = start + 12;

                return Token::CondCommentEnd;
            } else if after.starts_with('>') {
                self.pos = start + 10;

                return Token::CondCommentEnd;
            }
        }

        if rest.starts_with("<![if") {
            return self.consume_until(start, 5, "]>", Token::CondCommentStart);
        }

        self.directive(start)
    }

    fn directive(&mut self, start: usize) -> Token {
        let bytes = self.input.as_bytes();
        let mut pos = start + 2;

        while let Some(i) = memchr2(b'>', b'"', &bytes[pos..]) {
            let found = pos + i;

            if bytes[found] == b'>' {
                self.pos = found + 1;

                return Token::Directive;
            }

            match memchr(b'"', &bytes[found + 1..]) {
                Some(j) => pos = found + j + 2,
                None => break,
            }
        }

        self.pos = bytes.len();

        Token::Unknown
    }

    fn consume_until(&mut self, start: usize, skip: usize, terminator: &str, token: Token) -> Token {
        let from = start + skip;

        match self.input[from..].find(terminator) {
            Some(i) => {
                self.pos = from + i + terminator.len();

                token
            }
            None => {
                self.pos = self.input.len();

                Token::Unknown
            }
        }
    }

    fn whitespace(&mut self, start: usize) -> Token {
        let bytes = self.input.as_bytes();
        let mut pos = start + 1;

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        self.pos = pos;

        Token::Whitespace
    }

    fn quoted(&mut self, start: usize) -> Token {
        let bytes = self.input.as_bytes();
        let quote = bytes[start];

        match memchr(quote, &bytes[start + 1..]) {
            Some(i) => {
                self.pos = start + i + 2;

                Token::Quote
            }
            None => {
                self.pos = start + 1;

                Token::Unknown
            }
        }
    }

    fn word(&mut self, start: usize) -> Token {
        let bytes = self.input.as_bytes();
        let mut pos = start;

        while pos < bytes.len() && !ends_word(bytes, pos) {
            pos += 1;
        }

        if pos == start {
            self.pos = start + self.input[start..].chars().next().map_or(1, char::len_utf8);

            return Token::Unknown;
        }

        self.pos = pos;

        Token::Word
    }
}

#[inline]
fn starts_markup(bytes: &[u8], lt: usize) -> bool {
    match bytes.get(lt + 1) {
        Some(b'!') => true,
        Some(b'?' | b'/') => bytes.get(lt + 2).is_some_and(|&b| is_alpha(b)),
        Some(&b) => is_alpha(b),
        None => false,
    }
}

#[inline]
fn closes_tag_at(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1) == Some(&b'>')
}

#[inline]
fn ends_word(bytes: &[u8], pos: usize) -> bool {
    match bytes[pos] {
        b'<' | b'>' | b'/' | b'=' => true,
        b'?' => closes_tag_at(bytes, pos),
        b => is_whitespace(b) || is_quote(b),
    }
}

#[inline]
fn ends_unquoted_value(bytes: &[u8], pos: usize) -> bool {
    match bytes[pos] {
        b'>' => true,
        b'/' | b'?' => closes_tag_at(bytes, pos),
        b => is_whitespace(b),
    }
}

// `<!--<![endif]-->`, the end marker of a conditional comment that
// reveals its content to other browsers.
fn hidden_end_with_prefix(rest: &str) -> Option<usize> {
    const PREFIX: &str = "<!--<![endif";

    if !rest.starts_with(PREFIX) {
        return None;
    }

    let bracket = PREFIX.len() + rest[PREFIX.len()..].find(']')?;

    rest[bracket + 1..]
        .starts_with("-->")
        .then_some(bracket + 4)
}
