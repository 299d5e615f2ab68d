use super::{Combinator, SelectorError};
use crate::base::is_whitespace;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum SelectorToken<'s> {
    Element(&'s str),
    Id(&'s str),
    Class(&'s str),
    /// Content between `[` and `]`.
    Attribute(&'s str),
    PseudoClass(&'s str),
    PseudoFunction {
        name: &'s str,
        expression: &'s str,
    },
    Combinator(Combinator),
}

type LexResult<'s> = Option<Result<SelectorToken<'s>, SelectorError>>;

type State<'s> = fn(&mut SelectorLexer<'s>) -> LexResult<'s>;

/// Splits a single selector group (no top-level commas) into tokens.
///
/// Each chain node starts with an element token; an implicit `*` element is
/// produced when a node begins with an id, class, attribute or pseudo
/// selector. The lexer stops after the first error.
pub(super) struct SelectorLexer<'s> {
    input: &'s str,
    pos: usize,
    state: State<'s>,
}

impl<'s> SelectorLexer<'s> {
    pub fn new(input: &'s str) -> Self {
        SelectorLexer {
            input,
            pos: 0,
            state: SelectorLexer::node_start_state,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    #[inline]
    fn fail(&mut self, error: SelectorError) -> LexResult<'s> {
        self.state = SelectorLexer::end_state;

        Some(Err(error))
    }

    fn unexpected_char_or_end(&mut self) -> LexResult<'s> {
        let error = match self.peek() {
            Some(ch) => SelectorError::UnexpectedCharacter(ch, self.pos),
            None => SelectorError::UnexpectedEnd,
        };

        self.fail(error)
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();

        while self.pos < bytes.len() && is_whitespace(bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> &'s str {
        let start = self.pos;
        let mut chars = self.input[start..].char_indices();

        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((j, escaped)) => self.pos = start + j + escaped.len_utf8(),
                    None => {
                        self.pos = start + i + 1;
                        break;
                    }
                },
                ch if ch.is_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() => {
                    self.pos = start + i + ch.len_utf8();
                }
                _ => break,
            }
        }

        &self.input[start..self.pos]
    }

    /// Finds the end of a block opened at `self.pos` skipping quoted
    /// strings, returns the position of the closing character.
    fn block_end(&self, open: u8, close: u8) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut depth = 0usize;
        let mut quote = None;
        let mut pos = self.pos;

        while pos < bytes.len() {
            let b = bytes[pos];

            match quote {
                Some(q) if b == q => quote = None,
                Some(_) if b == b'\\' => pos += 1,
                Some(_) => (),
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'\\' => pos += 1,
                    b if b == open => depth += 1,
                    b if b == close => {
                        depth -= 1;

                        if depth == 0 {
                            return Some(pos);
                        }
                    }
                    _ => (),
                },
            }

            pos += 1;
        }

        None
    }

    fn node_start_state(&mut self) -> LexResult<'s> {
        self.skip_whitespace();

        let ch = self.peek()?;

        self.state = SelectorLexer::selector_state;

        match ch {
            '*' => {
                self.pos += 1;

                Some(Ok(SelectorToken::Element("*")))
            }
            '#' | '.' | '[' | ':' => Some(Ok(SelectorToken::Element("*"))),
            '>' | '+' | '~' => self.fail(SelectorError::InvalidCombinator(ch)),
            _ => match self.identifier() {
                "" => self.unexpected_char_or_end(),
                name => Some(Ok(SelectorToken::Element(name))),
            },
        }
    }

    fn selector_state(&mut self) -> LexResult<'s> {
        let ch = self.peek()?;

        match ch {
            '#' | '.' => {
                self.pos += 1;

                match self.identifier() {
                    "" => self.unexpected_char_or_end(),
                    name if ch == '#' => Some(Ok(SelectorToken::Id(name))),
                    name => Some(Ok(SelectorToken::Class(name))),
                }
            }
            '[' => match self.block_end(b'[', b']') {
                Some(end) => {
                    let inner = &self.input[self.pos + 1..end];

                    self.pos = end + 1;

                    Some(Ok(SelectorToken::Attribute(inner)))
                }
                None => self.fail(SelectorError::UnclosedAttributeSelector),
            },
            ':' => self.pseudo(),
            '>' | '+' | '~' => self.combinator(),
            ch if ch.is_ascii() && is_whitespace(ch as u8) => self.combinator(),
            _ => self.unexpected_char_or_end(),
        }
    }

    fn pseudo(&mut self) -> LexResult<'s> {
        self.pos += 1;

        if self.peek() == Some(':') {
            self.pos += 1;
        }

        let name = match self.identifier() {
            "" => return self.unexpected_char_or_end(),
            name => name,
        };

        if self.peek() != Some('(') {
            return Some(Ok(SelectorToken::PseudoClass(name)));
        }

        match self.block_end(b'(', b')') {
            Some(end) => {
                let expression = &self.input[self.pos + 1..end];

                self.pos = end + 1;

                Some(Ok(SelectorToken::PseudoFunction { name, expression }))
            }
            None => self.fail(SelectorError::UnclosedPseudoFunction(name.to_string())),
        }
    }

    fn combinator(&mut self) -> LexResult<'s> {
        self.skip_whitespace();

        let mut combinator = Combinator::Descendant;

        if let Some(symbol) = self.peek().and_then(Combinator::from_symbol) {
            combinator = symbol;
            self.pos += 1;
            self.skip_whitespace();
        }

        self.state = SelectorLexer::node_start_state;

        Some(Ok(SelectorToken::Combinator(combinator)))
    }

    fn end_state(&mut self) -> LexResult<'s> {
        None
    }
}

impl<'s> Iterator for SelectorLexer<'s> {
    type Item = Result<SelectorToken<'s>, SelectorError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        (self.state)(self)
    }
}
