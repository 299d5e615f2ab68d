use memchr::{memchr_iter, memrchr};
use std::fmt::{self, Display};

/// Location of a tag in the parsed input.
///
/// `line` and `column` are 1-based. When position calculation is disabled
/// they are both `0` and only `offset` is meaningful.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[inline]
    pub fn offset_only(offset: usize) -> Self {
        Position {
            offset,
            line: 0,
            column: 0,
        }
    }

    #[inline]
    pub fn calculate(input: &str, offset: usize) -> Self {
        let (line, column) = line_and_column(input, offset);

        Position {
            offset,
            line,
            column,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.offset)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Line and column bookkeeping for offsets that move forward through the
/// input. Each call only scans the bytes since the previous one.
#[derive(Debug, Copy, Clone)]
pub struct PositionCursor {
    last: Position,
}

impl Default for PositionCursor {
    #[inline]
    fn default() -> Self {
        PositionCursor {
            last: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }
}

impl PositionCursor {
    pub fn advance(&mut self, input: &str, offset: usize) -> Position {
        let offset = offset.min(input.len());

        if offset < self.last.offset {
            return Position::calculate(input, offset);
        }

        let bytes = input.as_bytes();
        let skipped = &bytes[self.last.offset..offset];

        match memrchr(b'\n', skipped) {
            Some(last_nl) => {
                let line_start = self.last.offset + last_nl + 1;

                self.last.line += memchr_iter(b'\n', skipped).count();
                self.last.column = char_count(&bytes[line_start..offset]) + 1;
            }
            None => self.last.column += char_count(skipped),
        }

        self.last.offset = offset;

        self.last
    }
}

#[inline]
fn char_count(bytes: &[u8]) -> usize {
    // NOTE: UTF-8 continuation bytes are 0b10xx_xxxx.
    bytes.iter().filter(|&&b| (b as i8) >= -0x40).count()
}

/// 1-based line and column of the byte `offset` in `input`. Columns are
/// counted in characters.
pub fn line_and_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let head = &input.as_bytes()[..offset];
    let line_start = memrchr(b'\n', head).map_or(0, |nl| nl + 1);
    let line = memchr_iter(b'\n', head).count() + 1;

    (line, char_count(&head[line_start..]) + 1)
}
