#[macro_use]
mod debug_trace;

mod chars;
mod position;
mod range;

pub use self::chars::{is_alpha, is_quote, is_whitespace};
pub use self::position::{Position, PositionCursor};
pub use self::range::Range;
