//! `tagscan` is a lenient, low-allocation markup tag scanner paired with a CSS
//! selector engine.
//!
//! The [`Parser`] walks HTML/XML-like input once and reports tags, text,
//! comments, CDATA sections, directives, conditional comments and raw text
//! bodies to a [`TagVisitor`]. Malformed markup never stops parsing: problems
//! are reported through [`TagVisitor::error`] and the offending input is kept
//! as text.
//!
//! Selectors are compiled once with [`compile`] into immutable
//! [`SelectorChain`]s and matched against any tree exposing the
//! [`SelectorTarget`] capability with a [`NodeSelector`].
//!
//! ```
//! use tagscan::{Parser, TagWriter};
//!
//! let mut output = String::new();
//! let mut writer = TagWriter::new(|chunk: &str| output.push_str(chunk));
//!
//! Parser::new("<p class=note>Hello</p>").parse(&mut writer).unwrap();
//!
//! assert_eq!(output, r#"<p class=note>Hello</p>"#);
//! ```

#[macro_use]
mod base;

mod parser;
mod selectors;
mod visitor;

use cfg_if::cfg_if;

pub use self::base::Position;
pub use self::parser::{
    Attribute, Parser, ParserSettings, ParsingError, Tag, TagFilter, TagType,
};
pub use self::selectors::{
    compile, AttributeSelector, Children, Combinator, CssSelector, MatchType, NodeMatcher,
    NodeSelector, NodeType, NthExpression, PseudoClass, PseudoFunction, SelectorChain,
    SelectorError, SelectorTarget, SimpleSelector,
};
pub use self::visitor::{
    HandlerResult, OutputSink, TagAdapter, TagVisitor, TagVisitorChain, TagWriter,
};

cfg_if! {
    if #[cfg(feature = "integration_test")] {
        pub mod test_utils {
            pub use crate::parser::{Lexer, Token};
        }
    }
}
