mod ast;
mod compiler;
mod error;
mod lexer;
mod matcher;
mod pseudo;
mod target;

pub use self::ast::{
    AttributeSelector, Combinator, CssSelector, MatchType, SelectorChain, SimpleSelector,
};
pub use self::compiler::compile;
pub use self::error::SelectorError;
pub use self::matcher::{NodeMatcher, NodeSelector};
pub use self::pseudo::{NthExpression, PseudoClass, PseudoFunction};
pub use self::target::{Children, NodeType, SelectorTarget};
