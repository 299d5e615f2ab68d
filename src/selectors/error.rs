use thiserror::Error;

/// Selector compilation failure. A selector either compiles completely or not
/// at all.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum SelectorError {
    #[error("Unexpected character `{0}` at position {1} in the selector.")]
    UnexpectedCharacter(char, usize),

    #[error("Unexpected end of the selector.")]
    UnexpectedEnd,

    #[error("Unexpected combinator `{0}` in the selector.")]
    InvalidCombinator(char),

    #[error("Dangling combinator in the selector.")]
    DanglingCombinator,

    #[error("The selector is empty.")]
    EmptySelector,

    #[error("Unsupported pseudo class `:{0}`.")]
    UnsupportedPseudoClass(String),

    #[error("Unsupported pseudo function `:{0}()`.")]
    UnsupportedPseudoFunction(String),

    #[error("Missing closing parenthesis of the pseudo function `:{0}()`.")]
    UnclosedPseudoFunction(String),

    #[error("Missing closing bracket of the attribute selector.")]
    UnclosedAttributeSelector,

    #[error("Missing attribute name in the attribute selector.")]
    MissingAttributeName,

    #[error("Unexpected token in the attribute selector.")]
    UnexpectedTokenInAttr,

    #[error("Invalid expression `{expression}` of the pseudo function `:{name}()`.")]
    InvalidExpression { name: String, expression: String },
}
