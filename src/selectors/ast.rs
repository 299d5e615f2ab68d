use super::pseudo::{PseudoClass, PseudoFunction};
use super::target::SelectorTarget;
use super::SelectorError;
use crate::base::is_whitespace;
use std::fmt::{self, Display};

/// Relation between a chain node and the next one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

impl Combinator {
    #[inline]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '>' => Some(Combinator::Child),
            '+' => Some(Combinator::AdjacentSibling),
            '~' => Some(Combinator::GeneralSibling),
            _ => None,
        }
    }

    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Combinator::Descendant => ' ',
            Combinator::Child => '>',
            Combinator::AdjacentSibling => '+',
            Combinator::GeneralSibling => '~',
        }
    }
}

impl Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Descendant => f.write_str(" "),
            c => write!(f, " {} ", c.symbol()),
        }
    }
}

/// Attribute value operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// `=`
    Equals,
    /// `~=`, whitespace separated word.
    Includes,
    /// `|=`, exact value or value followed by `-`.
    Dash,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl MatchType {
    fn from_prefix_char(ch: u8) -> Option<Self> {
        match ch {
            b'~' => Some(MatchType::Includes),
            b'|' => Some(MatchType::Dash),
            b'^' => Some(MatchType::Prefix),
            b'$' => Some(MatchType::Suffix),
            b'*' => Some(MatchType::Substring),
            _ => None,
        }
    }

    #[inline]
    pub fn sign(self) -> &'static str {
        match self {
            MatchType::Equals => "=",
            MatchType::Includes => "~=",
            MatchType::Dash => "|=",
            MatchType::Prefix => "^=",
            MatchType::Suffix => "$=",
            MatchType::Substring => "*=",
        }
    }

    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            MatchType::Equals => actual == expected,
            MatchType::Includes => {
                !expected.is_empty()
                    && actual
                        .split(|c: char| c.is_ascii() && is_whitespace(c as u8))
                        .any(|word| word == expected)
            }
            MatchType::Dash => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            MatchType::Prefix => !expected.is_empty() && actual.starts_with(expected),
            MatchType::Suffix => !expected.is_empty() && actual.ends_with(expected),
            MatchType::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// Removes escaping backslashes, `\x` becomes `x`.
pub(super) fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    name: String,
    match_type: Option<MatchType>,
    value: Option<String>,
    quote: Option<char>,
}

impl AttributeSelector {
    #[inline]
    pub(super) fn id(value: String) -> Self {
        AttributeSelector {
            name: "id".into(),
            match_type: Some(MatchType::Equals),
            value: Some(value),
            quote: None,
        }
    }

    #[inline]
    pub(super) fn class(value: String) -> Self {
        AttributeSelector {
            name: "class".into(),
            match_type: Some(MatchType::Includes),
            value: Some(value),
            quote: None,
        }
    }

    /// Parses the content of an `[...]` block.
    pub(super) fn parse(inner: &str) -> Result<Self, SelectorError> {
        let inner = inner.trim();

        let Some(eq) = inner.find('=') else {
            return Ok(AttributeSelector {
                name: Self::parse_name(inner)?,
                match_type: None,
                value: None,
                quote: None,
            });
        };

        let (name_end, match_type) = match eq
            .checked_sub(1)
            .and_then(|i| MatchType::from_prefix_char(inner.as_bytes()[i]))
        {
            Some(match_type) => (eq - 1, match_type),
            None => (eq, MatchType::Equals),
        };

        let name = Self::parse_name(&inner[..name_end])?;
        let value = inner[eq + 1..].trim();

        let (value, quote) = match value.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let unquoted = value
                    .strip_prefix(q)
                    .and_then(|v| v.strip_suffix(q))
                    .ok_or(SelectorError::UnexpectedTokenInAttr)?;

                (unquoted, Some(q))
            }
            Some(_) if !value.contains(char::is_whitespace) => (value, None),
            _ => return Err(SelectorError::UnexpectedTokenInAttr),
        };

        Ok(AttributeSelector {
            name,
            match_type: Some(match_type),
            value: Some(unescape(value)),
            quote,
        })
    }

    fn parse_name(name: &str) -> Result<String, SelectorError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(SelectorError::MissingAttributeName);
        }

        if name.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
            return Err(SelectorError::UnexpectedTokenInAttr);
        }

        Ok(unescape(name))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn match_type(&self) -> Option<MatchType> {
        self.match_type
    }

    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[inline]
    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    pub fn matches<N: SelectorTarget>(&self, node: &N) -> bool {
        let Some(actual) = node.attribute(&self.name, false) else {
            return false;
        };

        match (self.match_type, &self.value) {
            (Some(match_type), Some(expected)) => match_type.matches(&actual, expected),
            _ => true,
        }
    }
}

impl Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.match_type, &self.value, self.quote) {
            (Some(MatchType::Equals), Some(value), None) if self.name == "id" => {
                write!(f, "#{value}")
            }
            (Some(MatchType::Includes), Some(value), None) if self.name == "class" => {
                write!(f, ".{value}")
            }
            (Some(match_type), Some(value), Some(quote)) => {
                write!(f, "[{}{}{quote}{value}{quote}]", self.name, match_type.sign())
            }
            (Some(match_type), Some(value), None) => {
                write!(f, "[{}{}{value}]", self.name, match_type.sign())
            }
            _ => write!(f, "[{}]", self.name),
        }
    }
}

/// A simple selector attached to a chain node.
#[derive(Debug, Clone)]
pub enum SimpleSelector {
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
    PseudoFunction {
        function: PseudoFunction,
        expression: String,
    },
}

impl SimpleSelector {
    /// Checks the selector against the node and its place in the tree.
    pub fn matches<N: SelectorTarget>(&self, node: &N) -> bool {
        match self {
            SimpleSelector::Attribute(attribute) => attribute.matches(node),
            SimpleSelector::PseudoClass(class) => class.matches(node),
            SimpleSelector::PseudoFunction { function, .. } => function.matches(node),
        }
    }

    /// Checks the selector against the position of a candidate in the list
    /// of candidates matched by the same chain node.
    pub fn matches_in_results(&self, index: usize, results_len: usize) -> bool {
        match self {
            SimpleSelector::Attribute(_) => true,
            SimpleSelector::PseudoClass(class) => class.matches_in_results(index, results_len),
            SimpleSelector::PseudoFunction { function, .. } => {
                function.matches_in_results(index, results_len)
            }
        }
    }

    #[inline]
    fn is_result_relative(&self) -> bool {
        match self {
            SimpleSelector::Attribute(_) => false,
            SimpleSelector::PseudoClass(class) => class.is_result_relative(),
            SimpleSelector::PseudoFunction { function, .. } => function.is_result_relative(),
        }
    }
}

impl Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Attribute(attribute) => attribute.fmt(f),
            SimpleSelector::PseudoClass(class) => write!(f, ":{}", class.name()),
            SimpleSelector::PseudoFunction {
                function,
                expression,
            } => write!(f, ":{}({expression})", function.name()),
        }
    }
}

/// One node of a selector chain: an element name with the simple selectors
/// attached to it and the combinator relating it to the next node.
#[derive(Debug, Clone)]
pub struct CssSelector {
    element: String,
    selectors: Vec<SimpleSelector>,
    combinator: Option<Combinator>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl CssSelector {
    pub(super) fn new(element: String) -> Self {
        CssSelector {
            element,
            selectors: Vec::new(),
            combinator: None,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(super) fn add_selector(&mut self, selector: SimpleSelector) {
        self.selectors.push(selector);
    }

    #[inline]
    pub(super) fn set_combinator(&mut self, combinator: Combinator) {
        self.combinator = Some(combinator);
    }

    /// Element name, `*` for any element.
    #[inline]
    pub fn element(&self) -> &str {
        &self.element
    }

    #[inline]
    pub fn selectors(&self) -> &[SimpleSelector] {
        &self.selectors
    }

    /// Relation to the next node, `None` for the last node of a chain.
    #[inline]
    pub fn combinator(&self) -> Option<Combinator> {
        self.combinator
    }

    /// Index of the previous node in the chain.
    #[inline]
    pub fn prev_index(&self) -> Option<usize> {
        self.prev
    }

    /// Index of the next node in the chain.
    #[inline]
    pub fn next_index(&self) -> Option<usize> {
        self.next
    }

    #[inline]
    fn matches_element<N: SelectorTarget>(&self, node: &N) -> bool {
        node.is_element()
            && (self.element == "*" || node.node_name().eq_ignore_ascii_case(&self.element))
    }

    /// Checks the element name and all simple selectors against the node.
    /// Selectors relative to the result list always pass here.
    pub fn matches<N: SelectorTarget>(&self, node: &N) -> bool {
        self.matches_element(node) && self.selectors.iter().all(|s| s.matches(node))
    }

    /// Checks the selectors relative to the result list.
    pub fn matches_in_results(&self, index: usize, results_len: usize) -> bool {
        self.selectors
            .iter()
            .all(|s| s.matches_in_results(index, results_len))
    }

    #[inline]
    pub(super) fn has_result_relative_selectors(&self) -> bool {
        self.selectors.iter().any(SimpleSelector::is_result_relative)
    }
}

impl Display for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.element)?;

        for selector in &self.selectors {
            selector.fmt(f)?;
        }

        Ok(())
    }
}

/// A compiled selector group: chain nodes linked by combinators.
///
/// Chains are immutable once compiled and can be shared between threads and
/// reused for any number of matches.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    nodes: Vec<CssSelector>,
}

impl SelectorChain {
    /// Links the nodes: clears the trailing descendant combinator and wires
    /// the previous and next indices.
    pub(super) fn link(mut nodes: Vec<CssSelector>) -> Result<Self, SelectorError> {
        let last = nodes.len().checked_sub(1).ok_or(SelectorError::EmptySelector)?;

        match nodes[last].combinator.take() {
            None | Some(Combinator::Descendant) => (),
            Some(_) => return Err(SelectorError::DanglingCombinator),
        }

        for (i, node) in nodes.iter_mut().enumerate() {
            node.prev = i.checked_sub(1);
            node.next = (i < last).then_some(i + 1);

            if i < last && node.combinator.is_none() {
                node.combinator = Some(Combinator::Descendant);
            }
        }

        Ok(SelectorChain { nodes })
    }

    #[inline]
    pub fn nodes(&self) -> &[CssSelector] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn first(&self) -> &CssSelector {
        &self.nodes[0]
    }

    #[inline]
    pub fn last(&self) -> &CssSelector {
        &self.nodes[self.nodes.len() - 1]
    }

    #[inline]
    pub fn prev(&self, node: &CssSelector) -> Option<&CssSelector> {
        node.prev.map(|i| &self.nodes[i])
    }

    #[inline]
    pub fn next(&self, node: &CssSelector) -> Option<&CssSelector> {
        node.next.map(|i| &self.nodes[i])
    }
}

impl Display for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            node.fmt(f)?;

            if let Some(combinator) = node.combinator {
                combinator.fmt(f)?;
            }
        }

        Ok(())
    }
}
