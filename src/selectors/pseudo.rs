use super::compiler::compile;
use super::matcher::{NodeMatcher, NodeSelector};
use super::target::SelectorTarget;
use super::{SelectorChain, SelectorError};
use cssparser::{parse_nth, ParseError, Parser as CssParser, ParserInput};

macro_rules! declare_pseudo_classes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Argument-less pseudo-class.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum PseudoClass {
            $($variant),+
        }

        impl PseudoClass {
            pub fn from_name(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case($name) {
                        return Some(PseudoClass::$variant);
                    }
                )+

                None
            }

            #[inline]
            pub fn name(self) -> &'static str {
                match self {
                    $(PseudoClass::$variant => $name),+
                }
            }
        }
    };
}

declare_pseudo_classes! {
    FirstChild => "first-child",
    LastChild => "last-child",
    OnlyChild => "only-child",
    FirstOfType => "first-of-type",
    LastOfType => "last-of-type",
    OnlyOfType => "only-of-type",
    Root => "root",
    Empty => "empty",
    First => "first",
    Last => "last",
    Even => "even",
    Odd => "odd",
    Button => "button",
    Checkbox => "checkbox",
    File => "file",
    Image => "image",
    Password => "password",
    Radio => "radio",
    Reset => "reset",
    Submit => "submit",
    Text => "text",
    Header => "header",
    Input => "input",
    Parent => "parent",
    Selected => "selected",
    Checked => "checked",
}

#[inline]
fn has_type<N: SelectorTarget>(node: &N, expected: &str) -> bool {
    node.attribute("type", false).as_deref() == Some(expected)
}

impl PseudoClass {
    /// Pseudo-classes that filter the list of candidates matched by a chain
    /// node rather than look at the tree.
    #[inline]
    pub fn is_result_relative(self) -> bool {
        matches!(
            self,
            PseudoClass::First | PseudoClass::Last | PseudoClass::Even | PseudoClass::Odd
        )
    }

    pub fn matches<N: SelectorTarget>(self, node: &N) -> bool {
        match self {
            PseudoClass::FirstChild => node.previous_sibling_element().is_none(),
            PseudoClass::LastChild => node.next_sibling_element().is_none(),
            PseudoClass::OnlyChild => {
                node.previous_sibling_element().is_none() && node.next_sibling_element().is_none()
            }
            PseudoClass::FirstOfType => node.sibling_name_index() == 0,
            PseudoClass::LastOfType => node.next_sibling_named().is_none(),
            PseudoClass::OnlyOfType => {
                node.sibling_name_index() == 0 && node.next_sibling_named().is_none()
            }
            PseudoClass::Root => node
                .parent()
                .is_some_and(|p| p.node_type() == super::NodeType::Document),
            PseudoClass::Empty => node.first_child().is_none(),
            PseudoClass::Parent => node.first_child().is_some(),
            PseudoClass::First | PseudoClass::Last | PseudoClass::Even | PseudoClass::Odd => true,
            PseudoClass::Button => has_type(node, "button"),
            PseudoClass::Checkbox => has_type(node, "checkbox"),
            PseudoClass::File => has_type(node, "file"),
            PseudoClass::Image => has_type(node, "image"),
            PseudoClass::Password => has_type(node, "password"),
            PseudoClass::Radio => has_type(node, "radio"),
            PseudoClass::Reset => has_type(node, "reset"),
            PseudoClass::Submit => has_type(node, "submit"),
            PseudoClass::Text => has_type(node, "text"),
            PseudoClass::Header => {
                let name = node.node_name();

                matches!(name.as_bytes(), [b'h' | b'H', b'1'..=b'6'])
            }
            PseudoClass::Input => {
                let name = node.node_name();

                ["button", "input", "select", "textarea"]
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(&name))
            }
            PseudoClass::Selected => node.has_attribute("selected"),
            PseudoClass::Checked => node.has_attribute("checked"),
        }
    }

    pub fn matches_in_results(self, index: usize, results_len: usize) -> bool {
        match self {
            PseudoClass::First => index == 0,
            PseudoClass::Last => index + 1 == results_len,
            PseudoClass::Even => index % 2 == 0,
            PseudoClass::Odd => index % 2 != 0,
            _ => true,
        }
    }
}

/// An `an+b` formula matching 1-based positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NthExpression {
    a: i32,
    b: i32,
}

impl NthExpression {
    #[inline]
    pub fn new(a: i32, b: i32) -> Self {
        NthExpression { a, b }
    }

    /// Parses `odd`, `even`, `5`, `-n+6`, `+3n - 2` and the like.
    pub fn parse(expression: &str) -> Option<Self> {
        let mut input = ParserInput::new(expression);
        let mut parser = CssParser::new(&mut input);

        parser
            .parse_entirely(|p| parse_nth(p).map_err(ParseError::<()>::from))
            .ok()
            .map(|(a, b)| NthExpression { a, b })
    }

    #[inline]
    pub fn a(self) -> i32 {
        self.a
    }

    #[inline]
    pub fn b(self) -> i32 {
        self.b
    }

    pub fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };

        let (a, b) = (i64::from(self.a), i64::from(self.b));

        match a {
            0 => position == b,
            a if a > 0 => position >= b && (position - b) % a == 0,
            a => position <= b && (b - position) % -a == 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PseudoFunction {
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),
    Eq(i64),
    Gt(i64),
    Lt(i64),
    Contains(String),
    Has(Vec<SelectorChain>),
    Not(Vec<SelectorChain>),
}

fn strip_quotes(expression: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = expression
            .strip_prefix(quote)
            .and_then(|e| e.strip_suffix(quote))
        {
            return inner;
        }
    }

    expression
}

impl PseudoFunction {
    pub fn parse(name: &str, expression: &str) -> Result<Self, SelectorError> {
        let invalid_expression = || SelectorError::InvalidExpression {
            name: name.to_string(),
            expression: expression.to_string(),
        };

        let nth = || NthExpression::parse(expression).ok_or_else(invalid_expression);
        let integer = || expression.trim().parse::<i64>().map_err(|_| invalid_expression());
        let trimmed = expression.trim();

        Ok(match name.to_ascii_lowercase().as_str() {
            "nth-child" => PseudoFunction::NthChild(nth()?),
            "nth-last-child" => PseudoFunction::NthLastChild(nth()?),
            "nth-of-type" => PseudoFunction::NthOfType(nth()?),
            "nth-last-of-type" => PseudoFunction::NthLastOfType(nth()?),
            "eq" => PseudoFunction::Eq(integer()?),
            "gt" => PseudoFunction::Gt(integer()?),
            "lt" => PseudoFunction::Lt(integer()?),
            "contains" => PseudoFunction::Contains(strip_quotes(trimmed).to_string()),
            "has" => PseudoFunction::Has(compile(strip_quotes(trimmed))?),
            "not" => PseudoFunction::Not(compile(strip_quotes(trimmed))?),
            _ => return Err(SelectorError::UnsupportedPseudoFunction(name.to_string())),
        })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            PseudoFunction::NthChild(_) => "nth-child",
            PseudoFunction::NthLastChild(_) => "nth-last-child",
            PseudoFunction::NthOfType(_) => "nth-of-type",
            PseudoFunction::NthLastOfType(_) => "nth-last-of-type",
            PseudoFunction::Eq(_) => "eq",
            PseudoFunction::Gt(_) => "gt",
            PseudoFunction::Lt(_) => "lt",
            PseudoFunction::Contains(_) => "contains",
            PseudoFunction::Has(_) => "has",
            PseudoFunction::Not(_) => "not",
        }
    }

    #[inline]
    pub fn is_result_relative(&self) -> bool {
        matches!(
            self,
            PseudoFunction::Eq(_) | PseudoFunction::Gt(_) | PseudoFunction::Lt(_)
        )
    }

    pub fn matches<N: SelectorTarget>(&self, node: &N) -> bool {
        match self {
            PseudoFunction::NthChild(nth) => nth.matches(node.sibling_element_index() + 1),
            PseudoFunction::NthLastChild(nth) => {
                let following = std::iter::successors(node.next_sibling_element(), |n| {
                    n.next_sibling_element()
                })
                .count();

                nth.matches(following + 1)
            }
            PseudoFunction::NthOfType(nth) => nth.matches(node.sibling_name_index() + 1),
            PseudoFunction::NthLastOfType(nth) => {
                let following =
                    std::iter::successors(node.next_sibling_named(), |n| n.next_sibling_named())
                        .count();

                nth.matches(following + 1)
            }
            PseudoFunction::Eq(_) | PseudoFunction::Gt(_) | PseudoFunction::Lt(_) => true,
            PseudoFunction::Contains(text) => node.text_content().contains(text.as_str()),
            PseudoFunction::Has(chains) => !NodeSelector::new(node.clone())
                .select(chains)
                .is_empty(),
            PseudoFunction::Not(chains) => !NodeMatcher::new(node.clone()).matches(chains),
        }
    }

    pub fn matches_in_results(&self, index: usize, results_len: usize) -> bool {
        // NOTE: indices are bounded by the result list length, so they fit.
        let index = index as i64;

        match *self {
            PseudoFunction::Eq(n) if n >= 0 => index == n,
            PseudoFunction::Eq(n) => index == results_len as i64 + n,
            PseudoFunction::Gt(n) => index > n,
            PseudoFunction::Lt(n) => index < n,
            _ => true,
        }
    }
}
