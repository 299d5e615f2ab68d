use super::ast::unescape;
use super::lexer::{SelectorLexer, SelectorToken};
use super::pseudo::{PseudoClass, PseudoFunction};
use super::{AttributeSelector, CssSelector, SelectorChain, SelectorError, SimpleSelector};
use log::debug;

/// Compiles a selector string into one chain per comma separated group.
pub fn compile(selector: &str) -> Result<Vec<SelectorChain>, SelectorError> {
    split_groups(selector)
        .into_iter()
        .map(|group| -> Result<_, SelectorError> {
            let chain = compile_group(group)?;

            debug!("Compiled selector group `{}` as `{}`", group.trim(), chain);

            Ok(chain)
        })
        .collect()
}

/// Splits at commas that are outside of brackets, parentheses and quotes.
fn split_groups(selector: &str) -> Vec<&str> {
    let bytes = selector.as_bytes();
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];

        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {
                if b == b'\\' {
                    pos += 1;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'\\' => pos += 1,
                b'[' | b'(' => depth += 1,
                b']' | b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    groups.push(&selector[start..pos]);
                    start = pos + 1;
                }
                _ => (),
            },
        }

        pos += 1;
    }

    groups.push(&selector[start..]);
    groups
}

#[inline]
fn current_node(nodes: &mut [CssSelector]) -> Result<&mut CssSelector, SelectorError> {
    nodes.last_mut().ok_or(SelectorError::EmptySelector)
}

fn compile_group(group: &str) -> Result<SelectorChain, SelectorError> {
    let mut nodes = Vec::new();

    for token in SelectorLexer::new(group) {
        let token = token?;

        trace!(@selector token);

        let selector = match token {
            SelectorToken::Element(name) => {
                nodes.push(CssSelector::new(unescape(name)));
                continue;
            }
            SelectorToken::Combinator(combinator) => {
                current_node(&mut nodes)?.set_combinator(combinator);
                continue;
            }
            SelectorToken::Id(id) => SimpleSelector::Attribute(AttributeSelector::id(unescape(id))),
            SelectorToken::Class(class) => {
                SimpleSelector::Attribute(AttributeSelector::class(unescape(class)))
            }
            SelectorToken::Attribute(inner) => {
                SimpleSelector::Attribute(AttributeSelector::parse(inner)?)
            }
            SelectorToken::PseudoClass(name) => PseudoClass::from_name(name)
                .map(SimpleSelector::PseudoClass)
                .ok_or_else(|| SelectorError::UnsupportedPseudoClass(name.to_string()))?,
            SelectorToken::PseudoFunction { name, expression } => SimpleSelector::PseudoFunction {
                function: PseudoFunction::parse(name, expression)?,
                expression: expression.to_string(),
            },
        };

        current_node(&mut nodes)?.add_selector(selector);
    }

    SelectorChain::link(nodes)
}
