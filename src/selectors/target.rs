use std::borrow::Cow;
use std::hash::Hash;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    CData,
    Directive,
    Other,
}

/// Query capability of a tree that selectors are matched against.
///
/// Implementors are cheap node handles (an index into an arena, a reference
/// counted pointer, ...). Equal handles must denote the same node.
///
/// The provided navigation methods are built on top of the required ones and
/// can be overridden when the tree has faster means to answer them.
pub trait SelectorTarget: Clone + Eq + Hash {
    fn node_type(&self) -> NodeType;

    /// Tag name for elements.
    fn node_name(&self) -> Cow<'_, str>;

    /// Content of text, comment and CDATA nodes.
    fn node_value(&self) -> Option<Cow<'_, str>>;

    /// Attribute value, boolean attributes yield an empty string.
    fn attribute(&self, name: &str, case_sensitive: bool) -> Option<Cow<'_, str>>;

    fn parent(&self) -> Option<Self>;

    fn first_child(&self) -> Option<Self>;

    fn last_child(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    fn previous_sibling(&self) -> Option<Self>;

    #[inline]
    fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    #[inline]
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name, false).is_some()
    }

    #[inline]
    fn children(&self) -> Children<Self> {
        Children {
            next: self.first_child(),
        }
    }

    fn child_count(&self) -> usize {
        self.children().count()
    }

    fn child_element_count(&self) -> usize {
        self.children().filter(|c| c.is_element()).count()
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let mut sibling = self.next_sibling();

        while let Some(node) = sibling {
            if node.is_element() {
                return Some(node);
            }

            sibling = node.next_sibling();
        }

        None
    }

    fn previous_sibling_element(&self) -> Option<Self> {
        let mut sibling = self.previous_sibling();

        while let Some(node) = sibling {
            if node.is_element() {
                return Some(node);
            }

            sibling = node.previous_sibling();
        }

        None
    }

    /// 0-based index among element siblings.
    fn sibling_element_index(&self) -> usize {
        let mut index = 0;
        let mut sibling = self.previous_sibling_element();

        while let Some(node) = sibling {
            index += 1;
            sibling = node.previous_sibling_element();
        }

        index
    }

    /// 0-based index among element siblings with the same name.
    fn sibling_name_index(&self) -> usize {
        let name = self.node_name();
        let mut index = 0;
        let mut sibling = self.previous_sibling_element();

        while let Some(node) = sibling {
            if node.node_name().eq_ignore_ascii_case(&name) {
                index += 1;
            }

            sibling = node.previous_sibling_element();
        }

        index
    }

    /// Next element sibling with the same name.
    fn next_sibling_named(&self) -> Option<Self> {
        let name = self.node_name();
        let mut sibling = self.next_sibling_element();

        while let Some(node) = sibling {
            if node.node_name().eq_ignore_ascii_case(&name) {
                return Some(node);
            }

            sibling = node.next_sibling_element();
        }

        None
    }

    fn last_child_element_named(&self, name: &str) -> Option<Self> {
        let mut child = self.last_child();

        while let Some(node) = child {
            if node.is_element() && node.node_name().eq_ignore_ascii_case(name) {
                return Some(node);
            }

            child = node.previous_sibling();
        }

        None
    }

    /// Concatenated content of all descendant text and CDATA nodes in
    /// document order.
    fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack: Vec<Self> = self.children().collect();

        stack.reverse();

        while let Some(node) = stack.pop() {
            match node.node_type() {
                NodeType::Text | NodeType::CData => {
                    if let Some(value) = node.node_value() {
                        text.push_str(&value);
                    }
                }
                _ => {
                    let len = stack.len();

                    stack.extend(node.children());
                    stack[len..].reverse();
                }
            }
        }

        text
    }
}

/// Iterator over the child nodes of a node.
#[derive(Debug, Clone)]
pub struct Children<N> {
    next: Option<N>,
}

impl<N: SelectorTarget> Iterator for Children<N> {
    type Item = N;

    #[inline]
    fn next(&mut self) -> Option<N> {
        let node = self.next.take()?;

        self.next = node.next_sibling();

        Some(node)
    }
}
