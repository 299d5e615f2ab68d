use super::compiler::compile;
use super::target::SelectorTarget;
use super::{Combinator, CssSelector, SelectorChain, SelectorError};
use hashbrown::HashSet;

/// Insertion ordered node set.
struct NodeSet<N> {
    nodes: Vec<N>,
    seen: HashSet<N>,
}

impl<N: SelectorTarget> NodeSet<N> {
    #[inline]
    fn new() -> Self {
        NodeSet {
            nodes: Vec::new(),
            seen: HashSet::new(),
        }
    }

    #[inline]
    fn insert(&mut self, node: N) {
        if !self.seen.contains(&node) {
            self.seen.insert(node.clone());
            self.nodes.push(node);
        }
    }

    #[inline]
    fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

/// Selects the descendants of a root node that match compiled selectors.
///
/// The root itself is never part of the results. Results are in document
/// order within a group, groups are concatenated in order and every node
/// appears at most once.
#[derive(Debug, Clone)]
pub struct NodeSelector<N> {
    root: N,
}

impl<N: SelectorTarget> NodeSelector<N> {
    #[inline]
    pub fn new(root: N) -> Self {
        NodeSelector { root }
    }

    pub fn select(&self, chains: &[SelectorChain]) -> Vec<N> {
        let mut results = NodeSet::new();

        for chain in chains {
            for node in self.select_chain(chain) {
                results.insert(node);
            }
        }

        results.into_vec()
    }

    /// Compiles the query and selects with it.
    pub fn select_str(&self, query: &str) -> Result<Vec<N>, SelectorError> {
        Ok(self.select(&compile(query)?))
    }

    pub fn select_first(&self, chains: &[SelectorChain]) -> Option<N> {
        self.select(chains).into_iter().next()
    }

    /// Collects all descendants accepted by the filter, in document order.
    pub fn select_by_filter(&self, filter: impl Fn(&N) -> bool) -> Vec<N> {
        let mut results = Vec::new();

        walk_descendants(&self.root, |node| {
            if filter(node) {
                results.push(node.clone());
            }
        });

        results
    }

    fn select_chain(&self, chain: &SelectorChain) -> Vec<N> {
        let mut context = vec![self.root.clone()];
        let mut combinator = Combinator::Descendant;

        for css in chain.nodes() {
            let mut candidates = NodeSet::new();

            for node in &context {
                collect_candidates(node, css, combinator, &mut candidates);
            }

            let mut candidates = candidates.into_vec();

            if css.has_result_relative_selectors() {
                let len = candidates.len();
                let mut index = 0;

                candidates.retain(|_| {
                    let keep = css.matches_in_results(index, len);

                    index += 1;
                    keep
                });
            }

            if candidates.is_empty() {
                return candidates;
            }

            context = candidates;
            combinator = css.combinator().unwrap_or(Combinator::Descendant);
        }

        context
    }
}

/// Pre-order walk over the descendants of the node.
fn walk_descendants<N: SelectorTarget>(root: &N, mut visit: impl FnMut(&N)) {
    let mut stack: Vec<N> = root.children().collect();

    stack.reverse();

    while let Some(node) = stack.pop() {
        visit(&node);

        let len = stack.len();

        stack.extend(node.children());
        stack[len..].reverse();
    }
}

#[inline]
fn add_if_matches<N: SelectorTarget>(node: N, css: &CssSelector, results: &mut NodeSet<N>) {
    if css.matches(&node) {
        results.insert(node);
    }
}

/// Collects the nodes related to `node` by the combinator that satisfy `css`.
fn collect_candidates<N: SelectorTarget>(
    node: &N,
    css: &CssSelector,
    combinator: Combinator,
    results: &mut NodeSet<N>,
) {
    match combinator {
        Combinator::Descendant => {
            walk_descendants(node, |d| add_if_matches(d.clone(), css, results));
        }
        Combinator::Child => {
            for child in node.children() {
                add_if_matches(child, css, results);
            }
        }
        Combinator::AdjacentSibling => {
            if let Some(sibling) = node.next_sibling_element() {
                add_if_matches(sibling, css, results);
            }
        }
        Combinator::GeneralSibling => {
            let mut sibling = node.next_sibling_element();

            while let Some(next) = sibling {
                sibling = next.next_sibling_element();
                add_if_matches(next, css, results);
            }
        }
    }
}

/// Checks whether a single node is matched by compiled selectors.
///
/// Chains are checked from the last node back to the first one, walking up
/// and back through the tree. Result relative pseudo selectors have no
/// meaning for a single node and are ignored.
#[derive(Debug, Clone)]
pub struct NodeMatcher<N> {
    node: N,
}

impl<N: SelectorTarget> NodeMatcher<N> {
    #[inline]
    pub fn new(node: N) -> Self {
        NodeMatcher { node }
    }

    pub fn matches(&self, chains: &[SelectorChain]) -> bool {
        chains.iter().any(|chain| {
            chain
                .len()
                .checked_sub(1)
                .is_some_and(|last| matches_from(chain, last, &self.node))
        })
    }

    /// Compiles the query and matches with it.
    pub fn matches_str(&self, query: &str) -> Result<bool, SelectorError> {
        Ok(self.matches(&compile(query)?))
    }
}

fn matches_from<N: SelectorTarget>(chain: &SelectorChain, index: usize, node: &N) -> bool {
    let css = &chain.nodes()[index];

    if !css.matches(node) {
        return false;
    }

    let Some(prev_index) = css.prev_index() else {
        return true;
    };

    let matches_prev = |n: &N| matches_from(chain, prev_index, n);

    match chain.nodes()[prev_index].combinator() {
        Some(Combinator::Child) => node.parent().is_some_and(|p| matches_prev(&p)),
        Some(Combinator::AdjacentSibling) => node
            .previous_sibling_element()
            .is_some_and(|s| matches_prev(&s)),
        Some(Combinator::GeneralSibling) => {
            std::iter::successors(node.previous_sibling_element(), |s| {
                s.previous_sibling_element()
            })
            .any(|s| matches_prev(&s))
        }
        Some(Combinator::Descendant) | None => {
            std::iter::successors(node.parent(), |p| p.parent()).any(|p| matches_prev(&p))
        }
    }
}
