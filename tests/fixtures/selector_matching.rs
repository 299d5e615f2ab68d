use crate::harness::{Dom, Node};
use tagscan::{
    compile, MatchType, NodeMatcher, NodeSelector, SelectorError, SelectorTarget, SimpleSelector,
};

const SIBLINGS: &str = concat!(
    "<p>",
    "<em id=e1></em><em id=e2></em><em id=e3></em><em id=e4></em><em id=e5></em>",
    "</p>",
);

const MIXED: &str = concat!(
    "<div>",
    "<span id=s1></span><b id=b1></b><span id=s2></span><b id=b2></b><span id=s3></span>",
    "</div>",
    "<section>text<i id=only></i><!-- c --></section>",
);

const FORM: &str = concat!(
    "<form id=f>",
    "<input id=i1 type=text>",
    "<input id=i2 type=checkbox checked>",
    "<select id=s1><option id=o1 selected>x</option><option id=o2>y</option></select>",
    "<textarea id=t1></textarea>",
    "<button id=bt type=submit>go</button>",
    "</form>",
    "<h2 id=h>H</h2><h7 id=h7></h7>",
);

const LIST: &str = concat!(
    "<ul id=list>",
    "<li id=l1>one</li><li id=l2 class=sel>two</li><li id=l3>three</li><li id=l4>four</li>",
    "</ul>",
);

#[test]
fn descendant_and_child_combinators() {
    let dom = Dom::parse("<html><body><div id=a><div id=b></div></div></body></html>");

    assert_selects!(dom, "div div", ["div#b"]);
    assert_selects!(dom, "div > div", ["div#b"]);
    assert_selects!(dom, "body div", ["div#a", "div#b"]);
    assert_selects!(dom, "body > div", ["div#a"]);
    assert_selects!(dom, "html > div", []);
    assert_selects!(dom, "html body div div", ["div#b"]);
}

#[test]
fn sibling_combinators() {
    let dom = Dom::parse("<div id=x></div> <div id=y></div>text<div id=z></div>");

    assert_selects!(dom, "div + div", ["div#y", "div#z"]);
    assert_selects!(dom, "div ~ div", ["div#y", "div#z"]);
    assert_selects!(dom, "#x + div", ["div#y"]);
    assert_selects!(dom, "#x ~ div", ["div#y", "div#z"]);
    assert_selects!(dom, "#z ~ div", []);
}

#[test]
fn positional_pseudo_functions() {
    let dom = Dom::parse(SIBLINGS);

    assert_selects!(dom, "em:nth-child(2n+1)", ["em#e1", "em#e3", "em#e5"]);
    assert_selects!(dom, "em:nth-last-child(2n+1)", ["em#e1", "em#e3", "em#e5"]);
    assert_selects!(dom, "em:nth-last-child(2)", ["em#e4"]);
    assert_selects!(dom, "em:nth-child(-n+2)", ["em#e1", "em#e2"]);
    assert_selects!(dom, "em:nth-of-type(even)", ["em#e2", "em#e4"]);
    assert_selects!(dom, "em:first-child", ["em#e1"]);
    assert_selects!(dom, "em:last-child", ["em#e5"]);
    assert_selects!(dom, "p > em:only-child", []);
}

#[test]
fn result_relative_pseudo_selectors() {
    let dom = Dom::parse(SIBLINGS);

    assert_selects!(dom, "em:first", ["em#e1"]);
    assert_selects!(dom, "em:last", ["em#e5"]);
    assert_selects!(dom, "em:even", ["em#e1", "em#e3", "em#e5"]);
    assert_selects!(dom, "em:odd", ["em#e2", "em#e4"]);
    assert_selects!(dom, "em:eq(0)", ["em#e1"]);
    assert_selects!(dom, "em:eq(-2)", ["em#e4"]);
    assert_selects!(dom, "em:gt(2)", ["em#e4", "em#e5"]);
    assert_selects!(dom, "em:lt(1)", ["em#e1"]);
    assert_selects!(dom, "em:eq(7)", []);
}

#[test]
fn type_pseudo_classes() {
    let dom = Dom::parse(MIXED);

    assert_selects!(dom, "span:first-of-type", ["span#s1"]);
    assert_selects!(dom, "span:last-of-type", ["span#s3"]);
    assert_selects!(dom, "b:nth-of-type(2)", ["b#b2"]);
    assert_selects!(dom, "span:nth-last-of-type(1)", ["span#s3"]);
    assert_selects!(dom, "b:nth-last-of-type(2)", ["b#b1"]);
    assert_selects!(dom, "span:nth-child(3)", ["span#s2"]);
    assert_selects!(dom, "b:only-of-type", []);
    assert_selects!(dom, "i:only-child", ["i#only"]);
    assert_selects!(dom, "i:only-of-type", ["i#only"]);
}

#[test]
fn structural_pseudo_classes() {
    let dom = Dom::parse(MIXED);

    assert_selects!(dom, ":root", ["div", "section"]);
    assert_selects!(dom, "span:empty", ["span#s1", "span#s2", "span#s3"]);
    assert_selects!(dom, ":parent", ["div", "section"]);
    assert_selects!(dom, "section:empty", []);
}

#[test]
fn navigation_helpers() {
    let dom = Dom::parse(MIXED);
    let div = dom.select("div")[0];
    let section = dom.select("section")[0];
    let describe = |node: Option<Node<'_>>| node.map(|n| n.describe());

    assert_eq!(dom.document().child_count(), 2);
    assert_eq!(div.child_count(), 5);
    assert_eq!(div.child_element_count(), 5);
    assert_eq!(section.child_count(), 3);
    assert_eq!(section.child_element_count(), 1);

    assert_eq!(
        describe(div.last_child_element_named("SPAN")),
        Some("span#s3".to_string())
    );
    assert_eq!(
        describe(div.last_child_element_named("b")),
        Some("b#b2".to_string())
    );
    assert_eq!(describe(section.last_child_element_named("span")), None);
    assert_eq!(
        describe(dom.by_id("s1").next_sibling_named()),
        Some("span#s2".to_string())
    );
    assert_eq!(dom.by_id("s2").sibling_name_index(), 1);
    assert_eq!(dom.by_id("s2").sibling_element_index(), 2);
    assert_eq!(section.text_content(), "text");
}

#[test]
fn form_pseudo_classes() {
    let dom = Dom::parse(FORM);

    assert_selects!(dom, ":text", ["input#i1"]);
    assert_selects!(dom, ":checkbox", ["input#i2"]);
    assert_selects!(dom, ":submit", ["button#bt"]);
    assert_selects!(dom, ":checked", ["input#i2"]);
    assert_selects!(dom, "option:selected", ["option#o1"]);
    assert_selects!(
        dom,
        "form :input",
        ["input#i1", "input#i2", "select#s1", "textarea#t1", "button#bt"]
    );
    assert_selects!(dom, ":header", ["h2#h"]);
    assert_selects!(dom, "input:radio, :password, :file, :image, :reset, :button", []);
}

#[test]
fn attribute_operators() {
    let dom = Dom::parse(concat!(
        r#"<a id=x href="http://e.com/a.pdf" lang="en-US" class="k1 k2" title="" data-flag></a>"#,
        r#"<a id=y href=/local lang=english></a>"#,
    ));

    assert_selects!(dom, "[href^=http]", ["a#x"]);
    assert_selects!(dom, "[href$='.pdf']", ["a#x"]);
    assert_selects!(dom, "[href*=e.com]", ["a#x"]);
    assert_selects!(dom, "[href]", ["a#x", "a#y"]);
    assert_selects!(dom, "[lang|=en]", ["a#x"]);
    assert_selects!(dom, "[class~=k2]", ["a#x"]);
    assert_selects!(dom, "[data-flag]", ["a#x"]);
    assert_selects!(dom, "[title='']", ["a#x"]);
    assert_selects!(dom, "[title^='']", []);
    assert_selects!(dom, "[HREF^=http]", ["a#x"]);
    assert_selects!(dom, "a.k1.k2", ["a#x"]);
    assert_selects!(dom, "a.k3", []);
    assert_selects!(dom, "A#Y", []);
    assert_selects!(dom, "A#y", ["a#y"]);
}

#[test]
fn text_and_nested_selector_functions() {
    let dom = Dom::parse(concat!(
        "<div id=d1><p>Hello <b>world</b></p></div>",
        "<div id=d2><p>Bye<![CDATA[ <raw> ]]></p></div>",
    ));

    assert_selects!(dom, "div:contains('world')", ["div#d1"]);
    assert_selects!(dom, "div:contains(Hello world)", ["div#d1"]);
    assert_selects!(dom, r#"p:contains("<raw>")"#, ["p"]);
    assert_selects!(dom, "div:has(b)", ["div#d1"]);
    assert_selects!(dom, "div:has('p > b, i')", ["div#d1"]);
    assert_selects!(dom, "div:not(#d1)", ["div#d2"]);
    assert_selects!(dom, "div:not(#d1, #d2)", []);
    assert_selects!(dom, "p:not(:has(b))", ["p"]);
}

#[test]
fn groups_keep_order_without_duplicates() {
    let dom = Dom::parse(LIST);

    assert_selects!(
        dom,
        "li, #l2, ul",
        ["li#l1", "li#l2", "li#l3", "li#l4", "ul#list"]
    );
    assert_selects!(dom, "li.sel + li, li:last", ["li#l3", "li#l4"]);
}

#[test]
fn selection_from_a_subtree() {
    let dom = Dom::parse(LIST);
    let list = NodeSelector::new(dom.by_id("list"));

    assert_eq!(list.select_str("ul").unwrap(), Vec::<Node<'_>>::new());
    assert_eq!(
        list.select_first(&compile("li:gt(1)").unwrap())
            .map(|n| n.describe()),
        Some("li#l3".to_string())
    );
    assert_eq!(
        list.select_by_filter(|n| n.node_value().is_some_and(|v| v.starts_with('t')))
            .iter()
            .filter_map(|n| n.parent())
            .map(|n| n.describe())
            .collect::<Vec<_>>(),
        ["li#l2", "li#l3"]
    );
}

#[test]
fn single_node_matching() {
    let dom = Dom::parse(LIST);
    let l3 = NodeMatcher::new(dom.by_id("l3"));

    assert_eq!(l3.matches_str("ul > li"), Ok(true));
    assert_eq!(l3.matches_str("li.sel ~ li"), Ok(true));
    assert_eq!(l3.matches_str("li.sel + li"), Ok(true));
    assert_eq!(l3.matches_str("#l1 + li"), Ok(false));
    assert_eq!(l3.matches_str("ol li, #l4"), Ok(false));
}

#[test]
fn escaped_selectors() {
    let dom = Dom::parse(r#"<p id="a.b" class="x:y"></p>"#);

    assert_selects!(dom, r"#a\.b", ["p#a.b"]);
    assert_selects!(dom, r"p.x\:y", ["p#a.b"]);
}

#[test]
fn class_list_compiles_to_attribute_selectors() {
    let chains = compile("div.k1.k2").unwrap();

    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 1);

    let node = chains[0].first();

    assert_eq!(node.element(), "div");

    let classes: Vec<_> = node
        .selectors()
        .iter()
        .map(|s| match s {
            SimpleSelector::Attribute(attr) => (attr.name(), attr.match_type(), attr.value()),
            other => panic!("Unexpected selector {other:?}"),
        })
        .collect();

    assert_eq!(
        classes,
        [
            ("class", Some(MatchType::Includes), Some("k1")),
            ("class", Some(MatchType::Includes), Some("k2")),
        ]
    );
}

#[test]
fn failed_compilation_returns_no_chain() {
    assert_eq!(
        compile("div:contains(unterminated").unwrap_err(),
        SelectorError::UnclosedPseudoFunction("contains".into())
    );
    assert_eq!(
        compile("div[title").unwrap_err(),
        SelectorError::UnclosedAttributeSelector
    );
    assert_eq!(compile("div,,p").unwrap_err(), SelectorError::EmptySelector);
    assert_eq!(
        compile("div:visited").unwrap_err().to_string(),
        "Unsupported pseudo class `:visited`."
    );
}

#[test]
fn compiled_chains_are_shared_between_threads() {
    let chains = compile("li.sel, #l4").unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let dom = Dom::parse(LIST);
                let found: Vec<_> = NodeSelector::new(dom.document())
                    .select(&chains)
                    .iter()
                    .map(Node::describe)
                    .collect();

                assert_eq!(found, ["li#l2", "li#l4"]);
            });
        }
    });
}
