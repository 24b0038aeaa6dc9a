use agt_common::protocol::{Candidate, PageSnapshot, StrategyTag};
use agt_common::{Document, NodeId, SearchScope};
use agt_engine::{synthesize, synthesize_all};
use agt_query::{query_all, query_first};

fn load(json: &str) -> Document {
    PageSnapshot::from_json(json)
        .expect("snapshot should parse")
        .into_document()
        .expect("snapshot should build")
}

/// Wraps body children in `html > body`.
fn page(body: &str) -> Document {
    load(&format!(
        r#"{{ "url": "https://example.test/", "children": [
            {{ "tag": "html", "children": [ {{ "tag": "head" }}, {{ "tag": "body", "children": [{body}] }} ] }}
        ] }}"#
    ))
}

fn find(doc: &Document, selector: &str) -> NodeId {
    query_first(doc, SearchScope::Document, selector)
        .unwrap()
        .unwrap_or_else(|| panic!("nothing matches {selector}"))
}

fn assert_resolves_to(doc: &Document, scope: SearchScope, candidate: &Candidate, target: NodeId) {
    let found = query_all(doc, scope, &candidate.selector).unwrap();
    assert_eq!(found, vec![target], "{candidate:?} should resolve to the target only");
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_unique_id() {
    let doc = page(r#"{ "tag": "button", "attrs": { "id": "save-btn" }, "children": [{ "text": "Save" }] }"#);
    let button = find(&doc, "button");
    assert_eq!(synthesize(&doc, button), Candidate::new("#save-btn", StrategyTag::Id));
}

#[test]
fn test_test_id_when_class_is_hashed() {
    let doc = page(
        r#"{ "tag": "div", "attrs": { "data-testid": "card-1", "class": "x7f3a21" } },
           { "tag": "div", "attrs": { "class": "x7f3a21" } }"#,
    );
    let card = find(&doc, "[data-testid=card-1]");
    assert_eq!(
        synthesize(&doc, card),
        Candidate::new("div[data-testid=\"card-1\"]", StrategyTag::Attribute)
    );
}

#[test]
fn test_positional_path_for_plain_list_items() {
    let doc = page(
        r#"{ "tag": "ul", "children": [ { "tag": "li" }, { "tag": "li" }, { "tag": "li" } ] },
           { "tag": "ol", "children": [ { "tag": "li" }, { "tag": "li" } ] }"#,
    );
    let second = find(&doc, "ul > li:nth-of-type(2)");
    assert_eq!(
        synthesize(&doc, second),
        Candidate::new("ul > li:nth-of-type(2)", StrategyTag::NthChildPath)
    );
}

#[test]
fn test_identical_classed_items_fall_back_to_best_effort_path() {
    let doc = page(
        r#"{ "tag": "ul", "children": [
            { "tag": "li", "attrs": { "class": "item" } },
            { "tag": "li", "attrs": { "class": "item" } },
            { "tag": "li", "attrs": { "class": "item" } }
        ] }"#,
    );
    let second = find(&doc, "li:nth-child(2)");
    let candidate = synthesize(&doc, second);
    // class segments carry no position, so the path never becomes unique
    assert_eq!(candidate, Candidate::new("body > ul > li.item", StrategyTag::NthChildPath));
    assert_eq!(query_all(&doc, SearchScope::Document, &candidate.selector).unwrap().len(), 3);
}

// ============================================================================
// Priority and fallthrough
// ============================================================================

#[test]
fn test_id_beats_attribute() {
    let doc = page(r#"{ "tag": "input", "attrs": { "name": "email", "id": "email" } }"#);
    let input = find(&doc, "input");
    assert_eq!(synthesize(&doc, input).strategy, StrategyTag::Id);
}

#[test]
fn test_attribute_priority_order() {
    let doc = page(
        r#"{ "tag": "button", "attrs": { "title": "Send", "role": "button", "data-cy": "send" } },
           { "tag": "button", "attrs": { "role": "button" } }"#,
    );
    let send = find(&doc, "[title]");
    assert_eq!(
        synthesize(&doc, send),
        Candidate::new("button[data-cy=\"send\"]", StrategyTag::Attribute)
    );
}

#[test]
fn test_shared_attribute_value_falls_through() {
    let doc = page(
        r#"{ "tag": "a", "attrs": { "href": "/docs" }, "children": [
               { "tag": "a", "attrs": { "href": "/docs" } } ] }"#,
    );
    let outer = find(&doc, "body > a");
    let candidate = synthesize(&doc, outer);
    assert_eq!(candidate, Candidate::new("body > a", StrategyTag::NthChildPath));
    assert_resolves_to(&doc, SearchScope::Document, &candidate, outer);
}

#[test]
fn test_empty_and_oversized_attribute_values_are_skipped() {
    let long = "x".repeat(101);
    let doc = page(&format!(
        r#"{{ "tag": "img", "attrs": {{ "data-testid": "  ", "title": "{long}", "alt": "Logo" }} }},
           {{ "tag": "img" }}"#
    ));
    let logo = find(&doc, "[alt]");
    assert_eq!(synthesize(&doc, logo), Candidate::new("img[alt=\"Logo\"]", StrategyTag::Attribute));
}

#[test]
fn test_attribute_value_length_limit_is_inclusive() {
    let at_limit = "x".repeat(100);
    let doc = page(&format!(
        r#"{{ "tag": "img", "attrs": {{ "title": "{at_limit}", "alt": "Logo" }} }},
           {{ "tag": "img" }}"#
    ));
    let img = find(&doc, "[alt]");
    assert_eq!(
        synthesize(&doc, img),
        Candidate::new(format!("img[title=\"{at_limit}\"]"), StrategyTag::Attribute)
    );

    let over = "x".repeat(101);
    let doc = page(&format!(
        r#"{{ "tag": "img", "attrs": {{ "title": "{over}", "alt": "Logo" }} }},
           {{ "tag": "img" }}"#
    ));
    let img = find(&doc, "[alt]");
    assert_eq!(synthesize(&doc, img), Candidate::new("img[alt=\"Logo\"]", StrategyTag::Attribute));
}

#[test]
fn test_duplicate_id_falls_through() {
    let doc = page(
        r#"{ "tag": "span", "attrs": { "id": "dup", "class": "left" } },
           { "tag": "span", "attrs": { "id": "dup", "class": "right" } }"#,
    );
    for (selector, expected) in [(".left", "span.left"), (".right", "span.right")] {
        let span = find(&doc, selector);
        let candidate = synthesize(&doc, span);
        assert_ne!(candidate.strategy, StrategyTag::Id);
        assert_eq!(candidate, Candidate::new(expected, StrategyTag::Class));
    }
}

#[test]
fn test_class_pair_when_single_classes_are_shared() {
    let doc = page(
        r#"{ "tag": "a", "attrs": { "class": "btn primary" } },
           { "tag": "a", "attrs": { "class": "btn" } },
           { "tag": "a", "attrs": { "class": "primary" } }"#,
    );
    let target = find(&doc, ".btn.primary");
    assert_eq!(synthesize(&doc, target), Candidate::new("a.btn.primary", StrategyTag::Class));
}

#[test]
fn test_path_stops_at_id_anchor() {
    let doc = page(
        r#"{ "tag": "section", "attrs": { "id": "main" }, "children": [
               { "tag": "p" }, { "tag": "p" } ] },
           { "tag": "section", "children": [ { "tag": "p" }, { "tag": "p" } ] }"#,
    );
    let target = find(&doc, "#main > p:nth-of-type(2)");
    assert_eq!(
        synthesize(&doc, target),
        Candidate::new("#main > p:nth-of-type(2)", StrategyTag::NthChildPath)
    );
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_text_node_is_unknown() {
    let doc = page(r#"{ "tag": "p", "children": [{ "text": "hello" }] }"#);
    let p = find(&doc, "p");
    let text = doc.node(p).unwrap().children()[0];
    assert_eq!(synthesize(&doc, text), Candidate::unknown());
}

#[test]
fn test_root_element_target() {
    let doc = page("");
    let html = find(&doc, "html");
    assert_eq!(synthesize(&doc, html), Candidate::new("html", StrategyTag::NthChildPath));
}

#[test]
fn test_awkward_values_are_escaped() {
    let doc = page(
        r#"{ "tag": "div", "attrs": { "id": "1st item" } },
           { "tag": "div", "attrs": { "title": "say \"hi\" [now]" } },
           { "tag": "div", "attrs": { "class": "md:flex w-1/2" } },
           { "tag": "div", "attrs": { "class": "md:flex grid" } }"#,
    );
    for node in doc.descendants(SearchScope::Document) {
        if doc.element(node).unwrap().tag_name() != "div" {
            continue;
        }
        let candidate = synthesize(&doc, node);
        assert_resolves_to(&doc, SearchScope::Document, &candidate, node);
    }
    let first = find(&doc, "div:first-child");
    assert_eq!(synthesize(&doc, first).selector, "#\\31 st\\ item");
}

#[test]
fn test_determinism() {
    let doc = page(
        r#"{ "tag": "nav", "children": [ { "tag": "a", "attrs": { "class": "link" } }, { "tag": "a", "attrs": { "class": "link" } } ] },
           { "tag": "main", "children": [ { "tag": "a", "attrs": { "class": "link" } } ] }"#,
    );
    let first = synthesize_all(&doc);
    let second = synthesize_all(&doc);
    assert_eq!(first, second);
    assert_eq!(first.len(), doc.elements().count());
}

// ============================================================================
// Shadow trees
// ============================================================================

const SHADOW_PAGE: &str = r#"{ "children": [ { "tag": "html", "children": [ { "tag": "body", "children": [
    { "tag": "button", "attrs": { "id": "go" } },
    { "tag": "x-panel", "attrs": { "id": "panel" }, "shadow": [
        { "tag": "button", "attrs": { "id": "go" } },
        { "tag": "input", "attrs": { "placeholder": "Search" } },
        { "tag": "div", "attrs": { "class": "row first" }, "children": [ { "tag": "span" }, { "tag": "span" } ] },
        { "tag": "div", "attrs": { "class": "row" }, "children": [ { "tag": "span" }, { "tag": "span" } ] }
    ] },
    { "tag": "input", "attrs": { "placeholder": "Search" } }
] } ] } ] }"#;

fn shadow_scope(doc: &Document) -> SearchScope {
    let host = find(doc, "#panel");
    SearchScope::Shadow(doc.shadow_root_of(host).unwrap())
}

fn in_shadow(doc: &Document, selector: &str) -> NodeId {
    query_first(doc, shadow_scope(doc), selector).unwrap().unwrap()
}

#[test]
fn test_shadow_id_is_scoped_to_the_shadow_root() {
    let doc = load(SHADOW_PAGE);
    let button = in_shadow(&doc, "button");
    let candidate = synthesize(&doc, button);
    assert_eq!(candidate, Candidate::new("#go", StrategyTag::ShadowId));
    assert_resolves_to(&doc, shadow_scope(&doc), &candidate, button);

    // the light-tree twin is unaffected
    let light = find(&doc, "#go");
    assert_eq!(synthesize(&doc, light), Candidate::new("#go", StrategyTag::Id));
}

#[test]
fn test_shadow_attribute() {
    let doc = load(SHADOW_PAGE);
    let input = in_shadow(&doc, "input");
    assert_eq!(
        synthesize(&doc, input),
        Candidate::new("input[placeholder=\"Search\"]", StrategyTag::ShadowAttribute)
    );
}

#[test]
fn test_shadow_skips_class_strategy() {
    let doc = load(SHADOW_PAGE);
    let span = in_shadow(&doc, "div.first > span:nth-of-type(2)");
    let candidate = synthesize(&doc, span);
    assert_eq!(
        candidate,
        Candidate::new("div.row.first > span:nth-of-type(2)", StrategyTag::ShadowNthChildPath)
    );
    assert_resolves_to(&doc, shadow_scope(&doc), &candidate, span);

    // `div.first` would be unique, but only the path strategy runs
    let row = in_shadow(&doc, "div.first");
    assert_eq!(
        synthesize(&doc, row),
        Candidate::new("div.row.first", StrategyTag::ShadowNthChildPath)
    );
}
