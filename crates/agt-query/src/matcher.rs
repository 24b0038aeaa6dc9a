//! Right-to-left matching of parsed selectors against the document model.
//!
//! Combinators only walk parent links and sibling lists, so a match can never
//! leave the tree (document or shadow) the candidate lives in.

use crate::ast::*;
use agt_common::dom::{Document, ElementData, NodeId};

impl SelectorList {
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors.iter().any(|sel| sel.matches(doc, node))
    }
}

impl ComplexSelector {
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self.parts.len() {
            0 => false,
            n => matches_from(doc, node, &self.parts, n - 1),
        }
    }
}

/// Does `parts[..=idx]` match with `parts[idx]` anchored at `node`?
fn matches_from(doc: &Document, node: NodeId, parts: &[SelectorPart], idx: usize) -> bool {
    let part = &parts[idx];
    if !matches_compound(doc, node, &part.compound) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match part.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => doc
            .parent_element(node)
            .is_some_and(|parent| matches_from(doc, parent, parts, idx - 1)),
        Combinator::Descendant => {
            let mut cursor = doc.parent_element(node);
            while let Some(ancestor) = cursor {
                if matches_from(doc, ancestor, parts, idx - 1) {
                    return true;
                }
                cursor = doc.parent_element(ancestor);
            }
            false
        }
        Combinator::NextSibling => doc
            .previous_element_sibling(node)
            .is_some_and(|sibling| matches_from(doc, sibling, parts, idx - 1)),
        Combinator::SubsequentSibling => doc
            .element_siblings(node)
            .take_while(|&s| s != node)
            .any(|sibling| matches_from(doc, sibling, parts, idx - 1)),
    }
}

fn matches_compound(doc: &Document, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };

    if let Some(TypeSelector::Tag(tag)) = &compound.type_selector {
        if element.tag_name() != tag {
            return false;
        }
    }

    compound
        .subclasses
        .iter()
        .all(|simple| matches_simple(doc, node, element, simple))
}

fn matches_simple(doc: &Document, node: NodeId, element: &ElementData, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
        SimpleSelector::Class(class) => element.has_class(class),
        SimpleSelector::Attribute(attr) => match element.attribute(&attr.name) {
            None => false,
            Some(actual) => match &attr.matcher {
                None => true,
                Some((op, expected)) => op.matches(actual, expected),
            },
        },
        SimpleSelector::Pseudo(pseudo) => matches_pseudo(doc, node, element, *pseudo),
    }
}

fn matches_pseudo(doc: &Document, node: NodeId, element: &ElementData, pseudo: PseudoClass) -> bool {
    let siblings: Vec<NodeId> = doc.element_siblings(node).collect();
    let typed: Vec<NodeId> = siblings
        .iter()
        .copied()
        .filter(|&s| doc.element(s).is_some_and(|e| e.tag_name() == element.tag_name()))
        .collect();

    // 1-based positions from the front and from the back
    let position = |list: &[NodeId]| list.iter().position(|&s| s == node).map(|p| p + 1);
    let position_from_end = |list: &[NodeId]| position(list).map(|p| list.len() - p + 1);

    match pseudo {
        PseudoClass::FirstChild => position(&siblings[..]) == Some(1),
        PseudoClass::LastChild => position_from_end(&siblings[..]) == Some(1),
        PseudoClass::OnlyChild => siblings.len() == 1,
        PseudoClass::FirstOfType => position(&typed[..]) == Some(1),
        PseudoClass::LastOfType => position_from_end(&typed[..]) == Some(1),
        PseudoClass::OnlyOfType => typed.len() == 1,
        PseudoClass::NthChild(nth) => position(&siblings[..]).is_some_and(|p| nth.matches(p)),
        PseudoClass::NthLastChild(nth) => position_from_end(&siblings[..]).is_some_and(|p| nth.matches(p)),
        PseudoClass::NthOfType(nth) => position(&typed[..]).is_some_and(|p| nth.matches(p)),
        PseudoClass::NthLastOfType(nth) => position_from_end(&typed[..]).is_some_and(|p| nth.matches(p)),
    }
}
