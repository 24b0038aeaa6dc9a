//! In-memory document model.
//!
//! An arena of nodes addressed by [`NodeId`]. The light tree hangs off the
//! document; every shadow root owns a separate tree whose top-level nodes have
//! no parent element. The model is read-only for everything downstream of
//! construction.

use crate::error::DomError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShadowRootId(usize);

impl ShadowRootId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The root a node belongs to, and the root a query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchScope {
    #[default]
    Document,
    Shadow(ShadowRootId),
}

/// Where a new node is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Document,
    Element(NodeId),
    Shadow(ShadowRootId),
}

/// Ordered attribute map. Names are stored lowercased; insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Deserializes from a map, keeping source order and dropping null values
/// (snapshots report absent attributes as null).
impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                let mut attrs = Attributes::new();
                while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
                    if let Some(value) = value {
                        attrs.insert(name, value);
                    }
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

#[derive(Debug, Clone)]
pub struct ElementData {
    tag_name: String,
    attributes: Attributes,
    shadow_root: Option<ShadowRootId>,
}

impl ElementData {
    /// Lowercase tag name.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    /// Class tokens in source order, duplicates removed.
    pub fn class_list(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        if let Some(raw) = self.attributes.get("class") {
            for token in raw.split_ascii_whitespace() {
                if !classes.contains(&token) {
                    classes.push(token);
                }
            }
        }
        classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .is_some_and(|raw| raw.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn shadow_root(&self) -> Option<ShadowRootId> {
        self.shadow_root
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scope: SearchScope,
    kind: NodeKind,
}

impl Node {
    /// Parent element; `None` for nodes directly under the document or a shadow root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct ShadowRoot {
    host: NodeId,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    children: Vec<NodeId>,
    shadow_roots: Vec<ShadowRoot>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_element(
        &mut self,
        parent: Parent,
        tag_name: &str,
        attributes: Attributes,
    ) -> Result<NodeId, DomError> {
        let tag_name = tag_name.trim().to_ascii_lowercase();
        if tag_name.is_empty() {
            return Err(DomError::EmptyTagName);
        }
        let element = ElementData {
            tag_name,
            attributes,
            shadow_root: None,
        };
        self.append(parent, NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: Parent, text: impl Into<String>) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Attach an (open) shadow root to `host`.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<ShadowRootId, DomError> {
        let id = ShadowRootId(self.shadow_roots.len());
        let node = self
            .nodes
            .get_mut(host.0)
            .ok_or(DomError::UnknownNode(host.0))?;
        let NodeKind::Element(element) = &mut node.kind else {
            return Err(DomError::NotAnElement(host.0));
        };
        if element.shadow_root.is_some() {
            return Err(DomError::ShadowAlreadyAttached(host.0));
        }
        element.shadow_root = Some(id);
        self.shadow_roots.push(ShadowRoot {
            host,
            children: Vec::new(),
        });
        Ok(id)
    }

    fn append(&mut self, parent: Parent, kind: NodeKind) -> Result<NodeId, DomError> {
        let id = NodeId(self.nodes.len());
        let (parent_element, scope) = match parent {
            Parent::Document => {
                self.children.push(id);
                (None, SearchScope::Document)
            }
            Parent::Shadow(root) => {
                let shadow = self
                    .shadow_roots
                    .get_mut(root.0)
                    .ok_or(DomError::UnknownShadowRoot(root.0))?;
                shadow.children.push(id);
                (None, SearchScope::Shadow(root))
            }
            Parent::Element(element) => {
                let node = self
                    .nodes
                    .get_mut(element.0)
                    .ok_or(DomError::UnknownNode(element.0))?;
                if node.as_element().is_none() {
                    return Err(DomError::NotAnElement(element.0));
                }
                node.children.push(id);
                (Some(element), node.scope)
            }
        };
        self.nodes.push(Node {
            parent: parent_element,
            children: Vec::new(),
            scope,
            kind,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn scope_of(&self, id: NodeId) -> Option<SearchScope> {
        self.node(id).map(Node::scope)
    }

    /// Top-level nodes of a scope.
    pub fn scope_children(&self, scope: SearchScope) -> &[NodeId] {
        match scope {
            SearchScope::Document => &self.children,
            SearchScope::Shadow(root) => self
                .shadow_roots
                .get(root.0)
                .map(|s| s.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// The child list `id` belongs to, itself included.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => match node.parent {
                Some(parent) => &self.nodes[parent.0].children,
                None => self.scope_children(node.scope),
            },
            None => &[],
        }
    }

    /// Element siblings of `id` (itself included), in order.
    pub fn element_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.siblings(id)
            .iter()
            .copied()
            .filter(|&n| self.element(n).is_some())
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.element_siblings(id).take_while(|&n| n != id).last()
    }

    /// The document's top-level element (normally `html`).
    pub fn document_element(&self) -> Option<NodeId> {
        self.children
            .iter()
            .copied()
            .find(|&n| self.element(n).is_some())
    }

    pub fn shadow_host(&self, root: ShadowRootId) -> Option<NodeId> {
        self.shadow_roots.get(root.0).map(|s| s.host)
    }

    pub fn shadow_root_of(&self, host: NodeId) -> Option<ShadowRootId> {
        self.element(host).and_then(ElementData::shadow_root)
    }

    /// Elements of `scope` in tree order. Nested shadow trees are not entered.
    pub fn descendants(&self, scope: SearchScope) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.scope_children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.as_element().is_some() {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every element in the document, shadow trees included, in arena order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.as_element().is_some())
            .map(|(index, _)| NodeId(index))
    }

    /// Concatenated text of the light-tree descendants of `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            match &node.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) => stack.extend(node.children.iter().rev().copied()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn attributes_keep_insertion_order_and_replace_in_place() {
        let mut a = attrs(&[("id", "x"), ("Class", "a b"), ("role", "button")]);
        a.insert("CLASS", "c");
        let names: Vec<&str> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["id", "class", "role"]);
        assert_eq!(a.get("class"), Some("c"));
    }

    #[test]
    fn class_list_is_an_ordered_set() {
        let mut doc = Document::new();
        let el = doc
            .append_element(Parent::Document, "DIV", attrs(&[("class", " b a  b c ")]))
            .unwrap();
        let element = doc.element(el).unwrap();
        assert_eq!(element.tag_name(), "div");
        assert_eq!(element.class_list(), vec!["b", "a", "c"]);
        assert!(element.has_class("c"));
        assert!(!element.has_class("d"));
    }

    #[test]
    fn shadow_children_have_no_parent_element() {
        let mut doc = Document::new();
        let html = doc.append_element(Parent::Document, "html", Attributes::new()).unwrap();
        let host = doc.append_element(Parent::Element(html), "my-widget", Attributes::new()).unwrap();
        let root = doc.attach_shadow(host).unwrap();
        let inner = doc.append_element(Parent::Shadow(root), "span", Attributes::new()).unwrap();

        assert_eq!(doc.parent_element(inner), None);
        assert_eq!(doc.scope_of(inner), Some(SearchScope::Shadow(root)));
        assert_eq!(doc.shadow_host(root), Some(host));
        assert_eq!(doc.shadow_root_of(host), Some(root));
        assert_eq!(doc.descendants(SearchScope::Document), vec![html, host]);
        assert_eq!(doc.descendants(SearchScope::Shadow(root)), vec![inner]);
        assert_eq!(doc.attach_shadow(host), Err(DomError::ShadowAlreadyAttached(host.index())));
    }

    #[test]
    fn siblings_and_text_content() {
        let mut doc = Document::new();
        let ul = doc.append_element(Parent::Document, "ul", Attributes::new()).unwrap();
        let a = doc.append_element(Parent::Element(ul), "li", Attributes::new()).unwrap();
        doc.append_text(Parent::Element(ul), "\n").unwrap();
        let b = doc.append_element(Parent::Element(ul), "li", Attributes::new()).unwrap();
        doc.append_text(Parent::Element(b), "Sec").unwrap();
        let em = doc.append_element(Parent::Element(b), "em", Attributes::new()).unwrap();
        doc.append_text(Parent::Element(em), "ond").unwrap();

        assert_eq!(doc.element_siblings(b).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(doc.previous_element_sibling(b), Some(a));
        assert_eq!(doc.previous_element_sibling(a), None);
        assert_eq!(doc.text_content(b), "Second");
        assert_eq!(doc.document_element(), Some(ul));
    }

    #[test]
    fn appending_to_text_is_rejected() {
        let mut doc = Document::new();
        let text = doc.append_text(Parent::Document, "hi").unwrap();
        assert_eq!(
            doc.append_element(Parent::Element(text), "b", Attributes::new()),
            Err(DomError::NotAnElement(text.index()))
        );
        assert_eq!(
            doc.append_element(Parent::Document, "  ", Attributes::new()),
            Err(DomError::EmptyTagName)
        );
    }

    #[test]
    fn document_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
