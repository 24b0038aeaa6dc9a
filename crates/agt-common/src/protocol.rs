use crate::dom::{Attributes, Document, Parent};
use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy produced a selector. The tag is the only confidence signal
/// callers get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyTag {
    Id,
    Attribute,
    Class,
    NthChildPath,
    ShadowId,
    ShadowAttribute,
    ShadowNthChildPath,
    Unknown,
}

impl StrategyTag {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyTag::Id => "id",
            StrategyTag::Attribute => "attribute",
            StrategyTag::Class => "class",
            StrategyTag::NthChildPath => "nth-child-path",
            StrategyTag::ShadowId => "shadow-id",
            StrategyTag::ShadowAttribute => "shadow-attribute",
            StrategyTag::ShadowNthChildPath => "shadow-nth-child-path",
            StrategyTag::Unknown => "unknown",
        }
    }

    /// The `shadow-` variant of this tag.
    pub fn shadowed(self) -> Self {
        match self {
            StrategyTag::Id => StrategyTag::ShadowId,
            StrategyTag::Attribute => StrategyTag::ShadowAttribute,
            StrategyTag::NthChildPath => StrategyTag::ShadowNthChildPath,
            other => other,
        }
    }

    /// Path results are best effort and may match more than one element.
    pub fn is_path(&self) -> bool {
        matches!(self, StrategyTag::NthChildPath | StrategyTag::ShadowNthChildPath)
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A synthesized selector and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub selector: String,
    pub strategy: StrategyTag,
}

impl Candidate {
    pub fn new(selector: impl Into<String>, strategy: StrategyTag) -> Self {
        Self {
            selector: selector.into(),
            strategy,
        }
    }

    /// Sentinel for input that is not an element.
    pub fn unknown() -> Self {
        Self::new("*", StrategyTag::Unknown)
    }

    pub fn shadowed(self) -> Self {
        Self {
            strategy: self.strategy.shadowed(),
            ..self
        }
    }
}

/// A captured page, as produced by the in-page capture script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSnapshot {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Attributes::is_empty")]
        attrs: Attributes,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeSnapshot>,
        /// Children of an attached shadow root.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow: Option<Vec<NodeSnapshot>>,
    },
}

impl PageSnapshot {
    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn into_document(self) -> Result<Document, SnapshotError> {
        let mut doc = Document::new();
        for child in self.children {
            append_snapshot(&mut doc, Parent::Document, child)?;
        }
        Ok(doc)
    }
}

fn append_snapshot(doc: &mut Document, parent: Parent, node: NodeSnapshot) -> Result<(), SnapshotError> {
    match node {
        NodeSnapshot::Text { text } => {
            doc.append_text(parent, text)?;
        }
        NodeSnapshot::Element {
            tag,
            attrs,
            children,
            shadow,
        } => {
            let id = doc.append_element(parent, &tag, attrs)?;
            if let Some(shadow_children) = shadow {
                let root = doc.attach_shadow(id)?;
                for child in shadow_children {
                    append_snapshot(doc, Parent::Shadow(root), child)?;
                }
            }
            for child in children {
                append_snapshot(doc, Parent::Element(id), child)?;
            }
        }
    }
    Ok(())
}

/// Metadata stored for one picked element. The selector is the only piece used
/// to find the element again later; for an element inside shadow trees it is
/// scoped to the innermost shadow root, and `hosts` holds the selectors of the
/// enclosing hosts, outermost first, each scoped to the tree that contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub id: String,
    pub selector: String,
    pub strategy: StrategyTag,
    pub tag_name: String,
    pub inner_text: String,
    pub attributes: Attributes,
    pub url: String,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
}
