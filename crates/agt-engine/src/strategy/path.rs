//! Ancestor-path fallback.
//!
//! Builds `a > b > target` from per-node segments, climbing until the path is
//! unique, an id anchors it, or the walk runs out of room. The result is
//! returned even when it is still ambiguous.

use super::class::stable_classes;
use super::SynthesisContext;
use crate::oracle::UniquenessOracle;
use agt_common::dom::{Document, NodeId};
use agt_common::protocol::{Candidate, StrategyTag};
use agt_query::serialize_identifier;
use std::collections::VecDeque;

/// Most segments a path may have.
pub const MAX_PATH_DEPTH: usize = 8;

const SEPARATOR: &str = " > ";

/// Selector for `node` relative to its parent: id, up to two stable classes,
/// or the tag with a type index when a same-tag sibling exists.
pub fn local_segment(doc: &Document, node: NodeId) -> Option<String> {
    let element = doc.element(node)?;
    let tag = serialize_identifier(element.tag_name());

    if let Some(id) = element.id().filter(|id| !id.trim().is_empty()) {
        return Some(format!("#{}", serialize_identifier(id)));
    }

    let classes = stable_classes(element);
    if !classes.is_empty() {
        let mut segment = tag;
        for class in classes.iter().take(2) {
            segment.push('.');
            segment.push_str(&serialize_identifier(class));
        }
        return Some(segment);
    }

    let same_tag: Vec<NodeId> = doc
        .element_siblings(node)
        .filter(|&s| doc.element(s).is_some_and(|e| e.tag_name() == element.tag_name()))
        .collect();
    if same_tag.len() > 1 {
        let position = same_tag.iter().position(|&s| s == node)? + 1;
        return Some(format!("{tag}:nth-of-type({position})"));
    }

    Some(tag)
}

pub fn build_path<O: UniquenessOracle + ?Sized>(cx: &SynthesisContext<'_, O>) -> Candidate {
    let doc = cx.doc;
    let top = doc.document_element();
    let mut segments: VecDeque<String> = VecDeque::new();
    let mut current = Some(cx.target);

    while let Some(node) = current {
        if segments.len() >= MAX_PATH_DEPTH {
            break;
        }
        // the root element only gets a segment when it is the target itself
        if Some(node) == top && node != cx.target {
            break;
        }
        let Some(segment) = local_segment(doc, node) else {
            break;
        };

        let anchored = segment.starts_with('#');
        segments.push_front(segment);

        let selector = segments.make_contiguous().join(SEPARATOR);
        if cx.verify(&selector) {
            return Candidate::new(selector, StrategyTag::NthChildPath);
        }
        if anchored {
            break;
        }
        current = doc.parent_element(node);
    }

    Candidate::new(segments.make_contiguous().join(SEPARATOR), StrategyTag::NthChildPath)
}
