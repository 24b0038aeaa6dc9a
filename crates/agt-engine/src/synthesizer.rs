//! Entry point: run the strategies in priority order.

use crate::oracle::{DocumentOracle, UniquenessOracle};
use crate::strategy::{build_path, try_attribute, try_classes, try_identifier, SynthesisContext};
use agt_common::dom::{Document, NodeId, SearchScope};
use agt_common::protocol::Candidate;
use tracing::debug;

/// Synthesize a selector for `node`, verified against the document itself.
pub fn synthesize(doc: &Document, node: NodeId) -> Candidate {
    synthesize_with(doc, node, &DocumentOracle::new(doc))
}

/// Synthesize a selector for `node` using a caller-supplied oracle.
///
/// Never fails. Anything that is not an element gets [`Candidate::unknown`];
/// when no strategy finds a unique selector the best-effort path is returned.
///
/// Elements inside a shadow tree skip the class strategy, are verified against
/// their own shadow root, and get `shadow-` tags.
pub fn synthesize_with<O: UniquenessOracle + ?Sized>(doc: &Document, node: NodeId, oracle: &O) -> Candidate {
    let (Some(element), Some(scope)) = (doc.element(node), doc.scope_of(node)) else {
        debug!(node = node.index(), "not an element");
        return Candidate::unknown();
    };

    let cx = SynthesisContext {
        doc,
        target: node,
        element,
        scope,
        oracle,
    };

    let candidate = match scope {
        SearchScope::Shadow(_) => try_identifier(&cx)
            .or_else(|| try_attribute(&cx))
            .unwrap_or_else(|| build_path(&cx))
            .shadowed(),
        SearchScope::Document => try_identifier(&cx)
            .or_else(|| try_attribute(&cx))
            .or_else(|| try_classes(&cx))
            .unwrap_or_else(|| build_path(&cx)),
    };

    debug!(
        node = node.index(),
        selector = %candidate.selector,
        strategy = %candidate.strategy,
        "synthesized selector"
    );
    candidate
}

/// Selectors for every element in the document, shadow trees included.
pub fn synthesize_all(doc: &Document) -> Vec<(NodeId, Candidate)> {
    let oracle = DocumentOracle::new(doc);
    doc.elements()
        .map(|node| (node, synthesize_with(doc, node, &oracle)))
        .collect()
}
