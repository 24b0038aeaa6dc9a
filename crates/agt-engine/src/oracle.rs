//! Uniqueness verification.
//!
//! Every strategy proposes selector text and asks the oracle whether it picks
//! out the target and nothing else. This is the only place the engine touches
//! the query mechanism.

use agt_common::dom::{Document, NodeId, SearchScope};
use tracing::trace;

/// Decide whether `selector` resolves to exactly `target` within `scope`.
///
/// Implementations never fail: an unparseable selector is simply not unique.
pub trait UniquenessOracle {
    fn is_unique(&self, selector: &str, target: NodeId, scope: SearchScope) -> bool;
}

/// Oracle backed by [`agt_query::query_all`] over a document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentOracle<'a> {
    doc: &'a Document,
}

impl<'a> DocumentOracle<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }
}

impl UniquenessOracle for DocumentOracle<'_> {
    fn is_unique(&self, selector: &str, target: NodeId, scope: SearchScope) -> bool {
        match agt_query::query_all(self.doc, scope, selector) {
            Ok(found) => {
                trace!(selector, matches = found.len(), "uniqueness query");
                found.as_slice() == [target]
            }
            Err(e) => {
                trace!(selector, error = %e, "selector rejected");
                false
            }
        }
    }
}

impl<O: UniquenessOracle + ?Sized> UniquenessOracle for &O {
    fn is_unique(&self, selector: &str, target: NodeId, scope: SearchScope) -> bool {
        (**self).is_unique(selector, target, scope)
    }
}
