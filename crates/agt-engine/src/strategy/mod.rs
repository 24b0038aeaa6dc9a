//! Selector strategies, in priority order.
//!
//! Each strategy either returns a selector the oracle has confirmed unique or
//! gives up, except the path fallback which always returns something.

pub mod attribute;
pub mod class;
pub mod identifier;
pub mod path;

use crate::oracle::UniquenessOracle;
use agt_common::dom::{Document, ElementData, NodeId, SearchScope};

pub use attribute::{try_attribute, MAX_ATTRIBUTE_VALUE_LEN, SEMANTIC_ATTRIBUTES};
pub use class::{is_stable_class, stable_classes, try_classes, Combinations, MAX_COMBINATION_SIZE};
pub use identifier::try_identifier;
pub use path::{build_path, local_segment, MAX_PATH_DEPTH};

/// Everything a strategy needs for one target.
pub struct SynthesisContext<'a, O: ?Sized> {
    pub doc: &'a Document,
    pub target: NodeId,
    pub element: &'a ElementData,
    pub scope: SearchScope,
    pub oracle: &'a O,
}

impl<O: UniquenessOracle + ?Sized> SynthesisContext<'_, O> {
    pub fn verify(&self, selector: &str) -> bool {
        self.oracle.is_unique(selector, self.target, self.scope)
    }
}
