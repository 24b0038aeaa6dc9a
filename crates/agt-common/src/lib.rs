pub mod dom;
pub mod error;
pub mod formatter;
pub mod protocol;

pub use dom::{Attributes, Document, ElementData, Node, NodeId, NodeKind, Parent, SearchScope, ShadowRootId};
pub use error::{DomError, SnapshotError};
pub use protocol::{Candidate, PageSnapshot, SelectionRecord, StrategyTag};
