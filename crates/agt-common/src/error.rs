use thiserror::Error;

/// Errors raised while building a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("Unknown node: {0}")]
    UnknownNode(usize),

    #[error("Node {0} is not an element")]
    NotAnElement(usize),

    #[error("Unknown shadow root: {0}")]
    UnknownShadowRoot(usize),

    #[error("Element {0} already hosts a shadow root")]
    ShadowAlreadyAttached(usize),

    #[error("Element tag name must not be empty")]
    EmptyTagName,
}

/// Errors raised while loading a page snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot structure: {0}")]
    Dom(#[from] DomError),
}
