//! Selector queries over the document model.
//!
//! This is the host query mechanism the synthesis engine verifies against, and
//! the one stored selectors are re-resolved with.

pub mod ast;
pub mod escape;
mod matcher;
pub mod parser;

pub use ast::*;
pub use escape::{serialize_identifier, unescape};
pub use parser::{parse, ParseError, Rule, SelectorParser};

use agt_common::dom::{Document, NodeId, SearchScope};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid selector '{selector}': {source}")]
    Parse {
        selector: String,
        #[source]
        source: ParseError,
    },
}

fn compile(selector: &str) -> Result<SelectorList, QueryError> {
    parse(selector).map_err(|source| QueryError::Parse {
        selector: selector.to_string(),
        source,
    })
}

/// All elements of `scope` matching `selector`, in tree order.
pub fn query_all(doc: &Document, scope: SearchScope, selector: &str) -> Result<Vec<NodeId>, QueryError> {
    let list = compile(selector)?;
    Ok(doc
        .descendants(scope)
        .into_iter()
        .filter(|&node| list.matches(doc, node))
        .collect())
}

/// First element of `scope` matching `selector`.
pub fn query_first(doc: &Document, scope: SearchScope, selector: &str) -> Result<Option<NodeId>, QueryError> {
    let list = compile(selector)?;
    Ok(doc
        .descendants(scope)
        .into_iter()
        .find(|&node| list.matches(doc, node)))
}

/// Whether `node` itself matches `selector`.
pub fn matches(doc: &Document, node: NodeId, selector: &str) -> Result<bool, QueryError> {
    Ok(compile(selector)?.matches(doc, node))
}
