//! Selection records and re-location.
//!
//! A record is what gets persisted when an element is picked; only its
//! selectors are used to find the element again, through fresh queries.

use crate::config::{CollectConfig, OwnUiConfig};
use crate::synthesizer::synthesize;
use agt_common::dom::{Attributes, Document, NodeId, SearchScope};
use agt_common::protocol::SelectionRecord;
use tracing::debug;

const ELLIPSIS: char = '…';

/// Build the record for `node`, or `None` if it is not an element.
pub fn collect_element_data(
    doc: &Document,
    node: NodeId,
    url: &str,
    config: &CollectConfig,
    timestamp_ms: u64,
) -> Option<SelectionRecord> {
    let element = doc.element(node)?;
    let candidate = synthesize(doc, node);

    let attributes: Attributes = element
        .attributes()
        .iter()
        .filter(|(name, _)| !config.omit_attributes.iter().any(|o| o.eq_ignore_ascii_case(name)))
        .collect();

    Some(SelectionRecord {
        id: format!("sel_{}_{}", timestamp_ms, node.index()),
        selector: candidate.selector,
        strategy: candidate.strategy,
        tag_name: element.tag_name().to_ascii_uppercase(),
        inner_text: truncate_text(doc.text_content(node).trim(), config.text_limit),
        attributes,
        url: url.to_string(),
        timestamp: timestamp_ms,
        hosts: host_chain(doc, node),
    })
}

/// Selectors of the shadow hosts enclosing `node`, outermost first.
fn host_chain(doc: &Document, node: NodeId) -> Vec<String> {
    let mut hosts = Vec::new();
    let mut cursor = node;
    while let Some(SearchScope::Shadow(root)) = doc.scope_of(cursor) {
        let Some(host) = doc.shadow_host(root) else {
            break;
        };
        hosts.push(synthesize(doc, host).selector);
        cursor = host;
    }
    hosts.reverse();
    hosts
}

fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

/// First element in the document matching a stored selector. Invalid
/// selectors find nothing.
///
/// Shadow trees are not searched, and a selector taken from a shadow element
/// may match an unrelated light-tree element here. Use [`relocate_record`]
/// for records.
pub fn relocate(doc: &Document, selector: &str) -> Option<NodeId> {
    relocate_in(doc, SearchScope::Document, selector)
}

pub fn relocate_in(doc: &Document, scope: SearchScope, selector: &str) -> Option<NodeId> {
    agt_query::query_first(doc, scope, selector).unwrap_or_else(|e| {
        debug!(error = %e, "relocation failed");
        None
    })
}

/// Re-locate a record's element, descending through its shadow hosts.
pub fn relocate_record(doc: &Document, record: &SelectionRecord) -> Option<NodeId> {
    relocate_through(doc, record.hosts.as_slice(), &record.selector)
}

/// Resolve each host selector inside the previous host's shadow root, starting
/// from the document, then `selector` inside the last one.
pub fn relocate_through<S: AsRef<str>>(doc: &Document, hosts: &[S], selector: &str) -> Option<NodeId> {
    let mut scope = SearchScope::Document;
    for host_selector in hosts {
        let host_selector = host_selector.as_ref();
        let host = relocate_in(doc, scope, host_selector)?;
        let Some(root) = doc.shadow_root_of(host) else {
            debug!(selector = %host_selector, "host has no shadow root");
            return None;
        };
        scope = SearchScope::Shadow(root);
    }
    relocate_in(doc, scope, selector)
}

pub fn relocate_all(doc: &Document, selector: &str) -> Vec<NodeId> {
    agt_query::query_all(doc, SearchScope::Document, selector).unwrap_or_else(|e| {
        debug!(error = %e, "relocation failed");
        Vec::new()
    })
}

/// Whether `node` belongs to the inspector's own overlay: it or an ancestor in
/// the same tree carries an own-UI id or the marker attribute.
pub fn is_own_element(doc: &Document, node: NodeId, config: &OwnUiConfig) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if let Some(element) = doc.element(current) {
            if element.id().is_some_and(|id| config.ids.iter().any(|own| own == id)) {
                return true;
            }
            if element.attributes().contains(&config.marker_attribute) {
                return true;
            }
        }
        cursor = doc.parent_element(current);
    }
    false
}
