use super::SynthesisContext;
use crate::oracle::UniquenessOracle;
use agt_common::protocol::{Candidate, StrategyTag};
use agt_query::serialize_identifier;

/// `#id`, if the id is present and unique in scope. A duplicated id yields nothing.
pub fn try_identifier<O: UniquenessOracle + ?Sized>(cx: &SynthesisContext<'_, O>) -> Option<Candidate> {
    let id = cx.element.id()?;
    if id.trim().is_empty() {
        return None;
    }

    let selector = format!("#{}", serialize_identifier(id));
    cx.verify(&selector).then(|| Candidate::new(selector, StrategyTag::Id))
}
