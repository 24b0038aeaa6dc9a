use super::SynthesisContext;
use crate::oracle::UniquenessOracle;
use agt_common::protocol::{Candidate, StrategyTag};
use agt_query::serialize_identifier;

/// Attributes that tend to survive redesigns, highest priority first.
pub const SEMANTIC_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "data-cy",
    "data-test",
    "data-qa",
    "data-id",
    "name",
    "aria-label",
    "aria-labelledby",
    "role",
    "title",
    "placeholder",
    "alt",
    "href",
];

/// Longer values are usually serialized state, not a label.
pub const MAX_ATTRIBUTE_VALUE_LEN: usize = 100;

/// First semantic attribute that pins the element down, qualified by tag if
/// possible and bare otherwise.
pub fn try_attribute<O: UniquenessOracle + ?Sized>(cx: &SynthesisContext<'_, O>) -> Option<Candidate> {
    let tag = serialize_identifier(cx.element.tag_name());

    for &name in SEMANTIC_ATTRIBUTES {
        let Some(value) = cx.element.attribute(name) else {
            continue;
        };
        if value.trim().is_empty() || value.chars().count() > MAX_ATTRIBUTE_VALUE_LEN {
            continue;
        }

        let predicate = format!("[{}=\"{}\"]", name, serialize_identifier(value));
        let qualified = format!("{tag}{predicate}");
        if cx.verify(&qualified) {
            return Some(Candidate::new(qualified, StrategyTag::Attribute));
        }
        if cx.verify(&predicate) {
            return Some(Candidate::new(predicate, StrategyTag::Attribute));
        }
    }

    None
}
