use super::SynthesisContext;
use crate::oracle::UniquenessOracle;
use agt_common::dom::ElementData;
use agt_common::protocol::{Candidate, StrategyTag};
use agt_query::serialize_identifier;
use regex::Regex;
use std::sync::LazyLock;

/// Largest class subset tried. Keeps the search at C(n,1)+C(n,2)+C(n,3) queries.
pub const MAX_COMBINATION_SIZE: usize = 3;

const MAX_CLASS_LEN: usize = 60;

static HASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[a-f0-9]{6,}").unwrap());

/// False for class tokens that look generated (CSS-module hashes, counters).
pub fn is_stable_class(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with(|c: char| c.is_ascii_digit())
        && !HASH_RUN.is_match(token)
        && token.chars().count() < MAX_CLASS_LEN
}

/// The element's classes that pass [`is_stable_class`], in source order.
pub fn stable_classes(element: &ElementData) -> Vec<&str> {
    element
        .class_list()
        .into_iter()
        .filter(|c| is_stable_class(c))
        .collect()
}

pub fn try_classes<O: UniquenessOracle + ?Sized>(cx: &SynthesisContext<'_, O>) -> Option<Candidate> {
    let classes = stable_classes(cx.element);
    if classes.is_empty() {
        return None;
    }

    let tag = serialize_identifier(cx.element.tag_name());
    let escaped: Vec<String> = classes.iter().map(|c| serialize_identifier(c)).collect();

    for size in 1..=MAX_COMBINATION_SIZE.min(escaped.len()) {
        for combo in Combinations::new(escaped.len(), size) {
            let mut selector = tag.clone();
            for index in combo {
                selector.push('.');
                selector.push_str(&escaped[index]);
            }
            if cx.verify(&selector) {
                return Some(Candidate::new(selector, StrategyTag::Class));
            }
        }
    }

    None
}

/// Size-`k` index subsets of `0..n` in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        // advance the rightmost index that still has room
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}
