pub mod collect;
pub mod config;
pub mod oracle;
pub mod strategy;
pub mod synthesizer;

pub use agt_common::protocol;
pub use collect::{
    collect_element_data, is_own_element, relocate, relocate_all, relocate_in, relocate_record, relocate_through,
};
pub use oracle::{DocumentOracle, UniquenessOracle};
pub use synthesizer::{synthesize, synthesize_all, synthesize_with};
