//! Classification rules aggregate

pub mod model;
pub mod repository;

pub use model::{
    suggest, ClassificationCandidate, ClassificationRule, NewClassificationRule, Suggestion,
};
pub use repository::ClassificationRuleRepository;
