//! Assessment and catalog error types.
//!
//! `AssessmentError` covers caller mistakes while answering a session.
//! `CatalogError` covers structural problems found while loading a catalog;
//! a catalog that constructs successfully never produces one at runtime.

use thiserror::Error;

use crate::model::{Category, Recommendation};

/// Errors returned when recording an answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// The identifier does not name a question in the catalog.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// The raw value lies outside what the question accepts.
    #[error("value {value} out of range for {question_id} (expected {min}..={max})")]
    OutOfRangeValue {
        question_id: String,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// Structural errors detected when a catalog is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("duplicate question ID: {0}")]
    DuplicateQuestion(String),

    #[error("question {id} must start with '{}' to belong to {category}", .category.id_prefix())]
    PrefixMismatch { id: String, category: Category },

    #[error("question {id} has non-positive weight {weight}")]
    InvalidWeight { id: String, weight: f64 },

    #[error("multiple-choice question {0} has no options")]
    MissingOptions(String),

    #[error("likert question {0} must not list options")]
    UnexpectedOptions(String),

    #[error("scoring rule references unknown question: {0}")]
    UnknownRuleTarget(String),

    #[error("scoring rule for {0} requires a multiple-choice question")]
    RuleOnNonChoice(String),

    #[error("question {0} has both an answer key and option scores")]
    ConflictingRules(String),

    #[error("answer key {index} for {id} is outside its {options} options")]
    AnswerKeyOutOfBounds {
        id: String,
        index: usize,
        options: usize,
    },

    #[error("option scores for {id} list {found} entries, question has {expected} options")]
    OptionScoresLength {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("section {0} has no questions")]
    EmptySection(Category),

    #[error("no tier defined for recommendation '{0}'")]
    MissingTier(Recommendation),

    #[error("recommendation tier '{0}' defined more than once")]
    DuplicateTier(Recommendation),

    #[error("skill gap '{0}' must set both metric and below, or neither")]
    IncompleteGapRule(String),
}
