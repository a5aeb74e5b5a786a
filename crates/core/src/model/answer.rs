use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A learner's answer to one question.
///
/// Answers are positionally aligned with the quiz's question list and the
/// sequence is always exactly as long as the question list. An unanswered
/// question is `Blank` (or an empty selection / empty text), never a missing
/// slot. A variant that does not match the question's kind counts as a wrong
/// answer during grading, not as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAnswer {
    /// Selected option indices for single/multiple-choice questions.
    Selection(BTreeSet<usize>),
    /// True/false response.
    Boolean(bool),
    /// Free text for open-ended questions.
    Text(String),
    /// Explicit unanswered sentinel, valid for any question kind.
    Blank,
}

impl UserAnswer {
    /// Convenience constructor for a single selected index.
    #[must_use]
    pub fn selected(index: usize) -> Self {
        Self::Selection(BTreeSet::from([index]))
    }

    /// Convenience constructor for a set of selected indices.
    #[must_use]
    pub fn selected_all<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self::Selection(indices.into_iter().collect())
    }

    /// Returns true if this answer carries no content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            UserAnswer::Selection(set) => set.is_empty(),
            UserAnswer::Text(text) => text.trim().is_empty(),
            UserAnswer::Boolean(_) => false,
            UserAnswer::Blank => true,
        }
    }

    /// The free-text content of this answer, empty for non-text variants.
    ///
    /// Used when assembling oracle batch requests, where a blank answer is
    /// still submitted for grading (and graded as such by the oracle).
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            UserAnswer::Text(text) => text.as_str(),
            _ => "",
        }
    }
}
