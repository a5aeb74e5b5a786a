use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("choice questions must have at least one option")]
    NoOptions,

    #[error("correct answer index {index} is out of range for {options} options")]
    AnswerIndexOutOfRange { index: usize, options: usize },

    #[error("multiple-choice questions must have at least one correct index")]
    EmptyCorrectSet,

    #[error("open-ended questions must carry a non-empty reference answer")]
    EmptyReference,
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// The four supported question shapes.
///
/// The answer payload lives inside the variant, so a question can never carry
/// a correct-answer shape that disagrees with its type. Adding a new kind is a
/// compile-time-checked change everywhere questions are matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// One correct option out of an ordered list.
    Single { options: Vec<String>, correct: usize },
    /// A set of correct options; graded by exact set equality.
    Multiple {
        options: Vec<String>,
        correct: BTreeSet<usize>,
    },
    /// Plain boolean statement.
    TrueFalse { correct: bool },
    /// Free-text answer; the reference string is grading context for the
    /// oracle, never compared directly.
    OpenEnded { reference: String },
}

impl QuestionKind {
    /// Returns true for kinds whose correctness is decided locally.
    #[must_use]
    pub fn is_closed_form(&self) -> bool {
        !matches!(self, QuestionKind::OpenEnded { .. })
    }

    /// Returns true for open-ended kinds, which defer to the grading oracle.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        matches!(self, QuestionKind::OpenEnded { .. })
    }

    fn validate(&self) -> Result<(), QuestionError> {
        match self {
            QuestionKind::Single { options, correct } => {
                if options.is_empty() {
                    return Err(QuestionError::NoOptions);
                }
                if *correct >= options.len() {
                    return Err(QuestionError::AnswerIndexOutOfRange {
                        index: *correct,
                        options: options.len(),
                    });
                }
                Ok(())
            }
            QuestionKind::Multiple { options, correct } => {
                if options.is_empty() {
                    return Err(QuestionError::NoOptions);
                }
                if correct.is_empty() {
                    return Err(QuestionError::EmptyCorrectSet);
                }
                if let Some(&index) = correct.iter().find(|&&i| i >= options.len()) {
                    return Err(QuestionError::AnswerIndexOutOfRange {
                        index,
                        options: options.len(),
                    });
                }
                Ok(())
            }
            QuestionKind::TrueFalse { .. } => Ok(()),
            QuestionKind::OpenEnded { reference } => {
                if reference.trim().is_empty() {
                    return Err(QuestionError::EmptyReference);
                }
                Ok(())
            }
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One quiz item: prompt, explanation, and a kind-specific answer payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    explanation: String,
    #[serde(flatten)]
    kind: QuestionKind,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty or the kind payload is
    /// internally inconsistent (no options, out-of-range index, empty
    /// reference answer).
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        explanation: impl Into<String>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        kind.validate()?;
        Ok(Self {
            id,
            prompt,
            explanation: explanation.into(),
            kind,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Returns true if this question is graded locally.
    #[must_use]
    pub fn is_closed_form(&self) -> bool {
        self.kind.is_closed_form()
    }

    /// Returns true if this question requires the external grading oracle.
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.kind.is_open_ended()
    }

    /// The reference model answer for open-ended questions, if any.
    #[must_use]
    pub fn reference_answer(&self) -> Option<&str> {
        match &self.kind {
            QuestionKind::OpenEnded { reference } => Some(reference.as_str()),
            _ => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn single(options: &[&str], correct: usize) -> QuestionKind {
        QuestionKind::Single {
            options: options.iter().map(|s| (*s).to_string()).collect(),
            correct,
        }
    }

    #[test]
    fn question_fails_on_blank_prompt() {
        let err = Question::new(
            QuestionId::new(1),
            "   ",
            "because",
            single(&["a", "b"], 0),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn single_rejects_out_of_range_correct_index() {
        let err = Question::new(QuestionId::new(1), "Q?", "", single(&["a", "b"], 2)).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::AnswerIndexOutOfRange {
                index: 2,
                options: 2
            }
        ));
    }

    #[test]
    fn multiple_rejects_empty_correct_set() {
        let kind = QuestionKind::Multiple {
            options: vec!["a".into(), "b".into()],
            correct: BTreeSet::new(),
        };
        let err = Question::new(QuestionId::new(1), "Q?", "", kind).unwrap_err();
        assert_eq!(err, QuestionError::EmptyCorrectSet);
    }

    #[test]
    fn multiple_rejects_out_of_range_member() {
        let kind = QuestionKind::Multiple {
            options: vec!["a".into(), "b".into()],
            correct: BTreeSet::from([0, 5]),
        };
        let err = Question::new(QuestionId::new(1), "Q?", "", kind).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::AnswerIndexOutOfRange { index: 5, .. }
        ));
    }

    #[test]
    fn open_ended_requires_reference_answer() {
        let kind = QuestionKind::OpenEnded {
            reference: "  ".into(),
        };
        let err = Question::new(QuestionId::new(1), "Explain X", "", kind).unwrap_err();
        assert_eq!(err, QuestionError::EmptyReference);
    }

    #[test]
    fn valid_question_exposes_accessors() {
        let q = Question::new(
            QuestionId::new(3),
            "Pick one",
            "first option is right",
            single(&["a", "b", "c"], 0),
        )
        .unwrap();
        assert_eq!(q.id(), QuestionId::new(3));
        assert_eq!(q.prompt(), "Pick one");
        assert!(q.is_closed_form());
        assert!(!q.is_open_ended());
        assert_eq!(q.reference_answer(), None);
    }

    #[test]
    fn open_ended_exposes_reference() {
        let q = Question::new(
            QuestionId::new(4),
            "Explain ownership",
            "",
            QuestionKind::OpenEnded {
                reference: "Ownership moves values.".into(),
            },
        )
        .unwrap();
        assert!(q.is_open_ended());
        assert_eq!(q.reference_answer(), Some("Ownership moves values."));
    }

    #[test]
    fn kind_serde_uses_type_tag() {
        let q = Question::new(
            QuestionId::new(1),
            "True or false?",
            "",
            QuestionKind::TrueFalse { correct: true },
        )
        .unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "true_false");
    }
}
