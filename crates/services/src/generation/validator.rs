//! Structural validation of LLM-proposed questions.
//!
//! Candidates arrive as loosely typed JSON; any violation rejects the whole
//! candidate, not just the offending field. Rejections are never surfaced to
//! callers, they only count toward the regeneration shortfall.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

use tutor_core::model::{Question, QuestionError, QuestionId, QuestionKind};

//
// ─── CANDIDATE SHAPE ───────────────────────────────────────────────────────────
//

/// Raw question candidate as returned by the generation oracle.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

//
// ─── REJECTION REASONS ─────────────────────────────────────────────────────────
//

/// Why a candidate was dropped. Internal accounting only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CandidateRejection {
    #[error("candidate has no question text")]
    MissingQuestion,
    #[error("unrecognized question type {0:?}")]
    UnknownType(String),
    #[error("candidate has no answer")]
    MissingAnswer,
    #[error("true/false answer must be a boolean")]
    NonBooleanAnswer,
    #[error("open-ended answer must be a non-empty string")]
    EmptyTextAnswer,
    #[error("expected {expected} choices, got {got}")]
    WrongChoiceCount { expected: usize, got: usize },
    #[error("answer {0:?} does not match any choice")]
    UnresolvableAnswer(String),
    #[error("multiple-choice answer must be a non-empty array of strings")]
    BadAnswerArray,
    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Validates one candidate and converts it into a domain `Question`.
///
/// Answer values resolve to choice indices by exact string equality. For
/// multiple-choice candidates every answer element must resolve
/// independently; one failure rejects the entire candidate.
///
/// # Errors
///
/// Returns `CandidateRejection` describing the first violation found.
pub fn validate_candidate(
    candidate: &CandidateQuestion,
    id: QuestionId,
    number_of_choices: usize,
) -> Result<Question, CandidateRejection> {
    if candidate.question.trim().is_empty() {
        return Err(CandidateRejection::MissingQuestion);
    }
    if candidate.answer.is_null() {
        return Err(CandidateRejection::MissingAnswer);
    }

    let kind = match candidate.kind.as_str() {
        "single" => {
            let choices = checked_choices(candidate, number_of_choices)?;
            let correct = resolve_answer(&candidate.answer, choices)?;
            QuestionKind::Single {
                options: choices.to_vec(),
                correct,
            }
        }
        "multiple" => {
            let choices = checked_choices(candidate, number_of_choices)?;
            let Some(values) = candidate.answer.as_array() else {
                return Err(CandidateRejection::BadAnswerArray);
            };
            if values.is_empty() {
                return Err(CandidateRejection::BadAnswerArray);
            }
            let mut correct = BTreeSet::new();
            for value in values {
                correct.insert(resolve_answer(value, choices)?);
            }
            QuestionKind::Multiple {
                options: choices.to_vec(),
                correct,
            }
        }
        "true_false" => {
            let Some(correct) = candidate.answer.as_bool() else {
                return Err(CandidateRejection::NonBooleanAnswer);
            };
            QuestionKind::TrueFalse { correct }
        }
        "open_ended" => {
            let reference = candidate
                .answer
                .as_str()
                .ok_or(CandidateRejection::EmptyTextAnswer)?;
            if reference.trim().is_empty() {
                return Err(CandidateRejection::EmptyTextAnswer);
            }
            QuestionKind::OpenEnded {
                reference: reference.to_string(),
            }
        }
        other => return Err(CandidateRejection::UnknownType(other.to_string())),
    };

    let explanation = candidate.explanation.clone().unwrap_or_default();
    Ok(Question::new(id, candidate.question.clone(), explanation, kind)?)
}

fn checked_choices(
    candidate: &CandidateQuestion,
    number_of_choices: usize,
) -> Result<&[String], CandidateRejection> {
    let choices = candidate.choices.as_deref().unwrap_or_default();
    if choices.len() != number_of_choices {
        return Err(CandidateRejection::WrongChoiceCount {
            expected: number_of_choices,
            got: choices.len(),
        });
    }
    Ok(choices)
}

fn resolve_answer(value: &Value, choices: &[String]) -> Result<usize, CandidateRejection> {
    let Some(text) = value.as_str() else {
        return Err(CandidateRejection::UnresolvableAnswer(value.to_string()));
    };
    choices
        .iter()
        .position(|choice| choice == text)
        .ok_or_else(|| CandidateRejection::UnresolvableAnswer(text.to_string()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
