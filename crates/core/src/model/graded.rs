use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::quiz::Quiz;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GradedQuestionError {
    #[error("grading score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),
}

//
// ─── GRADE ─────────────────────────────────────────────────────────────────────
//

/// Discrete grade assigned by the open-ended grading oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Correct,
    Partial,
    Incorrect,
}

//
// ─── GRADED QUESTION ───────────────────────────────────────────────────────────
//

/// Oracle verdict for one open-ended answer.
///
/// Created once per scoring pass and discarded after weak-area extraction;
/// only the derived weak areas and improvements travel downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedQuestion {
    grade: Grade,
    score: f64,
    feedback: String,
    improvements: Vec<String>,
    weak_areas: Vec<String>,
}

impl GradedQuestion {
    /// Creates a graded question, validating the score range.
    ///
    /// # Errors
    ///
    /// Returns `GradedQuestionError::ScoreOutOfRange` when `score` falls
    /// outside `[0, 1]`. Oracle responses with such scores are treated as
    /// malformed wholesale.
    pub fn new(
        grade: Grade,
        score: f64,
        feedback: impl Into<String>,
        improvements: Vec<String>,
        weak_areas: Vec<String>,
    ) -> Result<Self, GradedQuestionError> {
        if !(0.0..=1.0).contains(&score) || score.is_nan() {
            return Err(GradedQuestionError::ScoreOutOfRange(score));
        }
        Ok(Self {
            grade,
            score,
            feedback: feedback.into(),
            improvements,
            weak_areas,
        })
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Fractional point value in `[0, 1]`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    #[must_use]
    pub fn improvements(&self) -> &[String] {
        &self.improvements
    }

    #[must_use]
    pub fn weak_areas(&self) -> &[String] {
        &self.weak_areas
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Per-question outcome classification after a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Partial,
    Incorrect,
}

impl From<Grade> for Outcome {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Correct => Outcome::Correct,
            Grade::Partial => Outcome::Partial,
            Grade::Incorrect => Outcome::Incorrect,
        }
    }
}

/// Outcome keyed by the originating question's id.
///
/// Downstream consumers correlate by id rather than position, so reordering
/// or filtering the question list cannot silently misattribute results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub outcome: Outcome,
}

//
// ─── SCORING RESULT ────────────────────────────────────────────────────────────
//

/// The unified result of scoring one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Integer percentage in 0–100, round-half-up.
    score: u8,
    /// Oracle verdicts in *filtered open-ended order*, not full quiz order.
    /// Empty when the quiz has no open-ended questions or the oracle call
    /// failed and the partial-credit fallback was applied.
    grading_results: Vec<GradedQuestion>,
    /// Per-question classifications, one per quiz question, keyed by id.
    outcomes: Vec<QuestionOutcome>,
}

impl ScoringResult {
    #[must_use]
    pub fn new(
        score: u8,
        grading_results: Vec<GradedQuestion>,
        outcomes: Vec<QuestionOutcome>,
    ) -> Self {
        Self {
            score,
            grading_results,
            outcomes,
        }
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn grading_results(&self) -> &[GradedQuestion] {
        &self.grading_results
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// Pairs each graded open-ended question with its oracle verdict.
    ///
    /// The pairing is re-derived by filtering the quiz's questions for
    /// open-ended kinds and zipping with `grading_results` in that filtered
    /// order; that positional indirection is the load-bearing contract
    /// between a quiz and its scoring result. Yields nothing when the
    /// fallback path left `grading_results` empty.
    pub fn graded_open_ended<'a>(
        &'a self,
        quiz: &'a Quiz,
    ) -> impl Iterator<Item = (QuestionId, &'a GradedQuestion)> {
        quiz.open_ended_questions()
            .map(crate::model::question::Question::id)
            .zip(self.grading_results.iter())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
