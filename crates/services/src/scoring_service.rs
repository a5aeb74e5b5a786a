use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use tutor_core::grader::{ClosedFormOutcome, grade_answer};
use tutor_core::model::{
    Outcome, Quiz, QuestionId, QuestionOutcome, ScoringResult, UserAnswer,
};

use crate::error::ScoringError;
use crate::grading_oracle::{GradingItem, OpenEndedGrader};

/// Points granted to each open-ended question when the grading oracle is
/// unavailable. The learner still gets a score; the gap is logged.
const FALLBACK_OPEN_ENDED_POINTS: f64 = 0.5;

//
// ─── SCORING ENGINE ────────────────────────────────────────────────────────────
//

/// Produces one `ScoringResult` for a quiz and its aligned answer sequence.
///
/// Closed-form questions are graded locally; all open-ended questions go to
/// the grading oracle in a single batch call, one network round-trip per
/// scoring invocation regardless of how many open-ended questions exist.
/// Retries, if any, belong to the oracle's transport, not here.
pub struct ScoringEngine {
    grader: Arc<dyn OpenEndedGrader>,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(grader: Arc<dyn OpenEndedGrader>) -> Self {
        Self { grader }
    }

    /// Score a quiz against a positionally aligned answer sequence.
    ///
    /// Oracle failure is recovered locally: every open-ended question gets
    /// the fixed partial-credit fallback, `grading_results` comes back
    /// empty, and the failure is logged. Input-shape problems are the only
    /// errors surfaced to the caller.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::AnswerCountMismatch` when the answer sequence
    /// is not exactly as long as the question list.
    pub async fn score(
        &self,
        quiz: &Quiz,
        answers: &[UserAnswer],
    ) -> Result<ScoringResult, ScoringError> {
        if answers.len() != quiz.len() {
            return Err(ScoringError::AnswerCountMismatch {
                expected: quiz.len(),
                got: answers.len(),
            });
        }

        let mut total_points = 0.0;
        let mut decided: HashMap<QuestionId, Outcome> = HashMap::with_capacity(quiz.len());
        let mut open_items: Vec<GradingItem> = Vec::new();
        let mut open_ids: Vec<QuestionId> = Vec::new();

        for (question, answer) in quiz.questions().iter().zip(answers) {
            match grade_answer(question, answer) {
                ClosedFormOutcome::Correct => {
                    total_points += 1.0;
                    decided.insert(question.id(), Outcome::Correct);
                }
                ClosedFormOutcome::Incorrect => {
                    decided.insert(question.id(), Outcome::Incorrect);
                }
                ClosedFormOutcome::Deferred => {
                    open_items.push(GradingItem {
                        question: question.prompt().to_owned(),
                        answer: answer.text().to_owned(),
                        context: question.reference_answer().unwrap_or_default().to_owned(),
                    });
                    open_ids.push(question.id());
                }
            }
        }

        let mut grading_results = Vec::new();
        if !open_items.is_empty() {
            match self.grader.grade_batch(&open_items).await {
                Ok(verdicts) => {
                    for (id, verdict) in open_ids.iter().zip(&verdicts) {
                        total_points += verdict.score();
                        decided.insert(*id, Outcome::from(verdict.grade()));
                    }
                    grading_results = verdicts;
                }
                Err(err) => {
                    warn!(
                        open_ended = open_ids.len(),
                        error = %err,
                        "grading oracle unavailable, applying partial-credit fallback"
                    );
                    #[allow(clippy::cast_precision_loss)]
                    {
                        total_points += FALLBACK_OPEN_ENDED_POINTS * open_ids.len() as f64;
                    }
                    for id in &open_ids {
                        decided.insert(*id, Outcome::Partial);
                    }
                }
            }
        }

        let outcomes = quiz
            .questions()
            .iter()
            .map(|q| QuestionOutcome {
                question_id: q.id(),
                // Every question was classified above; incorrect is the
                // conservative default should that ever not hold.
                outcome: decided
                    .get(&q.id())
                    .copied()
                    .unwrap_or(Outcome::Incorrect),
            })
            .collect();

        Ok(ScoringResult::new(
            percentage(total_points, quiz.len()),
            grading_results,
            outcomes,
        ))
    }
}

/// Round-half-up percentage of `points` out of `total` questions.
///
/// Rounding happens once, on the final percentage, never on intermediate
/// fractions.
fn percentage(points: f64, total: usize) -> u8 {
    #[allow(clippy::cast_precision_loss)]
    let percent = (100.0 * points / total as f64).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        percent.clamp(0.0, 100.0) as u8
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
