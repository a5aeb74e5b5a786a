//! Local grading of closed-form answers.
//!
//! Single, multiple, and true/false questions are decided here by plain
//! comparison, no I/O. Open-ended questions are never decided locally; the
//! grader defers them to the external grading oracle.

use std::collections::BTreeSet;

use crate::model::{Question, QuestionKind, UserAnswer};

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Verdict of local grading for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedFormOutcome {
    Correct,
    Incorrect,
    /// Open-ended questions cannot be decided locally.
    Deferred,
}

impl ClosedFormOutcome {
    /// Point value contributed to a quiz total. `Deferred` contributes
    /// nothing here; the oracle supplies its fractional score later.
    #[must_use]
    pub fn points(self) -> f64 {
        match self {
            ClosedFormOutcome::Correct => 1.0,
            ClosedFormOutcome::Incorrect | ClosedFormOutcome::Deferred => 0.0,
        }
    }
}

//
// ─── GRADER ────────────────────────────────────────────────────────────────────
//

/// Decides correctness of one answered question.
///
/// A mismatched answer variant (say, a boolean against a single-choice
/// question) and the `Blank` sentinel are ordinary wrong answers, never
/// errors: malformed input from a learner is a normal "incorrect" case.
#[must_use]
pub fn grade_answer(question: &Question, answer: &UserAnswer) -> ClosedFormOutcome {
    match question.kind() {
        QuestionKind::Single { correct, .. } => match answer {
            UserAnswer::Selection(selected) => {
                verdict(selected.len() == 1 && selected.contains(correct))
            }
            _ => ClosedFormOutcome::Incorrect,
        },
        QuestionKind::Multiple { correct, .. } => match answer {
            UserAnswer::Selection(selected) => verdict(selected == correct),
            _ => ClosedFormOutcome::Incorrect,
        },
        QuestionKind::TrueFalse { correct } => match answer {
            UserAnswer::Boolean(value) => verdict(value == correct),
            _ => ClosedFormOutcome::Incorrect,
        },
        QuestionKind::OpenEnded { .. } => ClosedFormOutcome::Deferred,
    }
}

fn verdict(correct: bool) -> ClosedFormOutcome {
    if correct {
        ClosedFormOutcome::Correct
    } else {
        ClosedFormOutcome::Incorrect
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
