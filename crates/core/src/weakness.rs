//! Weak-area and strength extraction from a completed scoring pass.
//!
//! Feeds the longitudinal per-topic progress record and the weak-area hints
//! handed to the question generator for follow-up quizzes.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::{GradedQuestion, Outcome, Quiz, QuestionId, ScoringResult};

/// Deduplicated weak-area and strength tags derived from one scoring pass.
///
/// A `partial` outcome counts as a strength at the question level (the
/// learner is on the right track) while its oracle-reported weak areas are
/// still surfaced, so the specific gaps get flagged without penalizing the
/// whole question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessReport {
    pub weak_areas: Vec<String>,
    pub strengths: Vec<String>,
}

impl WeaknessReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weak_areas.is_empty() && self.strengths.is_empty()
    }
}

/// Derives weak areas and strengths from a quiz and its scoring result.
///
/// Question prompts land in `strengths` for `correct`/`partial` outcomes and
/// in `weak_areas` for `incorrect` ones. For `partial` and `incorrect`
/// open-ended questions, the oracle's finer-grained weak-area tags are also
/// appended. Both lists are deduplicated by exact string equality, first
/// occurrence wins.
#[must_use]
pub fn extract(quiz: &Quiz, result: &ScoringResult) -> WeaknessReport {
    let graded: HashMap<QuestionId, &GradedQuestion> = result.graded_open_ended(quiz).collect();
    let outcomes: HashMap<QuestionId, Outcome> = result
        .outcomes()
        .iter()
        .map(|o| (o.question_id, o.outcome))
        .collect();

    let mut weak_areas = Vec::new();
    let mut strengths = Vec::new();

    for question in quiz.questions() {
        let Some(outcome) = outcomes.get(&question.id()).copied() else {
            continue;
        };

        match outcome {
            Outcome::Correct | Outcome::Partial => strengths.push(question.prompt().to_owned()),
            Outcome::Incorrect => weak_areas.push(question.prompt().to_owned()),
        }

        if matches!(outcome, Outcome::Partial | Outcome::Incorrect) {
            if let Some(verdict) = graded.get(&question.id()) {
                weak_areas.extend(verdict.weak_areas().iter().cloned());
            }
        }
    }

    WeaknessReport {
        weak_areas: dedupe(weak_areas),
        strengths: dedupe(strengths),
    }
}

fn dedupe(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Difficulty, Grade, Question, QuestionKind, QuestionOutcome, QuizId, ScoringResult,
    };

    fn true_false(id: u64, prompt: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            prompt,
            "",
            QuestionKind::TrueFalse { correct: true },
        )
        .unwrap()
    }

    fn open_ended(id: u64, prompt: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            prompt,
            "",
            QuestionKind::OpenEnded {
                reference: "ref".into(),
            },
        )
        .unwrap()
    }

    fn graded(grade: Grade, score: f64, weak_areas: &[&str]) -> GradedQuestion {
        GradedQuestion::new(
            grade,
            score,
            "feedback",
            vec![],
            weak_areas.iter().map(|s| (*s).to_string()).collect(),
        )
        .unwrap()
    }

    fn outcome(id: u64, outcome: Outcome) -> QuestionOutcome {
        QuestionOutcome {
            question_id: QuestionId::new(id),
            outcome,
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz::new(QuizId::generate(), "Quiz", "rust", Difficulty::Easy, questions).unwrap()
    }

    #[test]
    fn correct_prompts_become_strengths_and_incorrect_become_weak_areas() {
        let quiz = quiz(vec![true_false(1, "Q1"), true_false(2, "Q2")]);
        let result = ScoringResult::new(
            50,
            vec![],
            vec![outcome(1, Outcome::Correct), outcome(2, Outcome::Incorrect)],
        );

        let report = extract(&quiz, &result);
        assert_eq!(report.strengths, vec!["Q1".to_string()]);
        assert_eq!(report.weak_areas, vec!["Q2".to_string()]);
    }

    #[test]
    fn partial_prompt_is_a_strength_but_its_weak_areas_surface() {
        let quiz = quiz(vec![open_ended(1, "Explain lifetimes")]);
        let result = ScoringResult::new(
            50,
            vec![graded(Grade::Partial, 0.5, &["borrow checker", "scopes"])],
            vec![outcome(1, Outcome::Partial)],
        );

        let report = extract(&quiz, &result);
        assert_eq!(report.strengths, vec!["Explain lifetimes".to_string()]);
        assert!(!report.weak_areas.contains(&"Explain lifetimes".to_string()));
        assert_eq!(
            report.weak_areas,
            vec!["borrow checker".to_string(), "scopes".to_string()]
        );
    }

    #[test]
    fn incorrect_open_ended_contributes_prompt_and_oracle_tags() {
        let quiz = quiz(vec![open_ended(1, "Explain traits")]);
        let result = ScoringResult::new(
            0,
            vec![graded(Grade::Incorrect, 0.0, &["dynamic dispatch"])],
            vec![outcome(1, Outcome::Incorrect)],
        );

        let report = extract(&quiz, &result);
        assert_eq!(
            report.weak_areas,
            vec!["Explain traits".to_string(), "dynamic dispatch".to_string()]
        );
        assert!(report.strengths.is_empty());
    }

    #[test]
    fn duplicate_tags_are_collapsed_keeping_first_occurrence() {
        let quiz = quiz(vec![
            open_ended(1, "Explain A"),
            open_ended(2, "Explain B"),
        ]);
        let result = ScoringResult::new(
            25,
            vec![
                graded(Grade::Incorrect, 0.0, &["definitions"]),
                graded(Grade::Partial, 0.5, &["definitions", "syntax"]),
            ],
            vec![outcome(1, Outcome::Incorrect), outcome(2, Outcome::Partial)],
        );

        let report = extract(&quiz, &result);
        assert_eq!(
            report.weak_areas,
            vec![
                "Explain A".to_string(),
                "definitions".to_string(),
                "syntax".to_string()
            ]
        );
        assert_eq!(report.strengths, vec!["Explain B".to_string()]);
    }

    #[test]
    fn fallback_pass_without_verdicts_still_classifies_prompts() {
        // Oracle failed: grading results are empty, open-ended outcomes are
        // partial, so prompts land in strengths with no finer-grained tags.
        let quiz = quiz(vec![open_ended(1, "Explain X"), true_false(2, "Q2")]);
        let result = ScoringResult::new(
            75,
            vec![],
            vec![outcome(1, Outcome::Partial), outcome(2, Outcome::Correct)],
        );

        let report = extract(&quiz, &result);
        assert_eq!(
            report.strengths,
            vec!["Explain X".to_string(), "Q2".to_string()]
        );
        assert!(report.weak_areas.is_empty());
    }
}
