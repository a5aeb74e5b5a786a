//! End-to-end flow: score a mixed quiz, extract weak areas, persist
//! progress, and feed the accumulated hints into a follow-up generation
//! request.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use services::generation::{
    CandidateQuestion, GenerationRequest, QuestionGenerationService, QuestionGenerator,
};
use services::grading_oracle::{GradingItem, OpenEndedGrader};
use services::{Clock, GenerationOracleError, GradingOracleError, LlmClientError, ProgressService, ScoringEngine};
use storage::repository::{InMemoryProgressRepository, ProgressRepository};
use tutor_core::model::{
    Difficulty, Grade, GradedQuestion, Question, QuestionId, QuestionKind, Quiz, QuizId,
    UserAnswer,
};
use tutor_core::time::fixed_now;
use tutor_core::weakness;

struct CannedGrader(Vec<GradedQuestion>);

#[async_trait]
impl OpenEndedGrader for CannedGrader {
    async fn grade_batch(
        &self,
        _items: &[GradingItem],
    ) -> Result<Vec<GradedQuestion>, GradingOracleError> {
        Ok(self.0.clone())
    }
}

struct DownGrader;

#[async_trait]
impl OpenEndedGrader for DownGrader {
    async fn grade_batch(
        &self,
        _items: &[GradingItem],
    ) -> Result<Vec<GradedQuestion>, GradingOracleError> {
        Err(GradingOracleError::Client(LlmClientError::EmptyResponse))
    }
}

struct EchoGenerator;

#[async_trait]
impl QuestionGenerator for EchoGenerator {
    async fn propose(
        &self,
        request: &GenerationRequest,
        count: usize,
    ) -> Result<Vec<CandidateQuestion>, GenerationOracleError> {
        // Bake the first hint into the prompts so the test can observe that
        // stored weak areas reached the oracle.
        let hint = request
            .weak_area_hints
            .first()
            .cloned()
            .unwrap_or_else(|| "general".into());
        Ok((0..count)
            .map(|n| {
                serde_json::from_value(json!({
                    "question": format!("About {hint}, statement {n} holds"),
                    "type": "true_false",
                    "answer": true
                }))
                .unwrap()
            })
            .collect())
    }
}

fn mixed_quiz() -> Quiz {
    let questions = vec![
        Question::new(
            QuestionId::new(1),
            "Which keyword binds a variable?",
            "let introduces a binding",
            QuestionKind::Single {
                options: vec!["let".into(), "def".into(), "var".into()],
                correct: 0,
            },
        )
        .unwrap(),
        Question::new(
            QuestionId::new(2),
            "Rust has a garbage collector",
            "ownership replaces GC",
            QuestionKind::TrueFalse { correct: false },
        )
        .unwrap(),
        Question::new(
            QuestionId::new(3),
            "Explain what a lifetime annotation does",
            "",
            QuestionKind::OpenEnded {
                reference: "Lifetimes relate the validity of references.".into(),
            },
        )
        .unwrap(),
    ];
    Quiz::new(QuizId::generate(), "Rust basics", "rust", Difficulty::Medium, questions).unwrap()
}

#[tokio::test]
async fn score_extract_persist_and_personalize() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let progress = ProgressService::new(Clock::fixed(fixed_now()), Arc::clone(&repo) as _);

    // Q1 correct, Q2 wrong, Q3 graded partial at 0.5 -> 1.5 / 3 = 50.
    let engine = ScoringEngine::new(Arc::new(CannedGrader(vec![
        GradedQuestion::new(
            Grade::Partial,
            0.5,
            "right idea, vague wording",
            vec!["name the borrow relationship".into()],
            vec!["definitions".into()],
        )
        .unwrap(),
    ])));

    let quiz = mixed_quiz();
    let answers = [
        UserAnswer::selected(0),
        UserAnswer::Boolean(true),
        UserAnswer::Text("it says how long things live".into()),
    ];

    let result = engine.score(&quiz, &answers).await.expect("score");
    assert_eq!(result.score(), 50);
    assert_eq!(result.grading_results().len(), 1);

    let report = weakness::extract(&quiz, &result);
    assert_eq!(
        report.weak_areas,
        vec![
            "Rust has a garbage collector".to_string(),
            "definitions".to_string()
        ]
    );
    assert_eq!(
        report.strengths,
        vec![
            "Which keyword binds a variable?".to_string(),
            "Explain what a lifetime annotation does".to_string()
        ]
    );

    progress
        .record_quiz_outcome(quiz.topic(), &report, result.score())
        .await
        .expect("record progress");

    let record = repo.get_progress("rust").await.unwrap().expect("record");
    assert_eq!(record.last_score, 50);
    assert!(record.weak_areas.contains(&"definitions".to_string()));

    // Follow-up quiz generation sees the stored weak areas as hints.
    let hints = progress.weak_area_hints("rust").await.unwrap();
    let generation = QuestionGenerationService::new(Arc::new(EchoGenerator));
    let follow_up = generation
        .generate_quiz(&GenerationRequest {
            topic: "rust".into(),
            difficulty: Difficulty::Medium,
            count: 3,
            weak_area_hints: hints,
        })
        .await
        .expect("generate follow-up");

    assert_eq!(follow_up.len(), 3);
    assert!(
        follow_up.questions()[0]
            .prompt()
            .contains("Rust has a garbage collector")
    );
}

#[tokio::test]
async fn oracle_outage_still_scores_and_persists() {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let progress = ProgressService::new(Clock::fixed(fixed_now()), Arc::clone(&repo) as _);
    let engine = ScoringEngine::new(Arc::new(DownGrader));

    let quiz = mixed_quiz();
    let answers = [
        UserAnswer::selected(0),
        UserAnswer::Boolean(false),
        UserAnswer::Text("an attempt".into()),
    ];

    // 1 + 1 + 0.5 fallback = 2.5 / 3 -> 83.
    let result = engine.score(&quiz, &answers).await.expect("score");
    assert_eq!(result.score(), 83);
    assert!(result.grading_results().is_empty());

    let report = weakness::extract(&quiz, &result);
    // Fallback classifies the open-ended answer as partial: the prompt is a
    // strength and no finer-grained tags exist.
    assert!(report.weak_areas.is_empty());
    assert_eq!(report.strengths.len(), 3);

    progress
        .record_quiz_outcome(quiz.topic(), &report, result.score())
        .await
        .expect("record progress");
    let record = repo.get_progress("rust").await.unwrap().expect("record");
    assert_eq!(record.last_score, 83);
    assert!(record.weak_areas.is_empty());
}
