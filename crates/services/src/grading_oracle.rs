//! Boundary to the open-ended grading oracle.
//!
//! The contract is positional and all-or-nothing: the oracle receives an
//! ordered batch of answer triples and must return exactly one verdict per
//! triple, in the same order. There is no partial success; any defect in the
//! response fails the whole batch, and `ScoringEngine` falls back to partial
//! credit.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Write as _;

use tutor_core::model::{Grade, GradedQuestion};

use crate::error::GradingOracleError;
use crate::llm_client::{LlmClient, strip_code_fences};

//
// ─── CONTRACT ──────────────────────────────────────────────────────────────────
//

/// One open-ended answer submitted for grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingItem {
    /// The question prompt.
    pub question: String,
    /// The learner's free-text answer, possibly empty.
    pub answer: String,
    /// The reference model answer, grading context only.
    pub context: String,
}

/// External grading capability for open-ended answers.
#[async_trait]
pub trait OpenEndedGrader: Send + Sync {
    /// Grade a non-empty batch of answers in one round-trip.
    ///
    /// The response must have the same length and order as `items`. Callers
    /// never invoke this with an empty batch; implementations may treat one
    /// as a precondition violation.
    ///
    /// # Errors
    ///
    /// Returns `GradingOracleError` when the batch fails wholesale. Partial
    /// failure is not part of the contract.
    async fn grade_batch(
        &self,
        items: &[GradingItem],
    ) -> Result<Vec<GradedQuestion>, GradingOracleError>;
}

//
// ─── LLM-BACKED GRADER ─────────────────────────────────────────────────────────
//

/// Reference grader that asks an LLM for a JSON verdict array.
#[derive(Clone)]
pub struct LlmGrader {
    client: LlmClient,
}

impl LlmGrader {
    #[must_use]
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LlmClient::from_env())
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }

    fn build_prompt(items: &[GradingItem]) -> String {
        let mut prompt = String::from(
            "You are grading open-ended quiz answers. For each item below, \
             compare the student's answer against the reference answer and \
             respond with a JSON array only, no prose, one object per item in \
             the same order, shaped as {\"grade\": \"correct\"|\"partial\"|\"incorrect\", \
             \"score\": number between 0 and 1, \"feedback\": string, \
             \"improvements\": [string], \"weak_areas\": [string]}.\n\n",
        );
        for (index, item) in items.iter().enumerate() {
            let _ = write!(
                prompt,
                "Item {n}:\nQuestion: {question}\nReference answer: {context}\nStudent answer: {answer}\n\n",
                n = index + 1,
                question = item.question,
                context = item.context,
                answer = if item.answer.trim().is_empty() {
                    "(no answer given)"
                } else {
                    item.answer.as_str()
                },
            );
        }
        prompt
    }

    fn parse_response(
        content: &str,
        expected: usize,
    ) -> Result<Vec<GradedQuestion>, GradingOracleError> {
        let payload = strip_code_fences(content);
        let verdicts: Vec<VerdictWire> = serde_json::from_str(payload)
            .map_err(|e| GradingOracleError::MalformedPayload(e.to_string()))?;

        if verdicts.len() != expected {
            return Err(GradingOracleError::CountMismatch {
                expected,
                got: verdicts.len(),
            });
        }

        verdicts
            .into_iter()
            .map(|wire| {
                GradedQuestion::new(
                    wire.grade,
                    wire.score,
                    wire.feedback,
                    wire.improvements,
                    wire.weak_areas,
                )
                .map_err(GradingOracleError::InvalidVerdict)
            })
            .collect()
    }
}

#[async_trait]
impl OpenEndedGrader for LlmGrader {
    async fn grade_batch(
        &self,
        items: &[GradingItem],
    ) -> Result<Vec<GradedQuestion>, GradingOracleError> {
        debug_assert!(!items.is_empty(), "grading batch must be non-empty");

        let prompt = Self::build_prompt(items);
        let content = self.client.complete(&prompt).await?;
        Self::parse_response(&content, items.len())
    }
}

#[derive(Debug, Deserialize)]
struct VerdictWire {
    grade: Grade,
    score: f64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    weak_areas: Vec<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
