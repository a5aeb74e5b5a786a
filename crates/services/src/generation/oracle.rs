//! Boundary to the question-generation oracle.

use async_trait::async_trait;
use std::fmt::Write as _;

use tutor_core::model::Difficulty;

use crate::error::GenerationOracleError;
use crate::llm_client::{LlmClient, strip_code_fences};

use super::validator::CandidateQuestion;

/// Parameters for one quiz-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    /// Number of questions the caller wants in the final quiz.
    pub count: usize,
    /// Weak-area tags from previous quizzes, used to steer new questions
    /// toward concepts the learner struggled with.
    pub weak_area_hints: Vec<String>,
}

/// External question-proposal capability.
///
/// `count` is the raw candidate count for this call, chosen by the
/// regeneration loop; it usually exceeds the request's target to compensate
/// for validation attrition.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Propose `count` raw question candidates.
    ///
    /// # Errors
    ///
    /// Returns `GenerationOracleError` if the call or its parsing fails.
    async fn propose(
        &self,
        request: &GenerationRequest,
        count: usize,
    ) -> Result<Vec<CandidateQuestion>, GenerationOracleError>;
}

//
// ─── LLM-BACKED GENERATOR ──────────────────────────────────────────────────────
//

/// Reference generator that asks an LLM for a JSON candidate array.
#[derive(Clone)]
pub struct LlmQuestionGenerator {
    client: LlmClient,
    number_of_choices: usize,
}

impl LlmQuestionGenerator {
    #[must_use]
    pub fn new(client: LlmClient, number_of_choices: usize) -> Self {
        Self {
            client,
            number_of_choices,
        }
    }

    #[must_use]
    pub fn from_env(number_of_choices: usize) -> Self {
        Self::new(LlmClient::from_env(), number_of_choices)
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }

    fn build_prompt(&self, request: &GenerationRequest, count: usize) -> String {
        let mut prompt = format!(
            "Generate {count} quiz questions about {topic} at {difficulty} \
             difficulty. Respond with a JSON array only, no prose. Each \
             element: {{\"question\": string, \"type\": \
             \"single\"|\"multiple\"|\"true_false\"|\"open_ended\", \
             \"answer\": ..., \"choices\": [string], \"explanation\": string}}. \
             For single/multiple questions provide exactly {choices} choices \
             and give the answer as the exact choice text (an array of choice \
             texts for multiple). For true_false the answer is a boolean. For \
             open_ended the answer is a model reference answer.\n",
            count = count,
            topic = request.topic,
            difficulty = request.difficulty.as_str(),
            choices = self.number_of_choices,
        );
        if !request.weak_area_hints.is_empty() {
            let _ = write!(
                prompt,
                "Focus especially on these areas the learner struggled with: {}.",
                request.weak_area_hints.join(", ")
            );
        }
        prompt
    }

    fn parse_response(content: &str) -> Result<Vec<CandidateQuestion>, GenerationOracleError> {
        let payload = strip_code_fences(content);
        serde_json::from_str(payload)
            .map_err(|e| GenerationOracleError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn propose(
        &self,
        request: &GenerationRequest,
        count: usize,
    ) -> Result<Vec<CandidateQuestion>, GenerationOracleError> {
        let prompt = self.build_prompt(request, count);
        let content = self.client.complete(&prompt).await?;
        Self::parse_response(&content)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
