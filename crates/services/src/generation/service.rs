use std::sync::Arc;

use tracing::{debug, warn};

use tutor_core::model::{Question, QuestionId, Quiz, QuizId};

use crate::error::GenerationError;

use super::oracle::{GenerationRequest, QuestionGenerator};
use super::validator::validate_candidate;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tuning knobs for the regeneration loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Required option count for single/multiple-choice candidates.
    pub number_of_choices: usize,
    /// Oracle attempt budget per generation call.
    pub max_attempts: u32,
    /// Over-request multiplier: each attempt asks for `needed * factor`
    /// candidates, capped at `needed + slack`. The multiplier compensates
    /// for expected validation attrition; it is a tunable, not a
    /// correctness constant.
    pub over_request_factor: usize,
    pub over_request_slack: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            number_of_choices: 4,
            max_attempts: 5,
            over_request_factor: 2,
            over_request_slack: 5,
        }
    }
}

impl GenerationConfig {
    fn batch_size(&self, needed: usize) -> usize {
        (needed * self.over_request_factor)
            .min(needed + self.over_request_slack)
            .max(1)
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Turns raw oracle proposals into a validated question list of the
/// requested size, retrying against the oracle while validation attrition
/// leaves a shortfall.
pub struct QuestionGenerationService {
    oracle: Arc<dyn QuestionGenerator>,
    config: GenerationConfig,
}

impl QuestionGenerationService {
    #[must_use]
    pub fn new(oracle: Arc<dyn QuestionGenerator>) -> Self {
        Self::with_config(oracle, GenerationConfig::default())
    }

    #[must_use]
    pub fn with_config(oracle: Arc<dyn QuestionGenerator>, config: GenerationConfig) -> Self {
        Self { oracle, config }
    }

    /// Generate up to `request.count` validated questions.
    ///
    /// Each attempt over-requests candidates, validates them, and appends
    /// survivors in generation order; excess beyond the target is dropped,
    /// not ranked. A first-attempt oracle failure propagates immediately;
    /// later failures are logged and retried within the attempt budget.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::ZeroRequested` for a zero target,
    /// `GenerationError::Oracle` when the first oracle call fails, and
    /// `GenerationError::Shortfall` when the budget runs out with fewer
    /// than half the requested questions (or none at all). A shortfall of
    /// at least half succeeds silently with a shorter list.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>, GenerationError> {
        if request.count == 0 {
            return Err(GenerationError::ZeroRequested);
        }

        let target = request.count;
        let mut collected: Vec<Question> = Vec::with_capacity(target);
        let mut next_id: u64 = 1;

        for attempt in 1..=self.config.max_attempts {
            if collected.len() >= target {
                break;
            }
            let needed = target - collected.len();

            let candidates = match self
                .oracle
                .propose(request, self.config.batch_size(needed))
                .await
            {
                Ok(candidates) => candidates,
                Err(err) if attempt == 1 => return Err(err.into()),
                Err(err) => {
                    warn!(attempt, error = %err, "generation oracle attempt failed, retrying");
                    continue;
                }
            };

            let proposed = candidates.len();
            for candidate in &candidates {
                match validate_candidate(candidate, QuestionId::new(next_id), self.config.number_of_choices) {
                    Ok(question) => {
                        collected.push(question);
                        next_id += 1;
                    }
                    Err(rejection) => {
                        debug!(attempt, %rejection, "dropped malformed candidate");
                    }
                }
            }
            debug!(
                attempt,
                proposed,
                kept = collected.len(),
                target,
                "validated generation batch"
            );
        }

        collected.truncate(target);
        let achieved = collected.len();

        if achieved >= target {
            return Ok(collected);
        }
        // Half of the target is the acceptance floor: below it the quiz is
        // not worth returning, at or above it the caller silently gets a
        // shorter quiz.
        if achieved == 0 || achieved * 2 < target {
            return Err(GenerationError::Shortfall {
                requested: target,
                achieved,
            });
        }
        warn!(
            requested = target,
            achieved, "generation fell short, returning partial question list"
        );
        Ok(collected)
    }

    /// Generate a full quiz: validated questions wrapped with a fresh id
    /// and a title derived from the topic.
    ///
    /// # Errors
    ///
    /// Propagates `generate` errors, plus `QuizError` if the request's
    /// topic is blank.
    pub async fn generate_quiz(&self, request: &GenerationRequest) -> Result<Quiz, GenerationError> {
        let questions = self.generate(request).await?;
        let title = format!("{} quiz", request.topic);
        Ok(Quiz::new(
            QuizId::generate(),
            title,
            request.topic.clone(),
            request.difficulty,
            questions,
        )?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
