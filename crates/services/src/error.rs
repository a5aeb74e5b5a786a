//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use tutor_core::model::{GradedQuestionError, QuizError};

/// Errors emitted by the shared LLM chat client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmClientError {
    #[error("AI oracle is not configured")]
    Disabled,
    #[error("AI oracle returned an empty response")]
    EmptyResponse,
    #[error("AI oracle request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ScoringEngine`.
///
/// Oracle failures never appear here; they are recovered inside the engine
/// with the partial-credit fallback. What remains is input validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("quiz has {expected} questions but {got} answers were provided")]
    AnswerCountMismatch { expected: usize, got: usize },
}

/// Errors emitted by the open-ended grading oracle boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradingOracleError {
    #[error(transparent)]
    Client(#[from] LlmClientError),
    #[error("grading oracle returned {got} verdicts for {expected} answers")]
    CountMismatch { expected: usize, got: usize },
    #[error("grading oracle returned an unparseable payload: {0}")]
    MalformedPayload(String),
    #[error(transparent)]
    InvalidVerdict(#[from] GradedQuestionError),
}

/// Errors emitted by the question-generation oracle boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationOracleError {
    #[error(transparent)]
    Client(#[from] LlmClientError),
    #[error("generation oracle returned an unparseable payload: {0}")]
    MalformedPayload(String),
}

/// Errors emitted by the question generation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("requested question count must be > 0")]
    ZeroRequested,
    #[error("question generation produced {achieved} of {requested} requested questions")]
    Shortfall { requested: usize, achieved: usize },
    #[error(transparent)]
    Oracle(#[from] GenerationOracleError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
