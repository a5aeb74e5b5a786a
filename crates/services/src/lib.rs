#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod grading_oracle;
pub mod llm_client;
pub mod progress_service;
pub mod scoring_service;

pub use tutor_core::Clock;

pub use error::{
    GenerationError, GenerationOracleError, GradingOracleError, LlmClientError, ProgressError,
    ScoringError,
};
pub use generation::{
    GenerationConfig, GenerationRequest, LlmQuestionGenerator, QuestionGenerationService,
    QuestionGenerator,
};
pub use grading_oracle::{GradingItem, LlmGrader, OpenEndedGrader};
pub use llm_client::{LlmClient, LlmConfig};
pub use progress_service::ProgressService;
pub use scoring_service::ScoringEngine;
