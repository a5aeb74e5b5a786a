pub mod oracle;
pub mod service;
pub mod validator;

pub use oracle::{GenerationRequest, LlmQuestionGenerator, QuestionGenerator};
pub use service::{GenerationConfig, QuestionGenerationService};
pub use validator::{CandidateQuestion, CandidateRejection, validate_candidate};
