mod answer;
mod graded;
mod ids;
mod question;
mod quiz;

pub use answer::UserAnswer;
pub use graded::{
    Grade, GradedQuestion, GradedQuestionError, Outcome, QuestionOutcome, ScoringResult,
};
pub use ids::{ParseIdError, QuestionId, QuizId};
pub use question::{Question, QuestionError, QuestionKind};
pub use quiz::{Difficulty, Quiz, QuizError};
