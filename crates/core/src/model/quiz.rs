use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz topic cannot be empty")]
    EmptyTopic,

    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("duplicate question id {0} within quiz")]
    DuplicateQuestionId(QuestionId),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Requested difficulty band for a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Lowercase label, as used in prompts and persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered sequence of questions on one topic.
///
/// Question order is significant: it is the only correlation between the
/// question list, the caller's answer list, and (for open-ended items) the
/// oracle's grading results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    topic: String,
    difficulty: Difficulty,
    questions: Vec<Question>,
}

impl Quiz {
    /// Creates a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title or topic is blank, the question list
    /// is empty, or two questions share an id.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        topic: impl Into<String>,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(QuizError::EmptyTopic);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestionId(question.id()));
            }
        }

        Ok(Self {
            id,
            title,
            topic,
            difficulty,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed quiz; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The open-ended questions in quiz order.
    ///
    /// This filtered order is the positional contract between a quiz and a
    /// scoring result's grading sequence.
    pub fn open_ended_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_open_ended())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
