//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionId, QuizId, QuizResultError};
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the quiz-taking flow.
///
/// Local record failures never show up here; they are logged and treated as absent.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error("quiz {0} is closed")]
    Closed(QuizId),
    #[error("quiz {0} was already submitted")]
    AlreadySubmitted(QuizId),
    #[error("page {page} is out of range (quiz has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("option {key:?} is not offered for question {question_id}")]
    UnknownOption { question_id: QuestionId, key: String },
    #[error(transparent)]
    Result(#[from] QuizResultError),
    #[error(transparent)]
    Catalog(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
