use std::sync::Arc;

use quiz_core::model::{QuizMeta, QuizStatus, TakeAction};
use quiz_core::Score;
use storage::QuizCatalog;

use super::status::StatusProjection;
use crate::error::QuizError;

/// One row of the learner's quiz list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizListItem {
    pub meta: QuizMeta,
    pub status: QuizStatus,
    pub take_action: TakeAction,
    pub score: Option<Score>,
}

impl QuizListItem {
    /// The Take / Retake button is only live for open quizzes.
    #[must_use]
    pub fn can_take(&self) -> bool {
        self.meta.is_open()
    }
}

#[derive(Clone)]
pub struct QuizListService {
    catalog: Arc<dyn QuizCatalog>,
    projection: StatusProjection,
}

impl QuizListService {
    #[must_use]
    pub fn new(catalog: Arc<dyn QuizCatalog>, projection: StatusProjection) -> Self {
        Self {
            catalog,
            projection,
        }
    }

    /// Every quiz in the catalog with its derived status.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the catalog cannot be listed.
    pub async fn list(&self) -> Result<Vec<QuizListItem>, QuizError> {
        let quizzes = self.catalog.list_quizzes().await?;
        let mut items = Vec::with_capacity(quizzes.len());
        for meta in quizzes {
            let (status, progress) = self
                .projection
                .status_with_progress(meta.id, meta.availability)
                .await;
            items.push(QuizListItem {
                status,
                take_action: TakeAction::for_progress(&progress),
                score: progress.result().map(Score::from_result),
                meta,
            });
        }
        Ok(items)
    }
}
