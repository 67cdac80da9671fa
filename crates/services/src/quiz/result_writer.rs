use std::collections::BTreeMap;

use tracing::{debug, warn};

use quiz_core::model::{QuestionBank, QuestionId, QuizId, QuizResultRecord};
use quiz_core::score_answers;

use super::records::QuizRecords;
use crate::error::QuizError;

/// Scores a finished attempt and stores the result as the quiz's terminal record.
#[derive(Clone)]
pub struct ResultWriter {
    records: QuizRecords,
}

impl ResultWriter {
    #[must_use]
    pub fn new(records: QuizRecords) -> Self {
        Self { records }
    }

    /// Score `answers` against `bank`, persist the result, then drop the session state.
    ///
    /// The result is written before the state is deleted, so an interruption leaves
    /// "submitted + stale session" rather than nothing. If the result write fails the
    /// session state is kept. The computed result is returned either way.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Result` if the bank is too large to score.
    pub async fn submit(
        &self,
        quiz_id: QuizId,
        answers: &BTreeMap<QuestionId, String>,
        bank: &QuestionBank,
    ) -> Result<QuizResultRecord, QuizError> {
        let result = score_answers(answers, bank)?;

        if self.records.save_result(quiz_id, &result).await {
            self.records.clear_state(quiz_id).await;
        } else {
            warn!(%quiz_id, "result not persisted; keeping session state");
        }

        debug!(
            %quiz_id,
            correct = result.correct_count(),
            total = result.total(),
            "quiz submitted"
        );
        Ok(result)
    }

    pub async fn load_result(&self, quiz_id: QuizId) -> Option<QuizResultRecord> {
        self.records.load_result(quiz_id).await
    }

    /// Remove any session state, then the result. Returns `true` once both are gone.
    ///
    /// The result is only removed after the state delete succeeded, so a failure
    /// leaves "submitted + stale session" and never a resumable stale session.
    pub async fn clear(&self, quiz_id: QuizId) -> bool {
        if !self.records.clear_state(quiz_id).await {
            warn!(%quiz_id, "session state not cleared; keeping result");
            return false;
        }
        self.records.clear_result(quiz_id).await
    }
}
