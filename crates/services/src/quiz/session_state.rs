use tracing::debug;

use quiz_core::model::{QuestionId, QuizId, QuizSessionState};

use super::records::QuizRecords;

/// Persists page position and answers of an in-progress attempt.
///
/// Each mutation reads the stored state, applies one change, and writes it back
/// before returning. Concurrent writers on the same quiz race; the last write wins.
#[derive(Clone)]
pub struct QuizSessionStore {
    records: QuizRecords,
}

impl QuizSessionStore {
    #[must_use]
    pub fn new(records: QuizRecords) -> Self {
        Self { records }
    }

    /// Stored state, or `None` when absent or unreadable.
    pub async fn load_state(&self, quiz_id: QuizId) -> Option<QuizSessionState> {
        self.records.load_state(quiz_id).await
    }

    /// Merge one answer into the stored answers and persist. Returns the new state.
    pub async fn record_answer(
        &self,
        quiz_id: QuizId,
        question_id: QuestionId,
        option_key: &str,
    ) -> QuizSessionState {
        let mut state = self.load_state(quiz_id).await.unwrap_or_default();
        state.record_answer(question_id, option_key);
        self.records.save_state(quiz_id, &state).await;
        debug!(%quiz_id, %question_id, option_key, "answer recorded");
        state
    }

    /// Move to `page` and persist. Returns the new state.
    pub async fn set_page(&self, quiz_id: QuizId, page: usize) -> QuizSessionState {
        let state = self
            .load_state(quiz_id)
            .await
            .unwrap_or_default()
            .with_page(page);
        self.records.save_state(quiz_id, &state).await;
        state
    }

    /// Overwrite the stored state with `state` in a single write.
    ///
    /// Returns `false` when the write was dropped.
    pub async fn save(&self, quiz_id: QuizId, state: &QuizSessionState) -> bool {
        let saved = self.records.save_state(quiz_id, state).await;
        debug!(%quiz_id, page = state.page, answered = state.answers.len(), saved, "session saved");
        saved
    }

    /// Drop the stored state. Clearing an absent state is fine.
    pub async fn clear_state(&self, quiz_id: QuizId) {
        self.records.clear_state(quiz_id).await;
    }
}
