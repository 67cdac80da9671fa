use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// In-progress attempt at one quiz: the page being shown and the answers given so far.
///
/// Persisted as `{"page": 2, "answers": {"1": "a", "4": "c"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSessionState {
    pub page: usize,
    pub answers: BTreeMap<QuestionId, String>,
}

impl QuizSessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the learner has answered something or moved past the first page.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        !self.answers.is_empty() || self.page > 0
    }

    /// Merge one answer, overwriting a previous answer to the same question.
    pub fn record_answer(&mut self, question_id: QuestionId, option_key: impl Into<String>) {
        self.answers.insert(question_id, option_key.into());
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Pull a stale page back into `0..total_pages`. An empty quiz clamps to 0.
    pub fn clamp_page(&mut self, total_pages: usize) {
        let last = total_pages.saturating_sub(1);
        if self.page > last {
            self.page = last;
        }
    }
}
