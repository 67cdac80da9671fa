use std::collections::BTreeSet;

use quiz_core::model::{QuizAvailability, QuizId, QuizProgress, QuizStatus};

use super::records::QuizRecords;

/// Read-only status labels for list and summary views.
///
/// Reads the stored records on every call and never writes; it does not depend on
/// the quiz-taking screen being alive.
#[derive(Clone)]
pub struct StatusProjection {
    records: QuizRecords,
}

impl StatusProjection {
    #[must_use]
    pub fn new(records: QuizRecords) -> Self {
        Self { records }
    }

    pub async fn status(&self, quiz_id: QuizId, availability: QuizAvailability) -> QuizStatus {
        let progress = self.records.progress(quiz_id).await;
        QuizStatus::project(availability, &progress)
    }

    /// Status together with the progress it was derived from.
    pub async fn status_with_progress(
        &self,
        quiz_id: QuizId,
        availability: QuizAvailability,
    ) -> (QuizStatus, QuizProgress) {
        let progress = self.records.progress(quiz_id).await;
        (QuizStatus::project(availability, &progress), progress)
    }

    /// Quizzes with stored session or result records.
    pub async fn tracked_quizzes(&self) -> BTreeSet<QuizId> {
        self.records.tracked_quizzes().await
    }
}
