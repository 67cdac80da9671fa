use tracing::{debug, warn};

use quiz_core::model::{QuizId, TakeAction};

use super::records::QuizRecords;
use super::result_writer::ResultWriter;

/// Outcome of pressing Take / Retake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeDecision {
    /// Quiz is closed; nothing was read or changed.
    Disabled,
    /// Records were cleared; the attempt starts from the first page.
    StartFresh(QuizId),
    /// Existing session state, if any, was left in place.
    Resume(QuizId),
    /// A reset was required but the store did not confirm it. Whatever is still
    /// stored reads as submitted, never as a resumable old session.
    ResetIncomplete(QuizId),
}

impl TakeDecision {
    /// Quiz to hand to the quiz-taking screen, if any.
    #[must_use]
    pub fn target(self) -> Option<QuizId> {
        match self {
            Self::Disabled => None,
            Self::StartFresh(id) | Self::Resume(id) | Self::ResetIncomplete(id) => Some(id),
        }
    }
}

/// Decides whether starting a quiz resumes or resets, and performs the reset.
#[derive(Clone)]
pub struct TakeResolver {
    records: QuizRecords,
    results: ResultWriter,
}

impl TakeResolver {
    #[must_use]
    pub fn new(records: QuizRecords) -> Self {
        Self {
            results: ResultWriter::new(records.clone()),
            records,
        }
    }

    /// Which button to show. Computed before the learner clicks.
    pub async fn action_for(&self, quiz_id: QuizId) -> TakeAction {
        TakeAction::for_progress(&self.records.progress(quiz_id).await)
    }

    /// Clear records when a result exists or `force_reset` is set; otherwise keep them.
    pub async fn resolve(&self, quiz_id: QuizId, is_open: bool, force_reset: bool) -> TakeDecision {
        if !is_open {
            return TakeDecision::Disabled;
        }

        let has_result = self.records.load_result(quiz_id).await.is_some();
        if has_result || force_reset {
            if !self.results.clear(quiz_id).await {
                warn!(%quiz_id, has_result, force_reset, "quiz reset incomplete");
                return TakeDecision::ResetIncomplete(quiz_id);
            }
            debug!(%quiz_id, has_result, force_reset, "quiz reset before attempt");
            return TakeDecision::StartFresh(quiz_id);
        }

        TakeDecision::Resume(quiz_id)
    }

    /// Run the resolver for a button press; a retake always forces a reset.
    pub async fn take(&self, quiz_id: QuizId, is_open: bool, action: TakeAction) -> TakeDecision {
        self.resolve(quiz_id, is_open, action.force_reset()).await
    }
}
