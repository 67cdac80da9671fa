use std::sync::Arc;

use tracing::debug;

use quiz_core::model::{
    Question, QuestionBank, QuestionId, QuizId, QuizMeta, QuizProgress, QuizResultRecord,
    QuizSessionState,
};
use storage::{QuizCatalog, StorageError};

use super::records::QuizRecords;
use super::result_writer::ResultWriter;
use super::session_state::QuizSessionStore;
use crate::error::QuizError;

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One learner's pass through a quiz, one question per page.
///
/// The in-memory state is what the screen shows; every change is also written to
/// the local store, which may silently fail.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    quiz: QuizMeta,
    bank: QuestionBank,
    state: QuizSessionState,
    result: Option<QuizResultRecord>,
}

impl QuizAttempt {
    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz.id
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizMeta {
        &self.quiz
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn state(&self) -> &QuizSessionState {
        &self.state
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.state.page
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.bank.page_count()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.state.page)
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<&str> {
        self.state.answer_for(question_id)
    }

    /// Answers that belong to questions of this quiz.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.bank
            .iter()
            .filter(|q| self.state.answers.contains_key(&q.id))
            .count()
    }

    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.state.page == 0
    }

    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.state.page + 1 >= self.page_count()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResultRecord> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    fn ensure_open(&self) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted(self.quiz.id));
        }
        Ok(())
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Orchestrates opening, answering, paging, and submitting a quiz.
#[derive(Clone)]
pub struct QuizTakingService {
    catalog: Arc<dyn QuizCatalog>,
    records: QuizRecords,
    sessions: QuizSessionStore,
    results: ResultWriter,
}

impl QuizTakingService {
    #[must_use]
    pub fn new(catalog: Arc<dyn QuizCatalog>, records: QuizRecords) -> Self {
        Self {
            catalog,
            sessions: QuizSessionStore::new(records.clone()),
            results: ResultWriter::new(records.clone()),
            records,
        }
    }

    /// Load the quiz and restore any in-progress session.
    ///
    /// Opening does not write anything; the session record appears on the first
    /// answer or page move.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFound` for unknown quizzes, `QuizError::Closed` for closed
    /// ones, `QuizError::AlreadySubmitted` when a result exists (reset it through
    /// `TakeResolver` first), or `QuizError::Catalog` when the catalog fails.
    pub async fn open(&self, quiz_id: QuizId) -> Result<QuizAttempt, QuizError> {
        let quiz = self
            .catalog
            .get_quiz(quiz_id)
            .await?
            .ok_or(QuizError::NotFound(quiz_id))?;
        if !quiz.is_open() {
            return Err(QuizError::Closed(quiz_id));
        }

        let bank = match self.catalog.question_bank(quiz_id).await {
            Ok(bank) => bank,
            Err(StorageError::NotFound) => return Err(QuizError::NotFound(quiz_id)),
            Err(err) => return Err(err.into()),
        };

        let mut state = match self.records.progress(quiz_id).await {
            QuizProgress::Submitted(_) => return Err(QuizError::AlreadySubmitted(quiz_id)),
            QuizProgress::InProgress(state) => state,
            QuizProgress::NotStarted => QuizSessionState::new(),
        };
        let stored_page = state.page;
        state.clamp_page(bank.page_count());
        if state.page != stored_page {
            self.sessions.save(quiz_id, &state).await;
        }

        debug!(%quiz_id, page = state.page, answered = state.answers.len(), "quiz opened");
        Ok(QuizAttempt {
            quiz,
            bank,
            state,
            result: None,
        })
    }

    /// Select `option_key` for a question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownQuestion` / `QuizError::UnknownOption` for ids not in
    /// the quiz, or `QuizError::AlreadySubmitted` after submission.
    pub async fn answer(
        &self,
        attempt: &mut QuizAttempt,
        question_id: QuestionId,
        option_key: &str,
    ) -> Result<(), QuizError> {
        attempt.ensure_open()?;
        let question = attempt
            .bank
            .find(question_id)
            .ok_or(QuizError::UnknownQuestion(question_id))?;
        if !question.has_option(option_key) {
            return Err(QuizError::UnknownOption {
                question_id,
                key: option_key.to_owned(),
            });
        }

        attempt.state.record_answer(question_id, option_key);
        self.sessions.save(attempt.quiz_id(), &attempt.state).await;
        Ok(())
    }

    /// Answer the question on the current page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::answer`]; an empty quiz has no current question.
    pub async fn answer_current(
        &self,
        attempt: &mut QuizAttempt,
        option_key: &str,
    ) -> Result<(), QuizError> {
        let question_id = attempt
            .current_question()
            .map(|q| q.id)
            .ok_or(QuizError::PageOutOfRange {
                page: attempt.page(),
                page_count: attempt.page_count(),
            })?;
        self.answer(attempt, question_id, option_key).await
    }

    /// Jump to `page`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PageOutOfRange` if `page >= page_count`, or
    /// `QuizError::AlreadySubmitted` after submission.
    pub async fn go_to(&self, attempt: &mut QuizAttempt, page: usize) -> Result<(), QuizError> {
        attempt.ensure_open()?;
        if page >= attempt.page_count() {
            return Err(QuizError::PageOutOfRange {
                page,
                page_count: attempt.page_count(),
            });
        }
        attempt.state.page = page;
        self.sessions.save(attempt.quiz_id(), &attempt.state).await;
        Ok(())
    }

    /// Advance one page. Returns `false` on the last page.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub async fn next(&self, attempt: &mut QuizAttempt) -> Result<bool, QuizError> {
        attempt.ensure_open()?;
        if attempt.is_last_page() {
            return Ok(false);
        }
        let target = attempt.page() + 1;
        self.go_to(attempt, target).await?;
        Ok(true)
    }

    /// Go back one page. Returns `false` on the first page.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission.
    pub async fn previous(&self, attempt: &mut QuizAttempt) -> Result<bool, QuizError> {
        attempt.ensure_open()?;
        if attempt.is_first_page() {
            return Ok(false);
        }
        let target = attempt.page() - 1;
        self.go_to(attempt, target).await?;
        Ok(true)
    }

    /// Score the attempt and store the result; the session record is dropped.
    ///
    /// Unanswered questions count as wrong.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` when called twice.
    pub async fn submit(&self, attempt: &mut QuizAttempt) -> Result<QuizResultRecord, QuizError> {
        attempt.ensure_open()?;
        let result = self
            .results
            .submit(attempt.quiz_id(), &attempt.state.answers, &attempt.bank)
            .await?;
        attempt.result = Some(result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizAvailability, QuizOption};
    use storage::{InMemoryCatalog, InMemoryRecordStore, LocalRecordStore};

    fn question(id: u64, correct: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            text: format!("Q{id}"),
            options: vec![QuizOption::new("a", "A"), QuizOption::new("b", "B")],
            correct_key: correct.into(),
        }
    }

    async fn setup() -> (InMemoryRecordStore, QuizTakingService) {
        let catalog = InMemoryCatalog::new();
        let bank = QuestionBank::new(vec![question(1, "a"), question(2, "b"), question(3, "a")])
            .unwrap();
        catalog
            .upsert_quiz(
                &QuizMeta::new(QuizId::new(1), "Open", QuizAvailability::Open),
                &bank,
            )
            .await
            .unwrap();
        catalog
            .upsert_quiz(
                &QuizMeta::new(QuizId::new(2), "Closed", QuizAvailability::Closed),
                &bank,
            )
            .await
            .unwrap();
        catalog
            .upsert_quiz(
                &QuizMeta::new(QuizId::new(3), "Empty", QuizAvailability::Open),
                &QuestionBank::empty(),
            )
            .await
            .unwrap();

        let store = InMemoryRecordStore::new();
        let service = QuizTakingService::new(
            Arc::new(catalog),
            QuizRecords::new(Arc::new(store.clone())),
        );
        (store, service)
    }

    #[tokio::test]
    async fn open_starts_on_first_page_without_writing() {
        let (store, service) = setup().await;
        let attempt = service.open(QuizId::new(1)).await.unwrap();
        assert_eq!(attempt.page(), 0);
        assert_eq!(attempt.page_count(), 3);
        assert_eq!(attempt.current_question().map(|q| q.id), Some(QuestionId::new(1)));
        assert!(store.keys_with_prefix("quiz:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_rejects_unknown_and_closed() {
        let (_, service) = setup().await;
        assert!(matches!(
            service.open(QuizId::new(99)).await,
            Err(QuizError::NotFound(_))
        ));
        assert!(matches!(
            service.open(QuizId::new(2)).await,
            Err(QuizError::Closed(_))
        ));
    }

    #[tokio::test]
    async fn reopening_resumes_page_and_answers() {
        let (_, service) = setup().await;
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        service.answer_current(&mut attempt, "a").await.unwrap();
        assert!(service.next(&mut attempt).await.unwrap());
        service.answer_current(&mut attempt, "a").await.unwrap();

        let resumed = service.open(QuizId::new(1)).await.unwrap();
        assert_eq!(resumed.page(), 1);
        assert_eq!(resumed.selected(QuestionId::new(1)), Some("a"));
        assert_eq!(resumed.selected(QuestionId::new(2)), Some("a"));
        assert_eq!(resumed.answered_count(), 2);
    }

    #[tokio::test]
    async fn stale_page_is_clamped_on_open() {
        let (store, service) = setup().await;
        store
            .set("quiz:1:state", r#"{"page":12,"answers":{"1":"b"}}"#)
            .await
            .unwrap();
        let attempt = service.open(QuizId::new(1)).await.unwrap();
        assert_eq!(attempt.page(), 2);
        assert!(attempt.is_last_page());
    }

    #[tokio::test]
    async fn clamped_page_is_what_gets_stored() {
        let (store, service) = setup().await;
        store
            .set("quiz:1:state", r#"{"page":12,"answers":{}}"#)
            .await
            .unwrap();
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        assert_eq!(
            store.get("quiz:1:state").await.unwrap().as_deref(),
            Some(r#"{"page":2,"answers":{}}"#)
        );

        service.answer_current(&mut attempt, "a").await.unwrap();
        assert_eq!(attempt.page(), 2);
        assert_eq!(
            store.get("quiz:1:state").await.unwrap().as_deref(),
            Some(r#"{"page":2,"answers":{"3":"a"}}"#)
        );
    }

    #[tokio::test]
    async fn store_catches_up_after_a_dropped_write() {
        let (store, service) = setup().await;
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        service.answer_current(&mut attempt, "b").await.unwrap();
        service.next(&mut attempt).await.unwrap();

        // store lost the answer and the page move
        store.set("quiz:1:state", r#"{"page":0,"answers":{}}"#).await.unwrap();

        service.answer_current(&mut attempt, "a").await.unwrap();
        let resumed = service.open(QuizId::new(1)).await.unwrap();
        assert_eq!(resumed.state(), attempt.state());
        assert_eq!(resumed.page(), 1);
        assert_eq!(resumed.selected(QuestionId::new(1)), Some("b"));
    }

    #[tokio::test]
    async fn navigation_stops_at_edges() {
        let (_, service) = setup().await;
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        assert!(!service.previous(&mut attempt).await.unwrap());
        service.go_to(&mut attempt, 2).await.unwrap();
        assert!(!service.next(&mut attempt).await.unwrap());
        assert!(service.previous(&mut attempt).await.unwrap());
        assert_eq!(attempt.page(), 1);
        assert!(matches!(
            service.go_to(&mut attempt, 3).await,
            Err(QuizError::PageOutOfRange { page: 3, page_count: 3 })
        ));
    }

    #[tokio::test]
    async fn answer_validates_question_and_option() {
        let (_, service) = setup().await;
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        assert!(matches!(
            service.answer(&mut attempt, QuestionId::new(42), "a").await,
            Err(QuizError::UnknownQuestion(_))
        ));
        assert!(matches!(
            service.answer(&mut attempt, QuestionId::new(1), "z").await,
            Err(QuizError::UnknownOption { .. })
        ));
        assert_eq!(attempt.answered_count(), 0);
    }

    #[tokio::test]
    async fn submit_scores_and_blocks_further_changes() {
        let (store, service) = setup().await;
        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        service.answer(&mut attempt, QuestionId::new(1), "a").await.unwrap();
        service.answer(&mut attempt, QuestionId::new(2), "a").await.unwrap();

        let result = service.submit(&mut attempt).await.unwrap();
        assert_eq!((result.correct_count(), result.total()), (1, 3));
        assert!(attempt.is_submitted());
        assert_eq!(store.get("quiz:1:state").await.unwrap(), None);

        assert!(matches!(
            service.submit(&mut attempt).await,
            Err(QuizError::AlreadySubmitted(_))
        ));
        assert!(matches!(
            service.answer_current(&mut attempt, "a").await,
            Err(QuizError::AlreadySubmitted(_))
        ));
        assert!(matches!(
            service.open(QuizId::new(1)).await,
            Err(QuizError::AlreadySubmitted(_))
        ));
    }

    #[tokio::test]
    async fn empty_quiz_submits_with_zero_total() {
        let (_, service) = setup().await;
        let mut attempt = service.open(QuizId::new(3)).await.unwrap();
        assert!(attempt.current_question().is_none());
        assert!(attempt.is_last_page());
        let result = service.submit(&mut attempt).await.unwrap();
        assert_eq!(result.total(), 0);
    }

    #[tokio::test]
    async fn attempt_keeps_working_when_store_is_unavailable() {
        let catalog = InMemoryCatalog::new();
        catalog
            .upsert_quiz(
                &QuizMeta::new(QuizId::new(1), "Open", QuizAvailability::Open),
                &QuestionBank::new(vec![question(1, "a"), question(2, "b")]).unwrap(),
            )
            .await
            .unwrap();
        let service = QuizTakingService::new(
            Arc::new(catalog),
            QuizRecords::new(Arc::new(InMemoryRecordStore::unavailable())),
        );

        let mut attempt = service.open(QuizId::new(1)).await.unwrap();
        service.answer_current(&mut attempt, "a").await.unwrap();
        service.next(&mut attempt).await.unwrap();
        service.answer_current(&mut attempt, "b").await.unwrap();
        let result = service.submit(&mut attempt).await.unwrap();
        assert_eq!(result.correct_count(), 2);
    }
}
