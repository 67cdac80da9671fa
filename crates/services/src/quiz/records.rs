use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use quiz_core::model::{QuizId, QuizProgress, QuizResultRecord, QuizSessionState};
use storage::{LocalRecordStore, QuizRecordKind, parse_record_key, record_key};

/// Typed, fail-open access to the per-quiz records in a [`LocalRecordStore`].
///
/// Reads that fail (store error or malformed payload) come back as `None`.
/// Writes that fail are logged and dropped; they report `false`.
#[derive(Clone)]
pub struct QuizRecords {
    store: Arc<dyn LocalRecordStore>,
}

impl QuizRecords {
    #[must_use]
    pub fn new(store: Arc<dyn LocalRecordStore>) -> Self {
        Self { store }
    }

    pub async fn load_state(&self, quiz_id: QuizId) -> Option<QuizSessionState> {
        self.read(quiz_id, QuizRecordKind::State).await
    }

    pub async fn save_state(&self, quiz_id: QuizId, state: &QuizSessionState) -> bool {
        self.write(quiz_id, QuizRecordKind::State, state).await
    }

    pub async fn clear_state(&self, quiz_id: QuizId) -> bool {
        self.remove(quiz_id, QuizRecordKind::State).await
    }

    pub async fn load_result(&self, quiz_id: QuizId) -> Option<QuizResultRecord> {
        self.read(quiz_id, QuizRecordKind::Result).await
    }

    pub async fn save_result(&self, quiz_id: QuizId, result: &QuizResultRecord) -> bool {
        self.write(quiz_id, QuizRecordKind::Result, result).await
    }

    pub async fn clear_result(&self, quiz_id: QuizId) -> bool {
        self.remove(quiz_id, QuizRecordKind::Result).await
    }

    /// Single read path for "where is the learner on this quiz".
    ///
    /// The result is read first; session state is only consulted when no result exists.
    pub async fn progress(&self, quiz_id: QuizId) -> QuizProgress {
        if let Some(result) = self.load_result(quiz_id).await {
            return QuizProgress::Submitted(result);
        }
        QuizProgress::resolve(self.load_state(quiz_id).await, None)
    }

    /// Quizzes that have any record in the store. A failed listing reads as empty.
    pub async fn tracked_quizzes(&self) -> BTreeSet<QuizId> {
        match self.store.keys_with_prefix("quiz:").await {
            Ok(keys) => keys
                .iter()
                .filter_map(|key| parse_record_key(key))
                .map(|(quiz_id, _)| quiz_id)
                .collect(),
            Err(err) => {
                warn!(error = %err, "local store listing failed; treating as empty");
                BTreeSet::new()
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, quiz_id: QuizId, kind: QuizRecordKind) -> Option<T> {
        let key = record_key(quiz_id, kind);
        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(%key, error = %err, "local store read failed; treating record as absent");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|err| {
                warn!(%key, error = %err, "malformed local record; treating as absent");
            })
            .ok()
    }

    async fn write<T: Serialize>(&self, quiz_id: QuizId, kind: QuizRecordKind, value: &T) -> bool {
        let key = record_key(quiz_id, kind);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%key, error = %err, "failed to encode local record");
                return false;
            }
        };
        match self.store.set(&key, &raw).await {
            Ok(()) => {
                debug!(%key, "local record written");
                true
            }
            Err(err) => {
                warn!(%key, error = %err, "local store write failed; ignoring");
                false
            }
        }
    }

    async fn remove(&self, quiz_id: QuizId, kind: QuizRecordKind) -> bool {
        let key = record_key(quiz_id, kind);
        match self.store.delete(&key).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%key, error = %err, "local store delete failed; ignoring");
                false
            }
        }
    }
}
