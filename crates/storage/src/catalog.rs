use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use quiz_core::model::{QuestionBank, QuizId, QuizMeta};

use crate::repository::StorageError;

/// Source of quiz metadata and question banks.
///
/// Stands in for the remote API: everything it returns is already materialized.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    /// List all quizzes ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<QuizMeta>, StorageError>;

    /// Fetch quiz metadata by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizMeta>, StorageError>;

    /// Fetch the ordered questions of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the quiz is unknown, or other storage errors.
    async fn question_bank(&self, id: QuizId) -> Result<QuestionBank, StorageError>;

    /// Persist or replace a quiz and its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, meta: &QuizMeta, bank: &QuestionBank) -> Result<(), StorageError>;
}

/// One quiz as it appears in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub meta: QuizMeta,
    pub questions: QuestionBank,
}

/// JSON catalog file: `{"quizzes": [{"id": 1, "title": "...", "availability": "open", "questions": [...]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub quizzes: Vec<CatalogEntry>,
}

impl CatalogDocument {
    /// The demo catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the bundled file does not parse.
    pub fn sample() -> Result<Self, StorageError> {
        Self::from_json(include_str!("../data/sample_catalog.json"))
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the JSON is invalid or a bank has duplicate ids.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Write every entry into `catalog`.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` raised by the catalog.
    pub async fn import_into(&self, catalog: &dyn QuizCatalog) -> Result<usize, StorageError> {
        for entry in &self.quizzes {
            catalog.upsert_quiz(&entry.meta, &entry.questions).await?;
        }
        Ok(self.quizzes.len())
    }
}

/// In-memory catalog for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    quizzes: Arc<Mutex<BTreeMap<QuizId, (QuizMeta, QuestionBank)>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_document(doc: CatalogDocument) -> Self {
        let quizzes = doc
            .quizzes
            .into_iter()
            .map(|entry| (entry.meta.id, (entry.meta, entry.questions)))
            .collect();
        Self {
            quizzes: Arc::new(Mutex::new(quizzes)),
        }
    }
}

#[async_trait]
impl QuizCatalog for InMemoryCatalog {
    async fn list_quizzes(&self) -> Result<Vec<QuizMeta>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().map(|(meta, _)| meta.clone()).collect())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizMeta>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).map(|(meta, _)| meta.clone()))
    }

    async fn question_bank(&self, id: QuizId) -> Result<QuestionBank, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&id)
            .map(|(_, bank)| bank.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_quiz(&self, meta: &QuizMeta, bank: &QuestionBank) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(meta.id, (meta.clone(), bank.clone()));
        Ok(())
    }
}
