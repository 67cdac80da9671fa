use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

/// One selectable answer, identified by a short key (`"a"`, `"b"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub key: String,
    pub label: String,
}

impl QuizOption {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_key: String,
}

impl Question {
    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|opt| opt.key == key)
    }

    #[must_use]
    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_key == key
    }
}

/// Ordered questions of a quiz. One question per page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::DuplicateQuestion` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(QuestionBankError::DuplicateQuestion(q.id));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of pages shown by the quiz-taking screen.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn get(&self, page: usize) -> Option<&Question> {
        self.questions.get(page)
    }

    #[must_use]
    pub fn find(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let questions = Vec::<Question>::deserialize(deserializer)?;
        Self::new(questions).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn bank_rejects_duplicate_ids() {
        let err = QuestionBank::new(vec![question(1, "a"), question(1, "b")]).unwrap_err();
        assert_eq!(err, QuestionBankError::DuplicateQuestion(QuestionId::new(1)));
    }

    #[test]
    fn bank_keeps_order_and_pages() {
        let bank = bank(&["a", "b", "c"]);
        assert_eq!(bank.page_count(), 3);
        assert_eq!(bank.get(1).map(|q| q.id), Some(QuestionId::new(2)));
        assert!(bank.get(3).is_none());
        assert!(bank.find(QuestionId::new(3)).is_some());
    }

    #[test]
    fn bank_deserialize_validates_ids() {
        let json = r#"[
            {"id": 1, "text": "x", "options": [], "correctKey": "a"},
            {"id": 1, "text": "y", "options": [], "correctKey": "b"}
        ]"#;
        assert!(serde_json::from_str::<QuestionBank>(json).is_err());
    }

    #[test]
    fn question_checks_options() {
        let q = question(1, "b");
        assert!(q.has_option("c"));
        assert!(!q.has_option("z"));
        assert!(q.is_correct("b"));
    }
}
