use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("correct count ({correct_count}) exceeds total ({total})")]
    CorrectExceedsTotal { correct_count: u32, total: u32 },

    #[error("question count does not fit in u32: {len}")]
    TooManyQuestions { len: usize },
}

/// Terminal outcome of a submitted attempt.
///
/// Persisted as `{"correctCount": 7, "total": 10}`. Deserializing re-runs the
/// `correct_count <= total` check, so an inconsistent stored record is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawResultRecord")]
pub struct QuizResultRecord {
    correct_count: u32,
    total: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResultRecord {
    correct_count: u32,
    total: u32,
}

impl TryFrom<RawResultRecord> for QuizResultRecord {
    type Error = QuizResultError;

    fn try_from(raw: RawResultRecord) -> Result<Self, Self::Error> {
        Self::new(raw.correct_count, raw.total)
    }
}

impl QuizResultRecord {
    /// # Errors
    ///
    /// Returns `QuizResultError::CorrectExceedsTotal` if `correct_count > total`.
    pub fn new(correct_count: u32, total: u32) -> Result<Self, QuizResultError> {
        if correct_count > total {
            return Err(QuizResultError::CorrectExceedsTotal {
                correct_count,
                total,
            });
        }
        Ok(Self {
            correct_count,
            total,
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_correct_above_total() {
        let err = QuizResultRecord::new(4, 3).unwrap_err();
        assert_eq!(
            err,
            QuizResultError::CorrectExceedsTotal {
                correct_count: 4,
                total: 3
            }
        );
    }

    #[test]
    fn empty_quiz_is_a_valid_record() {
        let record = QuizResultRecord::new(0, 0).unwrap();
        assert_eq!(record.total(), 0);
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let record = QuizResultRecord::new(7, 10).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"correctCount":7,"total":10}"#);
    }

    #[test]
    fn deserialize_rejects_inconsistent_record() {
        let parsed = serde_json::from_str::<QuizResultRecord>(r#"{"correctCount":5,"total":2}"#);
        assert!(parsed.is_err());
        let parsed = serde_json::from_str::<QuizResultRecord>(r#"{"correctCount":1}"#);
        assert!(parsed.is_err());
    }
}
