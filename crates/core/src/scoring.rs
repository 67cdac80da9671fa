use std::collections::BTreeMap;
use std::fmt;

use crate::model::{QuestionBank, QuestionId, QuizResultError, QuizResultRecord};

/// Highest value on the normalized score scale.
pub const SCORE_SCALE: u32 = 10;

/// Count answers that match each question's correct key.
///
/// `total` is the size of the bank; answers to ids outside the bank are ignored.
///
/// # Errors
///
/// Returns `QuizResultError::TooManyQuestions` if the bank size does not fit in `u32`.
pub fn score_answers(
    answers: &BTreeMap<QuestionId, String>,
    bank: &QuestionBank,
) -> Result<QuizResultRecord, QuizResultError> {
    let total = u32::try_from(bank.len())
        .map_err(|_| QuizResultError::TooManyQuestions { len: bank.len() })?;
    let mut correct = 0_u32;
    for question in bank.iter() {
        if answers
            .get(&question.id)
            .is_some_and(|key| question.is_correct(key))
        {
            correct = correct.saturating_add(1);
        }
    }
    QuizResultRecord::new(correct, total)
}

/// Result normalized to `0..=10`, rounding halves up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u32);

impl Score {
    #[must_use]
    pub fn from_result(result: &QuizResultRecord) -> Self {
        Self::from_counts(result.correct_count(), result.total())
    }

    /// `round(correct / total * 10)` with ties going up; an empty quiz scores 0.
    #[must_use]
    pub fn from_counts(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Self(0);
        }
        let correct = u64::from(correct);
        let total = u64::from(total);
        let scaled = (correct * u64::from(SCORE_SCALE) * 2 + total) / (2 * total);
        Self(u32::try_from(scaled).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}/{SCORE_SCALE}", self.0)
    }
}
