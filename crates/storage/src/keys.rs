//! Key layout of the local record store.
//!
//! Every quiz owns at most two records:
//! `quiz:{quizId}:state` (in-progress session) and `quiz:{quizId}:result` (submitted result).

use quiz_core::model::QuizId;

const PREFIX: &str = "quiz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizRecordKind {
    State,
    Result,
}

impl QuizRecordKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Result => "result",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "state" => Some(Self::State),
            "result" => Some(Self::Result),
            _ => None,
        }
    }
}

#[must_use]
pub fn record_key(quiz_id: QuizId, kind: QuizRecordKind) -> String {
    format!("{PREFIX}:{quiz_id}:{}", kind.as_str())
}

/// Inverse of [`record_key`]. Foreign keys sharing the store yield `None`.
#[must_use]
pub fn parse_record_key(key: &str) -> Option<(QuizId, QuizRecordKind)> {
    let mut parts = key.split(':');
    if parts.next()? != PREFIX {
        return None;
    }
    let quiz_id = parts.next()?.parse::<QuizId>().ok()?;
    let kind = QuizRecordKind::parse(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((quiz_id, kind))
}
