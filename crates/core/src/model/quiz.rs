use serde::{Deserialize, Serialize};

use crate::model::ids::QuizId;

/// Whether learners may currently take a quiz. Supplied by the quiz metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuizAvailability {
    #[default]
    Open,
    Closed,
}

impl QuizAvailability {
    #[must_use]
    pub fn from_is_open(is_open: bool) -> Self {
        if is_open { Self::Open } else { Self::Closed }
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMeta {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub availability: QuizAvailability,
}

impl QuizMeta {
    #[must_use]
    pub fn new(id: QuizId, title: impl Into<String>, availability: QuizAvailability) -> Self {
        Self {
            id,
            title: title.into(),
            availability,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.availability.is_open()
    }
}
