use std::fmt;

use crate::model::quiz::QuizAvailability;
use crate::model::result::QuizResultRecord;
use crate::model::session::QuizSessionState;

/// Where a learner stands on one quiz, as far as local records tell.
///
/// A result record always shadows session state for the same quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuizProgress {
    #[default]
    NotStarted,
    InProgress(QuizSessionState),
    Submitted(QuizResultRecord),
}

impl QuizProgress {
    /// Combine independently read records into one view.
    ///
    /// A session that has neither answers nor a moved page is not progress.
    #[must_use]
    pub fn resolve(session: Option<QuizSessionState>, result: Option<QuizResultRecord>) -> Self {
        match (result, session) {
            (Some(result), _) => Self::Submitted(result),
            (None, Some(session)) if session.has_progress() => Self::InProgress(session),
            (None, _) => Self::NotStarted,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResultRecord> {
        match self {
            Self::Submitted(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSessionState> {
        match self {
            Self::InProgress(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Display status for list and summary views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizStatus {
    Open,
    OpenInProgress,
    Submitted,
    Closed,
}

impl QuizStatus {
    /// Submitted wins over availability; "in progress" only decorates an open quiz.
    #[must_use]
    pub fn project(availability: QuizAvailability, progress: &QuizProgress) -> Self {
        match (progress, availability) {
            (QuizProgress::Submitted(_), _) => Self::Submitted,
            (QuizProgress::InProgress(_), QuizAvailability::Open) => Self::OpenInProgress,
            (_, QuizAvailability::Open) => Self::Open,
            (_, QuizAvailability::Closed) => Self::Closed,
        }
    }

    #[must_use]
    pub fn badges(self) -> &'static [&'static str] {
        match self {
            Self::Open => &["Open"],
            Self::OpenInProgress => &["Open", "In Progress"],
            Self::Submitted => &["Submitted"],
            Self::Closed => &["Closed"],
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        self.badges().join(" · ")
    }

    #[must_use]
    pub fn is_submitted(self) -> bool {
        matches!(self, Self::Submitted)
    }

    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::OpenInProgress)
    }
}

impl fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// What the learner's start button does. A retake always starts from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeAction {
    Take,
    Retake,
}

impl TakeAction {
    #[must_use]
    pub fn for_progress(progress: &QuizProgress) -> Self {
        if progress.is_submitted() {
            Self::Retake
        } else {
            Self::Take
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Take => "Take quiz",
            Self::Retake => "Retake",
        }
    }

    #[must_use]
    pub fn force_reset(self) -> bool {
        matches!(self, Self::Retake)
    }
}
