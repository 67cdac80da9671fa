use dioxus::prelude::*;
use services::QuizError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    Closed,
    AlreadySubmitted,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "This quiz does not exist.",
            Self::Closed => "This quiz is closed.",
            Self::AlreadySubmitted => {
                "This quiz was already submitted. Use Retake on the quiz list to start over."
            }
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&QuizError> for ViewError {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::NotFound(_) => Self::NotFound,
            QuizError::Closed(_) => Self::Closed,
            QuizError::AlreadySubmitted(_) => Self::AlreadySubmitted,
            _ => Self::Unknown,
        }
    }
}

impl From<QuizError> for ViewError {
    fn from(err: QuizError) -> Self {
        Self::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
