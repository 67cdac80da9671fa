#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod quiz;

pub use app_services::AppServices;
pub use error::{AppServicesError, QuizError};

pub use quiz::{
    QuizAttempt, QuizListItem, QuizListService, QuizRecords, QuizSessionStore,
    QuizTakingService, ResultWriter, StatusProjection, TakeDecision, TakeResolver,
};
