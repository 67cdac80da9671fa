mod attempt;
mod list;
mod records;
mod result_writer;
mod session_state;
mod status;
mod take;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use attempt::{QuizAttempt, QuizTakingService};
pub use list::{QuizListItem, QuizListService};
pub use records::QuizRecords;
pub use result_writer::ResultWriter;
pub use session_state::QuizSessionStore;
pub use status::StatusProjection;
pub use take::{TakeDecision, TakeResolver};
