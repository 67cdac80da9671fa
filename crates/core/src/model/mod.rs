mod ids;
mod progress;
pub(crate) mod question;
mod quiz;
mod result;
mod session;

pub use ids::{ParseIdError, QuestionId, QuizId};
pub use progress::{QuizProgress, QuizStatus, TakeAction};
pub use question::{Question, QuestionBank, QuestionBankError, QuizOption};
pub use quiz::{QuizAvailability, QuizMeta};
pub use result::{QuizResultError, QuizResultRecord};
pub use session::QuizSessionState;
