mod quiz_list;
mod quiz_take;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use quiz_list::QuizListView;
pub use quiz_take::{QuizTakeIntent, QuizTakeView};
pub use state::{ViewError, ViewState, view_state_from_resource};
