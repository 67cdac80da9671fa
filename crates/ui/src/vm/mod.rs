mod quiz_row_vm;
mod quiz_take_vm;

pub use quiz_row_vm::{QuizRowVm, map_quiz_rows};
pub use quiz_take_vm::{QuizOptionVm, QuizTakeVm};
