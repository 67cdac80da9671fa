use quiz_core::Score;
use quiz_core::model::{QuestionId, QuizId};
use services::QuizAttempt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

impl QuizOptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.selected {
            "quiz-option quiz-option--selected"
        } else {
            "quiz-option"
        }
    }
}

/// Everything the quiz-taking screen renders for the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizTakeVm {
    pub quiz_id: QuizId,
    pub title: String,
    pub progress_label: String,
    pub answered_label: String,
    pub question_id: Option<QuestionId>,
    pub question_text: Option<String>,
    pub options: Vec<QuizOptionVm>,
    pub can_previous: bool,
    pub can_next: bool,
    pub show_submit: bool,
    pub score_label: Option<String>,
}

impl From<&QuizAttempt> for QuizTakeVm {
    fn from(attempt: &QuizAttempt) -> Self {
        let page_count = attempt.page_count();
        let question = attempt.current_question();
        let selected = question.and_then(|q| attempt.selected(q.id));
        let options = question
            .map(|q| {
                q.options
                    .iter()
                    .map(|option| QuizOptionVm {
                        key: option.key.clone(),
                        label: option.label.clone(),
                        selected: selected == Some(option.key.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let progress_label = if page_count == 0 {
            "No questions".to_string()
        } else {
            format!("Question {} of {page_count}", attempt.page() + 1)
        };
        let submitted = attempt.is_submitted();

        Self {
            quiz_id: attempt.quiz_id(),
            title: attempt.quiz().title.clone(),
            progress_label,
            answered_label: format!("Answered {} of {page_count}", attempt.answered_count()),
            question_id: question.map(|q| q.id),
            question_text: question.map(|q| q.text.clone()),
            options,
            can_previous: !submitted && !attempt.is_first_page(),
            can_next: !submitted && !attempt.is_last_page(),
            show_submit: !submitted && attempt.is_last_page(),
            score_label: attempt
                .result()
                .map(|result| Score::from_result(result).to_string()),
        }
    }
}
