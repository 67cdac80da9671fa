use quiz_core::model::{QuizId, TakeAction};
use services::QuizListItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRowVm {
    pub id: QuizId,
    pub title: String,
    pub badges: Vec<&'static str>,
    pub status_label: String,
    pub score_label: Option<String>,
    pub action: TakeAction,
    pub action_label: &'static str,
    pub can_take: bool,
}

impl QuizRowVm {
    /// CSS modifier for a badge, keyed on its text.
    #[must_use]
    pub fn badge_class(badge: &str) -> &'static str {
        match badge {
            "Closed" => "badge badge--closed",
            "Submitted" => "badge badge--submitted",
            _ => "badge",
        }
    }
}

impl From<&QuizListItem> for QuizRowVm {
    fn from(item: &QuizListItem) -> Self {
        Self {
            id: item.meta.id,
            title: item.meta.title.clone(),
            badges: item.status.badges().to_vec(),
            status_label: item.status.label(),
            score_label: item.score.map(|score| score.to_string()),
            action: item.take_action,
            action_label: item.take_action.label(),
            can_take: item.can_take(),
        }
    }
}

#[must_use]
pub fn map_quiz_rows(items: &[QuizListItem]) -> Vec<QuizRowVm> {
    items.iter().map(QuizRowVm::from).collect()
}
