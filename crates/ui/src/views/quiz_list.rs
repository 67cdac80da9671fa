use dioxus::prelude::*;
use dioxus_router::use_navigator;

#[cfg(test)]
use quiz_core::model::QuizId;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::rc::Rc;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizRowVm, map_quiz_rows};

#[derive(Clone, Debug, PartialEq)]
struct QuizListData {
    rows: Vec<QuizRowVm>,
}

#[component]
pub fn QuizListView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_list = ctx.quiz_list();

    let resource = use_resource(move || {
        let quiz_list = quiz_list.clone();
        async move {
            let items = quiz_list.list().await.map_err(|err| ViewError::from(&err))?;
            Ok(QuizListData {
                rows: map_quiz_rows(&items),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quizzes" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.rows.is_empty() {
                        p { "No quizzes yet." }
                    } else {
                        ul { class: "quiz-list",
                            for row in data.rows {
                                QuizRow { key: "{row.id}", row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn QuizRow(row: QuizRowVm) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_id = row.id;
    let action = row.action;
    let can_take = row.can_take;

    let on_take = use_callback(move |()| {
        let resolver = ctx.take_resolver();
        spawn(async move {
            let decision = resolver.take(quiz_id, can_take, action).await;
            if let Some(target) = decision.target() {
                let _ = navigator.push(Route::QuizTake {
                    quiz_id: target.value(),
                });
            }
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizListTestHandles>() {
                handles.register(quiz_id, on_take);
            }
        }
    }

    rsx! {
        li { class: "quiz-row",
            div {
                span { class: "quiz-row__title", "{row.title}" }
                div { class: "quiz-row__badges",
                    for badge in row.badges.iter().copied() {
                        span { class: QuizRowVm::badge_class(badge), "{badge}" }
                    }
                }
                if let Some(score) = row.score_label.as_deref() {
                    p { class: "quiz-row__score", "{score}" }
                }
            }
            button {
                class: "quiz-row__take",
                r#type: "button",
                disabled: !can_take,
                onclick: move |_| on_take.call(()),
                "{row.action_label}"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizListTestHandles {
    take: Rc<RefCell<HashMap<QuizId, Callback<()>>>>,
}

#[cfg(test)]
impl QuizListTestHandles {
    pub(crate) fn register(&self, quiz_id: QuizId, take: Callback<()>) {
        self.take.borrow_mut().insert(quiz_id, take);
    }

    pub(crate) fn take(&self, quiz_id: QuizId) -> Callback<()> {
        *self
            .take
            .borrow()
            .get(&quiz_id)
            .expect("take button registered")
    }
}
