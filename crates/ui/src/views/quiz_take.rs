use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::{QuestionId, QuizId};
use services::QuizAttempt;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizOptionVm, QuizTakeVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizTakeIntent {
    Select { question_id: QuestionId, key: String },
    Next,
    Previous,
    Submit,
}

#[component]
pub fn QuizTakeView(quiz_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_taking = ctx.quiz_taking();
    let quiz_id = QuizId::new(quiz_id);

    let attempt = use_signal(|| None::<QuizAttempt>);
    let error = use_signal(|| None::<ViewError>);

    let quiz_taking_for_resource = quiz_taking.clone();
    let resource = use_resource(move || {
        let quiz_taking = quiz_taking_for_resource.clone();
        let mut attempt = attempt;
        let mut error = error;

        async move {
            let opened = quiz_taking.open(quiz_id).await.map_err(ViewError::from)?;
            attempt.set(Some(opened));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let dispatch_intent = use_callback(move |intent: QuizTakeIntent| {
        let quiz_taking = quiz_taking.clone();
        let mut attempt = attempt;
        let mut error = error;

        spawn(async move {
            let taken = {
                let mut guard = attempt.write();
                guard.take()
            };
            let Some(mut current) = taken else {
                error.set(Some(ViewError::Unknown));
                return;
            };

            let outcome = match intent {
                QuizTakeIntent::Select { question_id, key } => {
                    quiz_taking.answer(&mut current, question_id, &key).await
                }
                QuizTakeIntent::Next => quiz_taking.next(&mut current).await.map(|_| ()),
                QuizTakeIntent::Previous => quiz_taking.previous(&mut current).await.map(|_| ()),
                QuizTakeIntent::Submit => quiz_taking.submit(&mut current).await.map(|_| ()),
            };

            // Put the attempt back even on error so the screen stays usable.
            attempt.set(Some(current));

            match outcome {
                Ok(()) => error.set(None),
                Err(err) => error.set(Some(ViewError::from(&err))),
            }
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTakeTestHandles>() {
                handles.register(dispatch_intent, attempt);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let vm = attempt.read().as_ref().map(QuizTakeVm::from);
    let action_error = *error.read();

    rsx! {
        div { class: "page quiz-take",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(()) => match vm {
                    Some(vm) => rsx! {
                        QuizPage { vm, on_intent: dispatch_intent }
                    },
                    None => rsx! {
                        p { "Loading..." }
                    },
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { to: Route::QuizList {}, "Back to quizzes" }
                },
            }
            if let Some(err) = action_error {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}

#[component]
fn QuizPage(vm: QuizTakeVm, on_intent: Callback<QuizTakeIntent>) -> Element {
    rsx! {
        h2 { "{vm.title}" }
        p { class: "quiz-take__progress", "{vm.progress_label} · {vm.answered_label}" }

        if let Some(score) = vm.score_label.as_deref() {
            div { class: "quiz-take__result",
                p { class: "quiz-take__score", "{score}" }
                Link { to: Route::QuizList {}, "Back to quizzes" }
            }
        } else {
            if let (Some(question_id), Some(text)) = (vm.question_id, vm.question_text.as_deref()) {
                p { class: "quiz-take__question", "{text}" }
                ul { class: "quiz-take__options",
                    for option in vm.options.iter().cloned() {
                        li { key: "{option.key}",
                            OptionButton { option, question_id, on_intent }
                        }
                    }
                }
            }
            div { class: "quiz-take__nav",
                button {
                    r#type: "button",
                    disabled: !vm.can_previous,
                    onclick: move |_| on_intent.call(QuizTakeIntent::Previous),
                    "Previous"
                }
                if vm.show_submit {
                    button {
                        class: "quiz-take__submit",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizTakeIntent::Submit),
                        "Submit"
                    }
                } else {
                    button {
                        r#type: "button",
                        disabled: !vm.can_next,
                        onclick: move |_| on_intent.call(QuizTakeIntent::Next),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(
    option: QuizOptionVm,
    question_id: QuestionId,
    on_intent: Callback<QuizTakeIntent>,
) -> Element {
    let key = option.key.clone();
    rsx! {
        button {
            class: option.class(),
            r#type: "button",
            onclick: move |_| {
                on_intent.call(QuizTakeIntent::Select {
                    question_id,
                    key: key.clone(),
                });
            },
            "{option.label}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTakeTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizTakeIntent>>>>,
    attempt: Rc<RefCell<Option<Signal<Option<QuizAttempt>>>>>,
}

#[cfg(test)]
impl QuizTakeTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizTakeIntent>,
        attempt: Signal<Option<QuizAttempt>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.attempt.borrow_mut() = Some(attempt);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizTakeIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn attempt(&self) -> Signal<Option<QuizAttempt>> {
        (*self.attempt.borrow()).expect("quiz attempt registered")
    }
}
