use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, QuizListService, QuizTakingService, TakeResolver};
use storage::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz_list::QuizListTestHandles;
use crate::views::quiz_take::QuizTakeTestHandles;
use crate::views::{QuizListView, QuizTakeView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn quiz_list(&self) -> Arc<QuizListService> {
        self.services.quiz_list()
    }

    fn quiz_taking(&self) -> Arc<QuizTakingService> {
        self.services.quiz_taking()
    }

    fn take_resolver(&self) -> Arc<TakeResolver> {
        self.services.take_resolver()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    QuizList,
    QuizTake(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    take_handles: Option<QuizTakeTestHandles>,
    list_handles: Option<QuizListTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.take_handles.clone() {
        use_context_provider(|| handles);
    }
    if let Some(handles) = props.list_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    #[route("/quiz/:quiz_id", QuizTakeView)]
    TakeQuiz { quiz_id: u64 },
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::QuizList => rsx! { QuizListView {} },
        ViewKind::QuizTake(quiz_id) => rsx! { QuizTakeView { quiz_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub take_handles: Option<QuizTakeTestHandles>,
    pub list_handles: Option<QuizListTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, storage: Storage) -> ViewHarness {
    let services = AppServices::new(&storage);
    let (take_handles, list_handles) = match view {
        ViewKind::QuizTake(_) => (Some(QuizTakeTestHandles::default()), None),
        ViewKind::QuizList => (None, Some(QuizListTestHandles::default())),
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { services }),
            view,
            take_handles: take_handles.clone(),
            list_handles: list_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        take_handles,
        list_handles,
    }
}
