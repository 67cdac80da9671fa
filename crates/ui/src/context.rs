use std::sync::Arc;

use services::{QuizListService, QuizTakingService, TakeResolver};

pub trait UiApp: Send + Sync {
    fn quiz_list(&self) -> Arc<QuizListService>;
    fn quiz_taking(&self) -> Arc<QuizTakingService>;
    fn take_resolver(&self) -> Arc<TakeResolver>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_list: Arc<QuizListService>,
    quiz_taking: Arc<QuizTakingService>,
    take_resolver: Arc<TakeResolver>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_list: app.quiz_list(),
            quiz_taking: app.quiz_taking(),
            take_resolver: app.take_resolver(),
        }
    }

    #[must_use]
    pub fn quiz_list(&self) -> Arc<QuizListService> {
        Arc::clone(&self.quiz_list)
    }

    #[must_use]
    pub fn quiz_taking(&self) -> Arc<QuizTakingService> {
        Arc::clone(&self.quiz_taking)
    }

    #[must_use]
    pub fn take_resolver(&self) -> Arc<TakeResolver> {
        Arc::clone(&self.take_resolver)
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
