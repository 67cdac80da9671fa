use std::sync::Arc;

use storage::{CatalogDocument, Storage};

use crate::error::AppServicesError;
use crate::quiz::{
    QuizListService, QuizRecords, QuizTakingService, StatusProjection, TakeResolver,
};

/// Assembles app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    quiz_list: Arc<QuizListService>,
    quiz_taking: Arc<QuizTakingService>,
    take_resolver: Arc<TakeResolver>,
    status: Arc<StatusProjection>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        let records = QuizRecords::new(Arc::clone(&storage.records));
        let status = StatusProjection::new(records.clone());

        Self {
            quiz_list: Arc::new(QuizListService::new(
                Arc::clone(&storage.catalog),
                status.clone(),
            )),
            quiz_taking: Arc::new(QuizTakingService::new(
                Arc::clone(&storage.catalog),
                records.clone(),
            )),
            take_resolver: Arc::new(TakeResolver::new(records)),
            status: Arc::new(status),
        }
    }

    /// Build services backed by `SQLite` storage, importing `catalog` when given.
    ///
    /// An empty database is filled with the bundled sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the catalog import fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: Option<CatalogDocument>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        ensure_catalog(&storage, catalog).await?;
        Ok(Self::new(&storage))
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

    #[must_use]
    pub fn status(&self) -> Arc<StatusProjection> {
        Arc::clone(&self.status)
    }
}

async fn ensure_catalog(
    storage: &Storage,
    catalog: Option<CatalogDocument>,
) -> Result<(), AppServicesError> {
    if let Some(doc) = catalog {
        let imported = doc.import_into(storage.catalog.as_ref()).await?;
        tracing::info!(imported, "catalog imported");
        return Ok(());
    }

    if storage.catalog.list_quizzes().await?.is_empty() {
        let imported = CatalogDocument::sample()?
            .import_into(storage.catalog.as_ref())
            .await?;
        tracing::info!(imported, "empty catalog seeded with sample quizzes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizStatus;

    #[tokio::test]
    async fn sqlite_services_seed_an_empty_catalog() {
        let services =
            AppServices::new_sqlite("sqlite:file:memdb_app_services?mode=memory&cache=shared", None)
                .await
                .unwrap();
        let items = services.quiz_list().list().await.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().any(|i| i.status == QuizStatus::Closed));
    }
}
