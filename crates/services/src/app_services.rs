use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::bootstrap::ensure_catalog;
use crate::error::AppServicesError;
use crate::export_service::ExportService;
use crate::feedback_service::FeedbackService;

/// Assembles the services shared by every request.
#[derive(Clone)]
pub struct AppServices {
    seeded: bool,
    feedback: Arc<FeedbackService>,
    export: Arc<ExportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or catalog
    /// bootstrap fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock).await
    }

    /// Build services over an already opened storage, seeding the catalog if
    /// it is empty.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Bootstrap` if the catalog cannot be seeded
    /// or loaded.
    pub async fn from_storage(storage: &Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let bootstrap = ensure_catalog(storage.catalog.as_ref()).await?;
        let layout = Arc::new(bootstrap.layout);

        let feedback = Arc::new(FeedbackService::new(
            clock,
            layout,
            Arc::clone(&storage.feedback),
        ));
        let export = Arc::new(ExportService::new(Arc::clone(&storage.feedback)));

        Ok(Self {
            seeded: bootstrap.seeded,
            feedback,
            export,
        })
    }

    /// Whether building these services wrote the seed catalog.
    #[must_use]
    pub fn seeded(&self) -> bool {
        self.seeded
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        Arc::clone(&self.feedback)
    }

    #[must_use]
    pub fn export(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }
}
