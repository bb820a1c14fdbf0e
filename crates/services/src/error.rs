//! Shared error types for the services crate.

use thiserror::Error;

use feedback_core::model::FormLayoutError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `FeedbackService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Flush(#[from] std::io::Error),
}

/// Errors emitted while seeding and loading the catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored catalog is not a valid form: {0}")]
    Layout(#[from] FormLayoutError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}
