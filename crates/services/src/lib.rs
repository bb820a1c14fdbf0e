#![forbid(unsafe_code)]

pub mod app_services;
pub mod bootstrap;
pub mod error;
pub mod export_service;
pub mod feedback_service;

pub use feedback_core::Clock;

pub use app_services::AppServices;
pub use bootstrap::{Bootstrap, ensure_catalog};
pub use error::{AppServicesError, BootstrapError, ExportError, FeedbackServiceError};
pub use export_service::{EXPORT_HEADER, ExportRow, ExportService, hash_token};
pub use feedback_service::FeedbackService;
