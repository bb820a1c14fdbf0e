use std::sync::Arc;

use services::{AppServices, ExportService, FeedbackService};

/// Handles shared by every request, passed to handlers as axum state.
#[derive(Clone)]
pub struct AppContext {
    feedback: Arc<FeedbackService>,
    export: Arc<ExportService>,
}

impl AppContext {
    #[must_use]
    pub fn new(services: &AppServices) -> Self {
        Self {
            feedback: services.feedback(),
            export: services.export(),
        }
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
