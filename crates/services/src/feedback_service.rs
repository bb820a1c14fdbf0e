use std::sync::Arc;

use feedback_core::model::{FormLayout, ResponseSheet, Token};
use storage::repository::FeedbackRepository;
use tracing::{debug, info};

use crate::Clock;
use crate::error::FeedbackServiceError;
use crate::export_service::hash_token;

/// Reads and writes one respondent's answers.
#[derive(Clone)]
pub struct FeedbackService {
    clock: Clock,
    layout: Arc<FormLayout>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    #[must_use]
    pub fn new(clock: Clock, layout: Arc<FormLayout>, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            clock,
            layout,
            feedback,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    /// Issue a token for a new respondent. Tokens are never persisted until
    /// the first submission.
    #[must_use]
    pub fn issue_token(&self) -> Token {
        Token::generate()
    }

    /// Load everything stored for `token`, for prefilling the form.
    ///
    /// Unknown tokens yield an empty sheet.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Storage` if repository access fails.
    pub async fn load(&self, token: &Token) -> Result<ResponseSheet, FeedbackServiceError> {
        let lessons = self.feedback.lesson_feedback_for(token).await?;
        let simple = self.feedback.simple_feedback_for(token).await?;
        Ok(ResponseSheet::from_records(&lessons, &simple))
    }

    /// Decode a posted form and upsert a row for every known field.
    ///
    /// Fields missing from the post are stored as NULL; unknown fields are
    /// ignored. All rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackServiceError::Storage` if the rows cannot be stored.
    pub async fn submit<I>(&self, token: &Token, pairs: I) -> Result<(), FeedbackServiceError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let user = hash_token(token);
        let decoded = self.layout.decode(pairs);
        if !decoded.unknown_fields.is_empty() {
            debug!(%user, fields = ?decoded.unknown_fields, "ignoring unknown form fields");
        }

        let (lessons, simple) = decoded.submission.into_records(token, self.clock.now());
        self.feedback.save_feedback(&lessons, &simple).await?;
        info!(%user, marks = lessons.len(), answers = simple.len(), "feedback saved");
        Ok(())
    }
}
