use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feedback_core::model::TokenError;
use services::{ExportError, FeedbackServiceError};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WebError {
    #[error("Not Found")]
    NotFound,

    #[error(transparent)]
    Feedback(#[from] FeedbackServiceError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

// A token that fails validation addresses no form at all.
impl From<TokenError> for WebError {
    fn from(_: TokenError) -> Self {
        WebError::NotFound
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            WebError::Feedback(_) | WebError::Export(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
