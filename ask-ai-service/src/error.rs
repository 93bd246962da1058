//! Errors returned by `POST /ask-ai`.

use crate::models::ErrorBody;
use crate::services::providers::ProviderError;
use crate::services::ImageError;
use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskError {
    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Could not read request body")]
    UnreadableBody(#[source] BytesRejection),

    #[error("Invalid JSON input")]
    InvalidJson(#[source] serde_json::Error),

    #[error("A prompt or an image is required")]
    MissingInput,

    #[error("Could not process image: {0}")]
    ImageProcessing(#[from] ImageError),

    #[error("An error occurred with the AI model: {0}")]
    ModelInvocation(#[from] ProviderError),
}

impl AskError {
    /// Classify a failure to buffer the request body.
    pub fn from_body_rejection(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AskError::PayloadTooLarge
        } else {
            AskError::UnreadableBody(rejection)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AskError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AskError::UnreadableBody(_)
            | AskError::InvalidJson(_)
            | AskError::MissingInput
            | AskError::ImageProcessing(_) => {
                StatusCode::BAD_REQUEST
            }
            AskError::ModelInvocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            AskError::PayloadTooLarge => "payload_too_large",
            AskError::UnreadableBody(_) => "unreadable_body",
            AskError::InvalidJson(_) => "invalid_json",
            AskError::MissingInput => "missing_input",
            AskError::ImageProcessing(_) => "image_error",
            AskError::ModelInvocation(_) => "model_error",
        }
    }
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AskError::PayloadTooLarge => tracing::warn!("Request body exceeded the size limit"),
            AskError::UnreadableBody(e) => {
                tracing::warn!(error = %e, "Could not read request body")
            }
            AskError::InvalidJson(e) => tracing::warn!(error = %e, "Invalid JSON input"),
            AskError::MissingInput => tracing::warn!("Request had neither prompt nor image"),
            AskError::ImageProcessing(e) => tracing::warn!(error = %e, "Error processing image"),
            AskError::ModelInvocation(e) => tracing::error!(error = %e, "Error calling AI model"),
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_contract() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AskError::InvalidJson(json_err).to_string(), "Invalid JSON input");
        assert_eq!(
            AskError::MissingInput.to_string(),
            "A prompt or an image is required"
        );
        assert_eq!(
            AskError::ImageProcessing(ImageError::MissingSeparator).to_string(),
            "Could not process image: data URL is missing the ',' between header and payload"
        );
        assert_eq!(
            AskError::ModelInvocation(ProviderError::RateLimited).to_string(),
            "An error occurred with the AI model: Rate limited"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(AskError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AskError::MissingInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AskError::ImageProcessing(ImageError::MissingSeparator).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AskError::ModelInvocation(ProviderError::EmptyResponse).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
