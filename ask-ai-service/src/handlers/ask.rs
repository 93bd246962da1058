use crate::error::AskError;
use crate::models::{AskRequest, AskResponse, ContentPart};
use crate::services::decode_data_url_blocking;
use crate::services::metrics;
use crate::startup::AppState;
use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use std::time::Instant;

/// `POST /ask-ai`: forward a prompt and/or image to the model and return its
/// text.
///
/// The body is read as raw bytes so that every malformed payload, whatever
/// its content type, gets the same `Invalid JSON input` error. Buffering
/// failures, including the body size limit, are reported as JSON too.
pub async fn ask_ai(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AskResponse>, AskError> {
    let result = match body {
        Ok(body) => answer(&state, &body).await,
        Err(rejection) => Err(AskError::from_body_rejection(rejection)),
    };

    metrics::record_ask_request(match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    });

    result.map(Json)
}

async fn answer(state: &AppState, body: &[u8]) -> Result<AskResponse, AskError> {
    tracing::info!(body_bytes = body.len(), "Received a request on /ask-ai");

    let request = AskRequest::from_body(body).map_err(AskError::InvalidJson)?;
    let (prompt, image_data_url) = request.into_inputs();

    let image = match image_data_url {
        Some(data_url) => {
            let image = decode_data_url_blocking(data_url).await?;
            tracing::info!(
                width = image.width(),
                height = image.height(),
                "Image processed successfully"
            );
            Some(image)
        }
        None => None,
    };

    let parts = ContentPart::assemble(&prompt, image).ok_or(AskError::MissingInput)?;

    let provider = state.text_provider.as_ref();
    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        part_count = parts.len(),
        "Sending request to model"
    );

    let start = Instant::now();
    let result = provider.generate(&parts).await;
    metrics::record_provider_latency(
        provider.name(),
        provider.model(),
        start.elapsed().as_secs_f64(),
    );

    let response = result.inspect_err(|e| {
        metrics::record_provider_error(provider.name(), e.kind());
    })?;

    metrics::record_tokens(
        provider.model(),
        response.input_tokens,
        response.output_tokens,
    );
    tracing::info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        finish_reason = ?response.finish_reason,
        "Received response from model"
    );

    Ok(AskResponse {
        response: response.text,
    })
}
