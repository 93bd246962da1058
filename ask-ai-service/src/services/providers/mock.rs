//! Mock provider implementation for testing and local development.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use crate::models::ContentPart;
use async_trait::async_trait;
use std::sync::Mutex;

enum MockBehavior {
    Respond,
    Disabled,
    Fail(String),
}

/// Mock text provider. Records every call so tests can inspect the parts
/// the handler assembled.
pub struct MockTextProvider {
    behavior: MockBehavior,
    calls: Mutex<Vec<Vec<ContentPart>>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        let behavior = if enabled {
            MockBehavior::Respond
        } else {
            MockBehavior::Disabled
        };
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Content parts of every call received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<ContentPart>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    fn describe(parts: &[ContentPart]) -> String {
        parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => text.clone(),
                ContentPart::Image(image) => format!("[image {}x{}]", image.width(), image.height()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, parts: &[ContentPart]) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(parts.to_vec());
        }

        match &self.behavior {
            MockBehavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            MockBehavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            MockBehavior::Respond => {
                let description = Self::describe(parts);
                Ok(ProviderResponse {
                    input_tokens: description.len() as i32 / 4,
                    output_tokens: 10,
                    text: format!("Mock response for: {}", description),
                    finish_reason: FinishReason::Complete,
                })
            }
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_echoes_prompt() {
        let provider = MockTextProvider::new(true);
        let response = provider
            .generate(&[ContentPart::Text("Hello".to_string())])
            .await
            .unwrap();

        assert_eq!(response.text, "Mock response for: Hello");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failing_provider_still_records_call() {
        let provider = MockTextProvider::failing("quota exceeded");
        let err = provider
            .generate(&[ContentPart::Text("Hello".to_string())])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API error: quota exceeded");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn disabled_provider_is_not_configured() {
        let provider = MockTextProvider::new(false);
        assert!(matches!(
            provider.health_check().await,
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
