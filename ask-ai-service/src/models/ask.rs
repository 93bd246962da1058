use serde::{Deserialize, Serialize};

/// Body of `POST /ask-ai`.
///
/// Both fields may be omitted or `null`. An empty `image` string is treated
/// as no image at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl AskRequest {
    /// Parse a raw request body. Empty bodies, non-object JSON and wrongly
    /// typed fields are all rejected.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Take the prompt (empty when absent) and image data URL by value.
    pub fn into_inputs(self) -> (String, Option<String>) {
        (
            self.prompt.unwrap_or_default(),
            self.image.filter(|s| !s.is_empty()),
        )
    }
}

/// Successful response of `POST /ask-ai`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

/// Error payload shared by every non-2xx response of `POST /ask-ai`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
