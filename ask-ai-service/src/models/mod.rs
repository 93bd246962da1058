//! Domain models for the ask-ai service.

pub mod ask;
pub mod content;

pub use ask::{AskRequest, AskResponse, ErrorBody};
pub use content::{ContentPart, DecodedImage};
