//! HTTP handlers for the ask-ai service.

pub mod ask;
pub mod health;
pub mod metrics;
