//! service-core: Shared infrastructure for the ask-ai services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
