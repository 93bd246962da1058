//! ask-ai-service: forwards a text prompt and/or an image to a multimodal
//! generative model and returns its answer over HTTP.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
