//! API request handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::classifier::Classifier;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
    pub vocabulary_size: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "spam-detector",
        version: env!("CARGO_PKG_VERSION"),
        model: state.classifier.name().to_string(),
        vocabulary_size: state.classifier.vocabulary_size(),
    })
}
