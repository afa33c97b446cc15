//! Health check endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::data::{Dataset, DatasetService};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub datasets: Vec<DatasetHealth>,
}

#[derive(Serialize)]
pub struct DatasetHealth {
    pub name: &'static str,
    pub available: bool,
}

/// Health check endpoint. Reports whether each dataset file is present;
/// the server stays up either way and lookups against a missing file fail.
pub async fn health(State(service): State<Arc<DatasetService>>) -> impl IntoResponse {
    let datasets = Dataset::all()
        .iter()
        .map(|&d| DatasetHealth {
            name: d.as_str(),
            available: service.store(d).path().is_file(),
        })
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            datasets,
        }),
    )
}
