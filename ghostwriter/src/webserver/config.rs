// The meta endpoints: health check, the running configuration and the
// binary version, so the editor integration can probe what it is talking to

use axum::{extract::State, response::IntoResponse, Extension};
use serde::Serialize;

use crate::application::application::Application;
use crate::application::config::configuration::Configuration;

use super::types::Result;
use super::types::{json, ApiResponse};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthCheckResponse {
    done: bool,
}

impl ApiResponse for HealthCheckResponse {}

pub async fn health(Extension(_app): Extension<Application>) -> Result<impl IntoResponse> {
    Ok(json(HealthCheckResponse { done: true }))
}

#[derive(Serialize, Debug)]
pub(super) struct ConfigResponse {
    config: Configuration,
}

impl ApiResponse for ConfigResponse {}

pub async fn get(State(app): State<Application>) -> impl IntoResponse {
    json(ConfigResponse {
        config: (*app.config).clone(),
    })
}

#[derive(Serialize, Debug)]
pub(super) struct VersionResponse {
    package_version: String,
}

impl ApiResponse for VersionResponse {}

pub async fn version(State(_): State<Application>) -> impl IntoResponse {
    json(VersionResponse {
        package_version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}
