//! Landing pages that the redirect scheme sends callers to.

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{SchemeProvider, SchemeRegistry};

#[derive(Debug, Default, Deserialize)]
pub struct LandingParams {
    #[serde(rename = "ReturnUrl")]
    pub return_url: Option<String>,
}

pub async fn login(params: Query<LandingParams>) -> impl IntoResponse {
    Json(json!({
        "page": "login",
        "return_url": params.0.return_url,
    }))
}

pub async fn logout() -> impl IntoResponse {
    Json(json!({ "page": "logout" }))
}

pub async fn access_denied(params: Query<LandingParams>) -> impl IntoResponse {
    Json(json!({
        "page": "access_denied",
        "return_url": params.0.return_url,
    }))
}

// axum handler for /
pub async fn root(registry: Extension<Arc<SchemeRegistry>>) -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "schemes": registry.schemes().collect::<Vec<_>>(),
        "default_challenge_scheme": registry.default_challenge_scheme(),
    }))
}
