//! HTTP surface for the challenge dispatcher.
//!
//! Registers two schemes at startup (`redirect` and `bearer`), shares the
//! read-only registry and the dispatcher with the handlers, and exposes one
//! challenge endpoint per behavior.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

use crate::auth::{
    schemes::{RedirectOptions, RedirectSchemeHandler, WwwAuthenticateHandler},
    ChallengeDispatcher, SchemeRegistry,
};

pub mod handlers;

use self::handlers::{challenge, health, home, root};

pub const SCHEME_REDIRECT: &str = "redirect";
pub const SCHEME_BEARER: &str = "bearer";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Server configuration, assembled by the CLI.
#[derive(Clone, Debug)]
pub struct Config {
    pub redirect: RedirectOptions,
    /// Realm announced by the `bearer` scheme.
    pub realm: String,
    /// Scheme challenged when a request names none.
    pub default_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redirect: RedirectOptions::default(),
            realm: env!("CARGO_PKG_NAME").to_string(),
            default_scheme: SCHEME_REDIRECT.to_string(),
        }
    }
}

/// Build the scheme registry for `config`.
#[must_use]
pub fn registry(config: &Config) -> SchemeRegistry {
    SchemeRegistry::builder()
        .add_scheme(
            SCHEME_REDIRECT,
            Arc::new(RedirectSchemeHandler::new(
                SCHEME_REDIRECT,
                config.redirect.clone(),
            )),
        )
        .add_scheme(
            SCHEME_BEARER,
            Arc::new(WwwAuthenticateHandler::new("Bearer", config.realm.clone())),
        )
        .default_scheme(config.default_scheme.clone())
        .build()
}

/// Build the application router.
///
/// Challenges still running when `shutdown` is cancelled end with `503`.
#[must_use]
pub fn router(config: &Config, shutdown: CancellationToken) -> Router {
    let registry = Arc::new(registry(config));
    let dispatcher = Arc::new(ChallengeDispatcher::new(registry.clone()));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/challenge/automatic", get(challenge::automatic))
        .route("/challenge/unauthorized", get(challenge::unauthorized))
        .route("/challenge/forbidden", get(challenge::forbidden))
        .route(&config.redirect.login_path, get(home::login))
        .route(&config.redirect.logout_path, get(home::logout))
        .route(&config.redirect.access_denied_path, get(home::access_denied))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(dispatcher))
                .layer(Extension(registry))
                .layer(Extension(shutdown)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, config: Config) -> Result<()> {
    let shutdown = CancellationToken::new();
    let app = router(&config, shutdown.clone());

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
