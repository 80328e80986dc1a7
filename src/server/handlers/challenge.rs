//! Challenge endpoints.
//!
//! Each endpoint always challenges; only the behavior differs. The optional
//! `scheme` query parameter takes a comma-separated list of scheme names and
//! `return_url` ends up in the property bag as the redirect target.
//!
//! Every challenge context carries a child of the server's shutdown token, so
//! challenges still running at shutdown end with `503`.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, instrument};

use crate::auth::{
    AuthenticationProperties, ChallengeBehavior, ChallengeDispatcher, ChallengeRequest,
    DispatchError, HttpContext,
};

#[derive(Debug, Default, Deserialize)]
pub struct ChallengeParams {
    pub scheme: Option<String>,
    pub return_url: Option<String>,
}

impl ChallengeParams {
    fn into_request(self, behavior: ChallengeBehavior) -> ChallengeRequest {
        let mut request = ChallengeRequest::from(behavior);

        if let Some(schemes) = self.scheme {
            request = request.with_schemes(schemes.split(',').map(str::trim));
        }

        if let Some(return_url) = self.return_url {
            request = request
                .with_properties(AuthenticationProperties::new().with_redirect_uri(return_url));
        }

        request
    }
}

pub async fn automatic(
    dispatcher: Extension<Arc<ChallengeDispatcher>>,
    shutdown: Extension<CancellationToken>,
    params: Query<ChallengeParams>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    challenge(
        &dispatcher,
        params.0.into_request(ChallengeBehavior::Automatic),
        HttpContext::new(method, uri, headers).with_cancellation(shutdown.child_token()),
    )
    .await
}

pub async fn unauthorized(
    dispatcher: Extension<Arc<ChallengeDispatcher>>,
    shutdown: Extension<CancellationToken>,
    params: Query<ChallengeParams>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    challenge(
        &dispatcher,
        params.0.into_request(ChallengeBehavior::Unauthorized),
        HttpContext::new(method, uri, headers).with_cancellation(shutdown.child_token()),
    )
    .await
}

pub async fn forbidden(
    dispatcher: Extension<Arc<ChallengeDispatcher>>,
    shutdown: Extension<CancellationToken>,
    params: Query<ChallengeParams>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    challenge(
        &dispatcher,
        params.0.into_request(ChallengeBehavior::Forbidden),
        HttpContext::new(method, uri, headers).with_cancellation(shutdown.child_token()),
    )
    .await
}

#[instrument(skip_all, fields(behavior = %request.behavior))]
async fn challenge(
    dispatcher: &ChallengeDispatcher,
    request: ChallengeRequest,
    mut ctx: HttpContext,
) -> Response {
    match dispatcher.dispatch(&mut ctx, &request).await {
        Ok(()) => ctx.into_challenge_response().into_response(),
        Err(err) => {
            error!("Challenge failed: {}", err);

            (status_for(&err), err.to_string()).into_response()
        }
    }
}

const fn status_for(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        DispatchError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
        DispatchError::UnknownScheme(_)
        | DispatchError::NoDefaultScheme
        | DispatchError::HandlerFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_split_scheme_list() {
        let params = ChallengeParams {
            scheme: Some("redirect, bearer".to_string()),
            return_url: Some("/orders".to_string()),
        };
        let request = params.into_request(ChallengeBehavior::Forbidden);
        assert_eq!(request.schemes, vec!["redirect", "bearer"]);
        assert_eq!(request.behavior, ChallengeBehavior::Forbidden);
        assert_eq!(
            request.properties().and_then(|p| p.redirect_uri.as_deref()),
            Some("/orders")
        );
    }

    #[test]
    fn empty_params_challenge_default() {
        let request = ChallengeParams::default().into_request(ChallengeBehavior::Automatic);
        assert!(request.schemes.is_empty());
        assert!(request.properties().is_none());
    }

    #[test]
    fn errors_map_to_status() {
        assert_eq!(
            status_for(&DispatchError::InvalidArgument("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DispatchError::UnknownScheme("saml".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
