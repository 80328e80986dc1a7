//! Header-based scheme that answers challenges with status codes.
//!
//! Unauthorized callers get `401` plus a `WWW-Authenticate` header naming the
//! scheme and realm; forbidden callers get a bare `403`.

use async_trait::async_trait;
use axum::http::{
    header::{AUTHORIZATION, WWW_AUTHENTICATE},
    StatusCode,
};
use tracing::debug;

use crate::auth::{
    context::HttpContext,
    error::HandlerError,
    handler::{AuthenticateOutcome, Principal, SchemeHandler},
    properties::AuthenticationProperties,
};

#[derive(Clone, Debug)]
pub struct WwwAuthenticateHandler {
    /// Authorization scheme token, e.g. `Bearer`.
    scheme: String,
    realm: String,
}

impl WwwAuthenticateHandler {
    #[must_use]
    pub fn new(scheme: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            realm: realm.into(),
        }
    }

    #[must_use]
    pub fn challenge_value(&self) -> String {
        format!("{} realm=\"{}\"", self.scheme, self.realm.replace('"', "\\\""))
    }
}

#[async_trait]
impl SchemeHandler for WwwAuthenticateHandler {
    async fn authenticate(&self, ctx: &HttpContext) -> Result<AuthenticateOutcome, HandlerError> {
        let Some(value) = ctx
            .request_headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(AuthenticateOutcome::NoResult);
        };

        let (scheme, credentials) = value.split_once(' ').unwrap_or((value, ""));
        if !scheme.eq_ignore_ascii_case(&self.scheme) {
            return Ok(AuthenticateOutcome::NoResult);
        }

        if credentials.trim().is_empty() {
            return Ok(AuthenticateOutcome::Fail("missing credentials".to_string()));
        }

        Ok(AuthenticateOutcome::Success(Principal {
            scheme: self.scheme.clone(),
            name: None,
        }))
    }

    async fn handle_unauthorized(
        &self,
        ctx: &mut HttpContext,
        _properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError> {
        debug!(scheme = %self.scheme, realm = %self.realm, "issuing authentication challenge");
        let response = ctx.response_mut();
        response.insert_header(WWW_AUTHENTICATE, &self.challenge_value())?;
        response.set_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    async fn handle_forbidden(
        &self,
        ctx: &mut HttpContext,
        _properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError> {
        debug!(scheme = %self.scheme, "forbidding authenticated caller");
        ctx.response_mut().set_status(StatusCode::FORBIDDEN);
        Ok(())
    }
}
