//! Redirect-based scheme, modelled on cookie authentication.
//!
//! A caller counts as authenticated when the request carries the
//! `authenticated` header. Unauthorized callers are sent to the login path,
//! forbidden callers to the access-denied path.

use async_trait::async_trait;
use axum::http::header::HOST;
use tracing::{debug, instrument};
use url::{Position, Url};

use crate::auth::{
    context::HttpContext,
    error::HandlerError,
    handler::{AuthenticateOutcome, Principal, SchemeHandler},
    properties::AuthenticationProperties,
};

/// Request header whose presence marks the caller as authenticated.
pub const AUTHENTICATED_HEADER: &str = "authenticated";

// only used to resolve relative redirects, never emitted
const PLACEHOLDER_ORIGIN: &str = "http://localhost";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectOptions {
    pub login_path: String,
    pub logout_path: String,
    pub access_denied_path: String,
    /// Query parameter carrying the property bag's `redirect_uri`.
    pub return_url_parameter: String,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self {
            login_path: "/home/login".to_string(),
            logout_path: "/home/logout".to_string(),
            access_denied_path: "/home/access-denied".to_string(),
            return_url_parameter: "ReturnUrl".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RedirectSchemeHandler {
    scheme: String,
    options: RedirectOptions,
}

impl RedirectSchemeHandler {
    #[must_use]
    pub fn new(scheme: impl Into<String>, options: RedirectOptions) -> Self {
        Self {
            scheme: scheme.into(),
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &RedirectOptions {
        &self.options
    }

    /// Build the redirect target for `path`.
    ///
    /// The result is absolute when the request has a `Host` header and
    /// path-only otherwise.
    ///
    /// # Errors
    /// Returns [`HandlerError::InvalidLocation`] if the host or path cannot form a URL.
    pub fn build_redirect_uri(
        &self,
        ctx: &HttpContext,
        path: &str,
        properties: Option<&AuthenticationProperties>,
    ) -> Result<String, HandlerError> {
        let host = ctx
            .request_headers()
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        let origin = match host {
            Some(host) => format!("{}://{host}", ctx.uri().scheme_str().unwrap_or("http")),
            None => PLACEHOLDER_ORIGIN.to_string(),
        };

        let mut url = Url::parse(&origin)
            .and_then(|base| base.join(path))
            .map_err(|e| HandlerError::InvalidLocation(format!("{origin}{path}: {e}")))?;

        if let Some(return_url) = properties.and_then(|p| p.redirect_uri.as_deref()) {
            url.query_pairs_mut()
                .append_pair(&self.options.return_url_parameter, return_url);
        }

        if host.is_some() {
            Ok(url.to_string())
        } else {
            Ok(url[Position::BeforePath..].to_string())
        }
    }
}

#[async_trait]
impl SchemeHandler for RedirectSchemeHandler {
    async fn authenticate(&self, ctx: &HttpContext) -> Result<AuthenticateOutcome, HandlerError> {
        if !ctx.request_headers().contains_key(AUTHENTICATED_HEADER) {
            return Ok(AuthenticateOutcome::NoResult);
        }

        Ok(AuthenticateOutcome::Success(Principal {
            scheme: self.scheme.clone(),
            name: None,
        }))
    }

    #[instrument(skip_all, fields(scheme = %self.scheme))]
    async fn handle_unauthorized(
        &self,
        ctx: &mut HttpContext,
        properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError> {
        let location = self.build_redirect_uri(ctx, &self.options.login_path, properties)?;
        debug!(%location, "redirecting to login");
        ctx.response_mut().redirect(&location)
    }

    #[instrument(skip_all, fields(scheme = %self.scheme))]
    async fn handle_forbidden(
        &self,
        ctx: &mut HttpContext,
        properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError> {
        let location =
            self.build_redirect_uri(ctx, &self.options.access_denied_path, properties)?;
        debug!(%location, "redirecting to access denied");
        ctx.response_mut().redirect(&location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::behavior::ChallengeBehavior;
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};

    fn handler() -> RedirectSchemeHandler {
        RedirectSchemeHandler::new("redirect", RedirectOptions::default())
    }

    fn context(authenticated: bool, host: Option<&'static str>) -> HttpContext {
        let mut headers = HeaderMap::new();
        if authenticated {
            headers.insert(AUTHENTICATED_HEADER, HeaderValue::from_static("true"));
        }
        if let Some(host) = host {
            headers.insert(HOST, HeaderValue::from_static(host));
        }
        HttpContext::new(Method::GET, Uri::from_static("/orders"), headers)
    }

    async fn location_for(authenticated: bool, behavior: ChallengeBehavior) -> Option<String> {
        let mut ctx = context(authenticated, None);
        handler().challenge(&mut ctx, None, behavior).await.ok()?;
        assert_eq!(ctx.response().status(), StatusCode::FOUND);
        ctx.response().location().map(ToString::to_string)
    }

    #[tokio::test]
    async fn automatic_redirects_by_authentication_state() {
        assert_eq!(
            location_for(false, ChallengeBehavior::Automatic).await.as_deref(),
            Some("/home/login")
        );
        assert_eq!(
            location_for(true, ChallengeBehavior::Automatic).await.as_deref(),
            Some("/home/access-denied")
        );
    }

    #[tokio::test]
    async fn explicit_behavior_overrides_authentication_state() {
        assert_eq!(
            location_for(true, ChallengeBehavior::Unauthorized).await.as_deref(),
            Some("/home/login")
        );
        assert_eq!(
            location_for(false, ChallengeBehavior::Forbidden).await.as_deref(),
            Some("/home/access-denied")
        );
    }

    #[tokio::test]
    async fn authenticate_reports_principal_for_scheme() {
        let outcome = handler().authenticate(&context(true, None)).await.ok();
        assert_eq!(
            outcome.as_ref().and_then(AuthenticateOutcome::principal),
            Some(&Principal {
                scheme: "redirect".to_string(),
                name: None,
            })
        );
        let outcome = handler().authenticate(&context(false, None)).await.ok();
        assert_eq!(outcome, Some(AuthenticateOutcome::NoResult));
    }

    #[test]
    fn redirect_uri_is_absolute_with_host() {
        let ctx = context(false, Some("shop.example:8443"));
        assert_eq!(
            handler()
                .build_redirect_uri(&ctx, "/home/login", None)
                .ok()
                .as_deref(),
            Some("http://shop.example:8443/home/login")
        );
    }

    #[test]
    fn redirect_uri_carries_return_url() {
        let ctx = context(false, None);
        let props = AuthenticationProperties::new().with_redirect_uri("/orders?page=2");
        assert_eq!(
            handler()
                .build_redirect_uri(&ctx, "/home/login", Some(&props))
                .ok()
                .as_deref(),
            Some("/home/login?ReturnUrl=%2Forders%3Fpage%3D2")
        );
    }
}
