//! Per-request context handed to scheme handlers.
//!
//! Handlers read the request side (headers, uri) to decide whether the caller
//! is authenticated and write their reaction into the [`ChallengeResponse`].
//! The cancellation token ties the challenge to the lifetime of the request.

use axum::{
    http::{
        header::LOCATION, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
        Uri,
    },
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

use super::error::HandlerError;

/// Response state accumulated by challenge reactions.
#[derive(Clone, Debug)]
pub struct ChallengeResponse {
    status: StatusCode,
    headers: HeaderMap,
}

impl Default for ChallengeResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }
}

impl ChallengeResponse {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Current `Location` header, if a redirect was issued.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Replace any previous value of `name`.
    ///
    /// # Errors
    /// Returns [`HandlerError::InvalidHeader`] if `value` is not a valid header value.
    pub fn insert_header(&mut self, name: HeaderName, value: &str) -> Result<(), HandlerError> {
        let value = HeaderValue::from_str(value).map_err(|source| HandlerError::InvalidHeader {
            header: name.to_string(),
            source,
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Issue a `302 Found` to `location`, overwriting an earlier redirect.
    ///
    /// # Errors
    /// Returns [`HandlerError::InvalidLocation`] if `location` is empty or not
    /// a valid header value.
    pub fn redirect(&mut self, location: &str) -> Result<(), HandlerError> {
        if location.trim().is_empty() {
            return Err(HandlerError::InvalidLocation(
                "redirect location is empty".to_string(),
            ));
        }
        let value = HeaderValue::from_str(location)
            .map_err(|_| HandlerError::InvalidLocation(location.to_string()))?;
        self.status = StatusCode::FOUND;
        self.headers.insert(LOCATION, value);
        Ok(())
    }
}

impl IntoResponse for ChallengeResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers).into_response()
    }
}

/// Request view plus the mutable response a challenge writes into.
#[derive(Debug)]
pub struct HttpContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    response: ChallengeResponse,
    cancellation: CancellationToken,
}

impl HttpContext {
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            response: ChallengeResponse::default(),
            cancellation: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    /// Tie the context to an externally owned token, e.g. one cancelled when
    /// the client disconnects.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    #[must_use]
    pub const fn request_headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn response(&self) -> &ChallengeResponse {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ChallengeResponse {
        &mut self.response
    }

    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Consume the context, keeping only what the reactions wrote.
    #[must_use]
    pub fn into_challenge_response(self) -> ChallengeResponse {
        self.response
    }
}
