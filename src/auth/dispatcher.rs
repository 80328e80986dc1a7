//! Challenge dispatch.
//!
//! Flow Overview:
//! 1. Reject blank scheme names before touching any handler.
//! 2. An empty scheme list is replaced by the provider's default challenge
//!    scheme, exactly once.
//! 3. Every scheme is resolved before any handler runs, then challenged in
//!    the order given, one at a time. Reactions write to the same response,
//!    so later schemes overwrite earlier redirects.
//! 4. The first unknown scheme, handler failure or cancellation stops the
//!    dispatch.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{
    context::HttpContext, error::DispatchError, handler::SchemeHandler,
    registry::SchemeProvider, request::ChallengeRequest,
};

/// Stateless orchestrator over a [`SchemeProvider`].
#[derive(Clone)]
pub struct ChallengeDispatcher {
    provider: Arc<dyn SchemeProvider>,
}

impl ChallengeDispatcher {
    #[must_use]
    pub fn new(provider: Arc<dyn SchemeProvider>) -> Self {
        Self { provider }
    }

    /// Challenge every scheme named by `request`, or the default challenge
    /// scheme when it names none.
    ///
    /// # Errors
    /// - [`DispatchError::InvalidArgument`] for a blank scheme name.
    /// - [`DispatchError::NoDefaultScheme`] when no scheme is named and none is configured.
    /// - [`DispatchError::UnknownScheme`] for the first scheme without a handler.
    /// - [`DispatchError::HandlerFailure`] wrapping the first handler error.
    /// - [`DispatchError::Cancelled`] once the request context is cancelled.
    pub async fn dispatch(
        &self,
        ctx: &mut HttpContext,
        request: &ChallengeRequest,
    ) -> Result<(), DispatchError> {
        if let Some(position) = request
            .schemes
            .iter()
            .position(|scheme| scheme.trim().is_empty())
        {
            return Err(DispatchError::InvalidArgument(format!(
                "scheme name at position {position} is empty"
            )));
        }

        info!(
            schemes = ?request.schemes,
            behavior = %request.behavior,
            "executing challenge"
        );

        let schemes: Vec<&str> = if request.schemes.is_empty() {
            let default = self
                .provider
                .default_challenge_scheme()
                .ok_or(DispatchError::NoDefaultScheme)?;
            vec![default]
        } else {
            request.schemes.iter().map(String::as_str).collect()
        };

        // resolve everything up front so an unknown scheme never leaves a
        // partial challenge behind
        let mut handlers: Vec<(&str, Arc<dyn SchemeHandler>)> =
            Vec::with_capacity(schemes.len());
        for scheme in schemes {
            let Some(handler) = self.provider.resolve(scheme) else {
                warn!(scheme, "no handler registered for scheme");
                return Err(DispatchError::UnknownScheme(scheme.to_string()));
            };
            handlers.push((scheme, handler));
        }

        let token = ctx.cancellation_token().clone();

        for (scheme, handler) in handlers {
            if token.is_cancelled() {
                warn!(scheme, "challenge cancelled");
                return Err(DispatchError::Cancelled(scheme.to_string()));
            }

            debug!(scheme, behavior = %request.behavior, "challenging scheme");

            let result = tokio::select! {
                biased;
                () = token.cancelled() => {
                    warn!(scheme, "challenge cancelled while handler was running");
                    return Err(DispatchError::Cancelled(scheme.to_string()));
                }
                result = handler.challenge(ctx, request.properties(), request.behavior) => result,
            };

            if let Err(source) = result {
                error!(scheme, error = %source, "authentication handler failed");
                return Err(DispatchError::HandlerFailure {
                    scheme: scheme.to_string(),
                    source,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        behavior::ChallengeBehavior,
        error::HandlerError,
        handler::{AuthenticateOutcome, SchemeHandler},
        properties::AuthenticationProperties,
        registry::SchemeRegistry,
    };
    use async_trait::async_trait;
    use axum::http::{HeaderMap, Method, Uri};
    use std::sync::Mutex;

    /// Records `scheme:reaction` into a shared log.
    struct Recording {
        name: &'static str,
        authenticated: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recording {
        fn push(&self, reaction: &str) {
            if let Ok(mut log) = self.log.lock() {
                log.push(format!("{}:{reaction}", self.name));
            }
        }
    }

    #[async_trait]
    impl SchemeHandler for Recording {
        async fn authenticate(
            &self,
            _ctx: &HttpContext,
        ) -> Result<AuthenticateOutcome, HandlerError> {
            if self.authenticated {
                Ok(AuthenticateOutcome::Success(crate::auth::Principal {
                    scheme: self.name.to_string(),
                    name: None,
                }))
            } else {
                Ok(AuthenticateOutcome::NoResult)
            }
        }

        async fn handle_unauthorized(
            &self,
            _ctx: &mut HttpContext,
            _properties: Option<&AuthenticationProperties>,
        ) -> Result<(), HandlerError> {
            self.push("unauthorized");
            Ok(())
        }

        async fn handle_forbidden(
            &self,
            _ctx: &mut HttpContext,
            _properties: Option<&AuthenticationProperties>,
        ) -> Result<(), HandlerError> {
            self.push("forbidden");
            Ok(())
        }
    }

    fn setup(authenticated: bool) -> (ChallengeDispatcher, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = SchemeRegistry::builder()
            .add_scheme(
                "a",
                Arc::new(Recording {
                    name: "a",
                    authenticated,
                    log: Arc::clone(&log),
                }),
            )
            .add_scheme(
                "b",
                Arc::new(Recording {
                    name: "b",
                    authenticated,
                    log: Arc::clone(&log),
                }),
            )
            .default_scheme("a")
            .build();
        (ChallengeDispatcher::new(Arc::new(registry)), log)
    }

    fn context() -> HttpContext {
        HttpContext::new(Method::GET, Uri::from_static("/"), HeaderMap::new())
    }

    fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    #[tokio::test]
    async fn empty_schemes_challenge_default_once() {
        let (dispatcher, log) = setup(false);
        let result = dispatcher
            .dispatch(&mut context(), &ChallengeRequest::new())
            .await;
        assert!(result.is_ok());
        assert_eq!(entries(&log), vec!["a:unauthorized"]);
    }

    #[tokio::test]
    async fn named_schemes_run_in_order() {
        let (dispatcher, log) = setup(true);
        let request = ChallengeRequest::new().with_schemes(["b", "a"]);
        assert!(dispatcher.dispatch(&mut context(), &request).await.is_ok());
        assert_eq!(entries(&log), vec!["b:forbidden", "a:forbidden"]);
    }

    #[tokio::test]
    async fn blank_scheme_is_rejected_before_any_handler() {
        let (dispatcher, log) = setup(false);
        let request = ChallengeRequest::new().with_schemes(["a", " "]);
        let result = dispatcher.dispatch(&mut context(), &request).await;
        assert!(matches!(result, Err(DispatchError::InvalidArgument(_))));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn unknown_scheme_invokes_no_handler() {
        let (dispatcher, log) = setup(false);
        let request = ChallengeRequest::new()
            .with_schemes(["a", "saml", "b"])
            .with_behavior(ChallengeBehavior::Forbidden);
        let result = dispatcher.dispatch(&mut context(), &request).await;
        assert!(matches!(result, Err(DispatchError::UnknownScheme(ref s)) if s == "saml"));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn missing_default_is_reported() {
        let dispatcher = ChallengeDispatcher::new(Arc::new(SchemeRegistry::default()));
        let result = dispatcher
            .dispatch(&mut context(), &ChallengeRequest::new())
            .await;
        assert!(matches!(result, Err(DispatchError::NoDefaultScheme)));
    }
}
