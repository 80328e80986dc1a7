//! Scheme handler contract.
//!
//! Flow Overview: the dispatcher calls [`SchemeHandler::challenge`] with the
//! caller's behavior. The provided implementation turns the behavior into one
//! of two reactions:
//! - `Automatic`: authenticate first; no identity means unauthorized, an
//!   identity that is being challenged anyway means forbidden.
//! - `Unauthorized` / `Forbidden`: the matching reaction, no authentication.
//!
//! What a reaction looks like (redirect, header, status) is up to the handler.

use async_trait::async_trait;

use super::{
    behavior::ChallengeBehavior, context::HttpContext, error::HandlerError,
    properties::AuthenticationProperties,
};

/// Identity established by a scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    /// Scheme that authenticated the caller.
    pub scheme: String,
    pub name: Option<String>,
}

/// Result of asking a scheme who the caller is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthenticateOutcome {
    /// The scheme found no credentials it understands.
    NoResult,
    Success(Principal),
    /// Credentials were present but rejected.
    Fail(String),
}

impl AuthenticateOutcome {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Success(principal) => Some(principal),
            Self::NoResult | Self::Fail(_) => None,
        }
    }
}

/// Reaction to pick for a behavior, given an authentication outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Unauthorized,
    Forbidden,
}

impl Reaction {
    /// `outcome` is only consulted for [`ChallengeBehavior::Automatic`].
    #[must_use]
    pub const fn select(behavior: ChallengeBehavior, outcome: Option<&AuthenticateOutcome>) -> Self {
        match behavior {
            ChallengeBehavior::Unauthorized => Self::Unauthorized,
            ChallengeBehavior::Forbidden => Self::Forbidden,
            ChallengeBehavior::Automatic => match outcome {
                Some(AuthenticateOutcome::Success(_)) => Self::Forbidden,
                _ => Self::Unauthorized,
            },
        }
    }
}

/// Per-scheme authentication logic.
///
/// Implementations are registered once at startup and shared across
/// requests, so they must be safe for concurrent use.
#[async_trait]
pub trait SchemeHandler: Send + Sync {
    /// Determine whether the current caller is authenticated under this scheme.
    async fn authenticate(&self, ctx: &HttpContext) -> Result<AuthenticateOutcome, HandlerError>;

    /// React to a caller that needs to authenticate (e.g. redirect to login).
    async fn handle_unauthorized(
        &self,
        ctx: &mut HttpContext,
        properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError>;

    /// React to an authenticated caller that is denied (e.g. redirect to an
    /// access-denied page).
    async fn handle_forbidden(
        &self,
        ctx: &mut HttpContext,
        properties: Option<&AuthenticationProperties>,
    ) -> Result<(), HandlerError>;

    /// Challenge the caller according to `behavior`.
    async fn challenge(
        &self,
        ctx: &mut HttpContext,
        properties: Option<&AuthenticationProperties>,
        behavior: ChallengeBehavior,
    ) -> Result<(), HandlerError> {
        let outcome = match behavior {
            ChallengeBehavior::Automatic => Some(self.authenticate(ctx).await?),
            ChallengeBehavior::Unauthorized | ChallengeBehavior::Forbidden => None,
        };

        match Reaction::select(behavior, outcome.as_ref()) {
            Reaction::Unauthorized => self.handle_unauthorized(ctx, properties).await,
            Reaction::Forbidden => self.handle_forbidden(ctx, properties).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> AuthenticateOutcome {
        AuthenticateOutcome::Success(Principal {
            scheme: "test".to_string(),
            name: None,
        })
    }

    #[test]
    fn automatic_depends_on_outcome() {
        assert_eq!(
            Reaction::select(
                ChallengeBehavior::Automatic,
                Some(&AuthenticateOutcome::NoResult)
            ),
            Reaction::Unauthorized
        );
        assert_eq!(
            Reaction::select(
                ChallengeBehavior::Automatic,
                Some(&AuthenticateOutcome::Fail("expired".to_string()))
            ),
            Reaction::Unauthorized
        );
        assert_eq!(
            Reaction::select(ChallengeBehavior::Automatic, Some(&success())),
            Reaction::Forbidden
        );
    }

    #[test]
    fn explicit_behaviors_ignore_outcome() {
        assert_eq!(
            Reaction::select(ChallengeBehavior::Unauthorized, Some(&success())),
            Reaction::Unauthorized
        );
        assert_eq!(
            Reaction::select(ChallengeBehavior::Forbidden, None),
            Reaction::Forbidden
        );
    }

    #[test]
    fn principal_only_on_success() {
        assert!(success().principal().is_some());
        assert!(AuthenticateOutcome::NoResult.principal().is_none());
        assert!(!AuthenticateOutcome::Fail("bad".to_string()).succeeded());
    }
}
