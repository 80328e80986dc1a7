//! Authentication challenge dispatch.
//!
//! A request-handling layer that decides a caller must (re-)authenticate
//! builds a [`ChallengeRequest`] and hands it to a [`ChallengeDispatcher`].
//! The dispatcher resolves each named scheme (or the default challenge scheme)
//! from a [`SchemeProvider`] and lets that scheme's [`SchemeHandler`] react
//! according to the requested [`ChallengeBehavior`].

pub mod behavior;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod properties;
pub mod registry;
pub mod request;
pub mod schemes;

pub use self::behavior::ChallengeBehavior;
pub use self::context::{ChallengeResponse, HttpContext};
pub use self::dispatcher::ChallengeDispatcher;
pub use self::error::{DispatchError, HandlerError};
pub use self::handler::{AuthenticateOutcome, Principal, Reaction, SchemeHandler};
pub use self::properties::AuthenticationProperties;
pub use self::registry::{SchemeProvider, SchemeRegistry, SchemeRegistryBuilder};
pub use self::request::ChallengeRequest;
