use thiserror::Error;

/// Failure raised by a scheme handler while authenticating or reacting.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to build redirect location: {0}")]
    InvalidLocation(String),
    #[error("invalid header value for {header}")]
    InvalidHeader {
        header: String,
        #[source]
        source: axum::http::header::InvalidHeaderValue,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by [`ChallengeDispatcher::dispatch`](super::ChallengeDispatcher::dispatch).
///
/// None of these are retried: they are either misconfiguration or a
/// downstream handler failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no authentication handler is registered for the scheme '{0}'")]
    UnknownScheme(String),
    #[error("no default challenge scheme is configured")]
    NoDefaultScheme,
    #[error("authentication handler for scheme '{scheme}' failed")]
    HandlerFailure {
        scheme: String,
        #[source]
        source: HandlerError,
    },
    #[error("challenge cancelled at scheme '{0}'")]
    Cancelled(String),
}
