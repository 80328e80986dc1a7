//! Challenge request construction.
//!
//! A single struct with independently optional fields covers every
//! combination of schemes, properties and behavior.

use std::sync::Arc;

use super::{behavior::ChallengeBehavior, properties::AuthenticationProperties};

/// What to challenge and how.
///
/// An empty `schemes` list means "challenge the default scheme", never "all
/// schemes".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub schemes: Vec<String>,
    pub properties: Option<Arc<AuthenticationProperties>>,
    pub behavior: ChallengeBehavior,
}

impl ChallengeRequest {
    /// Challenge the default scheme with `Automatic` behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into());
        self
    }

    #[must_use]
    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes.extend(schemes.into_iter().map(Into::into));
        self
    }

    /// Attach a caller-owned property bag. The `Arc` keeps the caller's
    /// handle valid for as long as it wants it.
    #[must_use]
    pub fn with_properties(mut self, properties: impl Into<Arc<AuthenticationProperties>>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    #[must_use]
    pub const fn with_behavior(mut self, behavior: ChallengeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn properties(&self) -> Option<&AuthenticationProperties> {
        self.properties.as_deref()
    }
}

impl From<ChallengeBehavior> for ChallengeRequest {
    fn from(behavior: ChallengeBehavior) -> Self {
        Self::new().with_behavior(behavior)
    }
}
