//! Challenge behavior selection.
//!
//! The behavior tells a scheme handler which reaction a challenge should
//! produce. `Automatic` defers to the handler's own view of whether the caller
//! is authenticated, the other two force one reaction regardless.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Policy consumed by scheme handlers to pick a reaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeBehavior {
    /// Unauthenticated callers get the unauthorized reaction, authenticated
    /// callers get the forbidden reaction.
    #[default]
    Automatic,
    /// Always perform the unauthorized (login) reaction.
    Unauthorized,
    /// Always perform the forbidden (access denied) reaction.
    Forbidden,
}

impl ChallengeBehavior {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for ChallengeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeBehavior {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "automatic" => Ok(Self::Automatic),
            "unauthorized" => Ok(Self::Unauthorized),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(format!("invalid challenge behavior: {other}")),
        }
    }
}
