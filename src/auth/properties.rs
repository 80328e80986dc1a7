//! Caller-owned extension data threaded through a challenge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque property bag handed to every scheme handler of a challenge.
///
/// The dispatcher only ever borrows it; handlers read what they understand
/// (typically `redirect_uri`) and ignore the rest.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationProperties {
    /// Where the caller should land once the challenge is satisfied.
    pub redirect_uri: Option<String>,
    pub is_persistent: bool,
    pub allow_refresh: Option<bool>,
    #[serde(default)]
    pub items: BTreeMap<String, String>,
}

impl AuthenticationProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// Set an item, returning the previous value if any.
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.items.insert(key.into(), value.into())
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }
}
