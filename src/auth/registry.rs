//! Scheme name to handler lookup.
//!
//! The registry is assembled once at startup and is read-only afterwards;
//! request handling only ever resolves from it.

use std::{collections::HashMap, fmt, sync::Arc};

use super::handler::SchemeHandler;

/// Lookup capability the dispatcher depends on.
pub trait SchemeProvider: Send + Sync {
    /// Handler registered under `name`, if any.
    fn resolve(&self, name: &str) -> Option<Arc<dyn SchemeHandler>>;

    /// Scheme challenged when a request names none.
    fn default_challenge_scheme(&self) -> Option<&str>;
}

/// In-memory registry of scheme handlers.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    handlers: HashMap<String, Arc<dyn SchemeHandler>>,
    // registration order, for listing
    names: Vec<String>,
    default_scheme: Option<String>,
    default_challenge_scheme: Option<String>,
}

impl SchemeRegistry {
    #[must_use]
    pub fn builder() -> SchemeRegistryBuilder {
        SchemeRegistryBuilder::default()
    }

    /// Registered scheme names in registration order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[must_use]
    pub fn default_scheme(&self) -> Option<&str> {
        self.default_scheme.as_deref()
    }
}

impl SchemeProvider for SchemeRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn SchemeHandler>> {
        self.handlers.get(name).cloned()
    }

    fn default_challenge_scheme(&self) -> Option<&str> {
        self.default_challenge_scheme
            .as_deref()
            .or(self.default_scheme.as_deref())
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.names)
            .field("default_scheme", &self.default_scheme)
            .field("default_challenge_scheme", &self.default_challenge_scheme)
            .finish()
    }
}

#[derive(Default)]
pub struct SchemeRegistryBuilder {
    registry: SchemeRegistry,
}

impl SchemeRegistryBuilder {
    /// Register `handler` under `name`. Registering a name twice replaces the
    /// earlier handler.
    #[must_use]
    pub fn add_scheme(mut self, name: impl Into<String>, handler: Arc<dyn SchemeHandler>) -> Self {
        let name = name.into();
        if self.registry.handlers.insert(name.clone(), handler).is_none() {
            self.registry.names.push(name);
        }
        self
    }

    /// Fallback for every default, including the challenge default.
    #[must_use]
    pub fn default_scheme(mut self, name: impl Into<String>) -> Self {
        self.registry.default_scheme = Some(name.into());
        self
    }

    #[must_use]
    pub fn default_challenge_scheme(mut self, name: impl Into<String>) -> Self {
        self.registry.default_challenge_scheme = Some(name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SchemeRegistry {
        self.registry
    }
}
