//! # Gatekeep (Authentication Challenge Dispatcher)
//!
//! `gatekeep` decides nothing about credentials. It sits between a request
//! handler that has concluded "this caller may not proceed" and the
//! authentication schemes that know how to tell the caller so.
//!
//! ## Challenges
//!
//! A [`auth::ChallengeRequest`] names zero or more schemes, an optional
//! property bag, and a [`auth::ChallengeBehavior`]. The
//! [`auth::ChallengeDispatcher`] resolves every named scheme from the
//! registry, in order, and invokes its handler. Naming no scheme challenges
//! the configured default challenge scheme once, never every scheme.
//!
//! ## Behaviors
//!
//! - **Automatic:** the handler authenticates first; anonymous callers get
//!   the unauthorized reaction (e.g. redirect to login), authenticated ones the
//!   forbidden reaction (e.g. redirect to access denied).
//! - **Unauthorized / Forbidden:** force that reaction regardless of identity.
//!
//! ## Server
//!
//! The `gatekeep` binary serves one challenge endpoint per behavior over a
//! registry holding a redirect scheme and a `WWW-Authenticate` scheme.

pub mod auth;
pub mod cli;
pub mod server;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
