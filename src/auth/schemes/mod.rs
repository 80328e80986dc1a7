//! Bundled scheme handlers.

pub mod redirect;
pub mod www_authenticate;

pub use self::redirect::{RedirectOptions, RedirectSchemeHandler, AUTHENTICATED_HEADER};
pub use self::www_authenticate::WwwAuthenticateHandler;
