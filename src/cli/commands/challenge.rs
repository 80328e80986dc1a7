use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};

use crate::{
    auth::schemes::RedirectOptions,
    server::{Config, SCHEME_BEARER, SCHEME_REDIRECT},
};

pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_LOGOUT_PATH: &str = "logout-path";
pub const ARG_ACCESS_DENIED_PATH: &str = "access-denied-path";
pub const ARG_RETURN_URL_PARAMETER: &str = "return-url-parameter";
pub const ARG_DEFAULT_SCHEME: &str = "default-scheme";
pub const ARG_REALM: &str = "realm";

// served by the challenge endpoints themselves
const RESERVED_PREFIX: &str = "/challenge/";

#[derive(Debug, Clone)]
pub struct Options {
    pub config: Config,
}

impl Options {
    /// Parse challenge scheme arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a landing path is not absolute, is not a literal
    /// path, collides with another route, or the default scheme is not
    /// registered.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("missing required argument: --{id}"))
        };

        let redirect = RedirectOptions {
            login_path: read_path(&read, ARG_LOGIN_PATH)?,
            logout_path: read_path(&read, ARG_LOGOUT_PATH)?,
            access_denied_path: read_path(&read, ARG_ACCESS_DENIED_PATH)?,
            return_url_parameter: read(ARG_RETURN_URL_PARAMETER)?,
        };

        if redirect.login_path == redirect.logout_path
            || redirect.login_path == redirect.access_denied_path
            || redirect.logout_path == redirect.access_denied_path
        {
            return Err(anyhow!(
                "--{ARG_LOGIN_PATH}, --{ARG_LOGOUT_PATH} and --{ARG_ACCESS_DENIED_PATH} must differ"
            ));
        }

        let default_scheme = read(ARG_DEFAULT_SCHEME)?;
        if default_scheme != SCHEME_REDIRECT && default_scheme != SCHEME_BEARER {
            return Err(anyhow!(
                "--{ARG_DEFAULT_SCHEME} must be one of: {SCHEME_REDIRECT}, {SCHEME_BEARER}"
            ));
        }

        Ok(Self {
            config: Config {
                redirect,
                realm: read(ARG_REALM)?,
                default_scheme,
            },
        })
    }
}

fn read_path(read: &impl Fn(&str) -> Result<String>, id: &str) -> Result<String> {
    let path = read(id)?;
    if !path.starts_with('/') {
        return Err(anyhow!("--{id} must start with '/': {path}"));
    }
    if path == "/" || path == "/health" || path.starts_with(RESERVED_PREFIX) {
        return Err(anyhow!("--{id} collides with a built-in route: {path}"));
    }
    // the router would read these as captures or wildcards
    if path.contains([':', '*', '{', '}']) {
        return Err(anyhow!("--{id} must be a literal path: {path}"));
    }
    Ok(path)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long(ARG_LOGIN_PATH)
                .help("Path unauthenticated callers are redirected to")
                .env("GATEKEEP_LOGIN_PATH")
                .default_value("/home/login"),
        )
        .arg(
            Arg::new(ARG_LOGOUT_PATH)
                .long(ARG_LOGOUT_PATH)
                .help("Logout landing path")
                .env("GATEKEEP_LOGOUT_PATH")
                .default_value("/home/logout"),
        )
        .arg(
            Arg::new(ARG_ACCESS_DENIED_PATH)
                .long(ARG_ACCESS_DENIED_PATH)
                .help("Path authenticated but denied callers are redirected to")
                .env("GATEKEEP_ACCESS_DENIED_PATH")
                .default_value("/home/access-denied"),
        )
        .arg(
            Arg::new(ARG_RETURN_URL_PARAMETER)
                .long(ARG_RETURN_URL_PARAMETER)
                .help("Query parameter carrying the original destination on redirects")
                .env("GATEKEEP_RETURN_URL_PARAMETER")
                .default_value("ReturnUrl"),
        )
        .arg(
            Arg::new(ARG_DEFAULT_SCHEME)
                .long(ARG_DEFAULT_SCHEME)
                .help("Scheme challenged when a request names none")
                .env("GATEKEEP_DEFAULT_SCHEME")
                .default_value(SCHEME_REDIRECT),
        )
        .arg(
            Arg::new(ARG_REALM)
                .long(ARG_REALM)
                .help("Realm announced in WWW-Authenticate challenges")
                .env("GATEKEEP_REALM")
                .default_value(env!("CARGO_PKG_NAME")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        let mut argv = vec!["gatekeep"];
        argv.extend_from_slice(args);
        let matches = with_args(Command::new("gatekeep")).try_get_matches_from(argv)?;
        Options::parse(&matches)
    }

    #[test]
    fn defaults_match_server_defaults() {
        temp_env::with_vars(
            [
                ("GATEKEEP_LOGIN_PATH", None::<&str>),
                ("GATEKEEP_ACCESS_DENIED_PATH", None),
                ("GATEKEEP_DEFAULT_SCHEME", None),
            ],
            || {
                let options = parse(&[]).ok();
                assert_eq!(
                    options.as_ref().map(|o| o.config.redirect.clone()),
                    Some(RedirectOptions::default())
                );
                assert_eq!(
                    options.map(|o| o.config.default_scheme),
                    Some(SCHEME_REDIRECT.to_string())
                );
            },
        );
    }

    #[test]
    fn env_overrides_paths() {
        temp_env::with_vars(
            [
                ("GATEKEEP_LOGIN_PATH", Some("/account/login")),
                ("GATEKEEP_ACCESS_DENIED_PATH", Some("/account/denied")),
                ("GATEKEEP_DEFAULT_SCHEME", Some("bearer")),
            ],
            || {
                let options = parse(&[]).ok();
                assert_eq!(
                    options.as_ref().map(|o| o.config.redirect.login_path.as_str()),
                    Some("/account/login")
                );
                assert_eq!(
                    options
                        .as_ref()
                        .map(|o| o.config.redirect.access_denied_path.as_str()),
                    Some("/account/denied")
                );
                assert_eq!(
                    options.map(|o| o.config.default_scheme),
                    Some("bearer".to_string())
                );
            },
        );
    }

    #[test]
    fn rejects_relative_and_reserved_paths() {
        temp_env::with_vars([("GATEKEEP_LOGIN_PATH", None::<&str>)], || {
            assert!(parse(&["--login-path", "home/login"]).is_err());
            assert!(parse(&["--login-path", "/challenge/login"]).is_err());
            assert!(parse(&["--login-path", "/home/logout"]).is_err());
        });
    }

    #[test]
    fn rejects_capture_and_wildcard_paths() {
        temp_env::with_vars(
            [
                ("GATEKEEP_LOGIN_PATH", None::<&str>),
                ("GATEKEEP_LOGOUT_PATH", None),
                ("GATEKEEP_ACCESS_DENIED_PATH", None),
            ],
            || {
                for path in ["/home/*", "/home/*rest", "/home/:id", "/home/{id}"] {
                    let err = parse(&["--login-path", path]).err();
                    assert!(
                        err.is_some_and(|e| e.to_string().contains("literal path")),
                        "{path} accepted"
                    );
                }
                let err = parse(&["--access-denied-path", "/denied/:reason"]).err();
                assert!(err.is_some_and(|e| e.to_string().contains("--access-denied-path")));
                assert!(parse(&["--login-path", "/account/sign-in"]).is_ok());
            },
        );
    }

    #[test]
    fn rejects_unregistered_default_scheme() {
        temp_env::with_vars([("GATEKEEP_DEFAULT_SCHEME", None::<&str>)], || {
            let err = parse(&["--default-scheme", "saml"]).err();
            assert!(err.is_some_and(|e| e.to_string().contains("--default-scheme")));
        });
    }
}
