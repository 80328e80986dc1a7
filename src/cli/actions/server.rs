use crate::server::{self, Config};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub config: Config,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        login_path = %args.config.redirect.login_path,
        access_denied_path = %args.config.redirect.access_denied_path,
        default_scheme = %args.config.default_scheme,
        "starting server"
    );

    server::new(args.port, args.config).await
}
