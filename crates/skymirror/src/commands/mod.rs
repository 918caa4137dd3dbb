//! Subcommand handlers.

pub mod render;
pub mod url;
pub mod watch;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // `url` is pure string work -- no config, no network.
        Command::Url(args) => {
            url::handle(&args);
            Ok(())
        }
        Command::Render(args) => {
            let config = crate::config::resolve_config(&cli.global)?;
            render::handle(&args, &config).await
        }
        Command::Watch(args) => {
            let config = crate::config::resolve_config(&cli.global)?;
            watch::handle(&args, config).await
        }
    }
}
