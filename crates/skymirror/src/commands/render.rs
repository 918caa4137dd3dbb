//! `skymirror render` -- one fetch→render cycle to stdout or a file.

use tracing::debug;

use skymirror_api::{ClientConfig, ThreadClient};
use skymirror_core::render::{RenderOptions, render_thread};
use skymirror_core::{CoreError, MirrorConfig, convert};

use crate::cli::RenderArgs;
use crate::error::CliError;

pub async fn handle(args: &RenderArgs, config: &MirrorConfig) -> Result<(), CliError> {
    let client = ThreadClient::new(ClientConfig {
        base_url: config.api_base.clone(),
        timeout: config.timeout,
        http_client: None,
    })
    .map_err(CoreError::from)?;

    let resp = client
        .get_post_thread(&args.uri)
        .await
        .map_err(CoreError::from)?;

    let nodes = convert::thread_replies(resp);
    debug!(replies = nodes.len(), "thread fetched");

    let html = render_thread(&nodes, &RenderOptions::from(config));

    match args.out {
        Some(ref path) => std::fs::write(path, &html)?,
        None => print!("{html}"),
    }
    Ok(())
}
