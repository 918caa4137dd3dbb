//! Clap derive structures for the `skymirror` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// skymirror -- mirror Bluesky discussion threads into static pages
#[derive(Debug, Parser)]
#[command(
    name = "skymirror",
    version,
    about = "Mirror Bluesky discussion threads into static pages",
    long_about = "Fetches the reply tree below a Bluesky post from the public\n\
        AppView, renders it with a bounded depth, and keeps it fresh via\n\
        scheduled and manual refresh. Read-only and unauthenticated.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// AppView base URL
    #[arg(long, env = "SKYMIRROR_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Maximum nesting level rendered locally (≥ 1)
    #[arg(long, env = "SKYMIRROR_DEPTH", global = true)]
    pub depth: Option<usize>,

    /// Refresh period for watch mode (e.g. "5m", "90s")
    #[arg(long, value_parser = humantime::parse_duration, env = "SKYMIRROR_INTERVAL", global = true)]
    pub interval: Option<Duration>,

    /// Embed post bodies unescaped (trusts the remote payload)
    #[arg(long, global = true)]
    pub raw_body: bool,

    /// HTTP client timeout (e.g. "30s")
    #[arg(long, value_parser = humantime::parse_duration, env = "SKYMIRROR_TIMEOUT", global = true)]
    pub timeout: Option<Duration>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a thread once and print the rendered fragment
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Mount every container in a page manifest and keep it fresh
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Translate an AT-URI into its web URL
    Url(UrlArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Canonical AT-URI of the thread root
    pub uri: String,

    /// Write the fragment to a file instead of stdout
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Page manifest (TOML) listing the thread containers
    pub manifest: PathBuf,
}

#[derive(Debug, Args)]
pub struct UrlArgs {
    /// Canonical AT-URI of the post
    pub uri: String,

    /// Author handle (e.g. alice.bsky.social)
    pub handle: String,
}
