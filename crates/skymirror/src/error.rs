//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use skymirror_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const MOUNT: i32 = 4;
    pub const FETCH: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetching ─────────────────────────────────────────────────────
    #[error("Could not fetch the thread: {message}")]
    #[diagnostic(
        code(skymirror::fetch_failed),
        help(
            "Check that the AT-URI is correct and the AppView is reachable.\n\
             Try: skymirror render <uri> --api-base https://public.api.bsky.app"
        )
    )]
    Fetch { message: String },

    // ── Page mounting ────────────────────────────────────────────────
    #[error("Page manifest {path} declares no containers")]
    #[diagnostic(
        code(skymirror::no_containers),
        help("Add at least one [[container]] entry with id, uri, template, and output.")
    )]
    NoContainers { path: String },

    #[error("No container in {path} could be mounted")]
    #[diagnostic(
        code(skymirror::all_containers_failed),
        help(
            "Every template is missing a required slot marker or unreadable.\n\
             Each template needs the four markers:\n\
             <!-- skymirror:loading --> <!-- skymirror:error -->\n\
             <!-- skymirror:comments --> <!-- skymirror:refresh -->"
        )
    )]
    AllContainersFailed { path: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(skymirror::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(skymirror::config),
        help("Check skymirror.toml and SKYMIRROR_* environment variables.")
    )]
    Config { message: String },

    #[error(transparent)]
    #[diagnostic(code(skymirror::config_load))]
    ConfigLoad(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { .. } => exit_code::FETCH,
            Self::NoContainers { .. } | Self::AllContainersFailed { .. } => exit_code::MOUNT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::ConfigLoad(_) => exit_code::CONFIG,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fetch { message } => CliError::Fetch { message },

            CoreError::Config { message } => CliError::Config { message },

            // Mount-time failures surface per container inside watch
            // mode; reaching here means a single-view operation failed.
            CoreError::MissingSlot { container, slot } => CliError::Validation {
                field: format!("container '{container}'"),
                reason: format!("missing required slot marker '{slot}'"),
            },

            CoreError::Template {
                container, path, ..
            } => CliError::Validation {
                field: format!("container '{container}'"),
                reason: format!("template {path} is unreadable"),
            },

            CoreError::Io(e) => CliError::Io(e),
        }
    }
}
