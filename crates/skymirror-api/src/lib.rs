// skymirror-api: Async Rust client for the public Bluesky AppView thread API

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientConfig, ThreadClient};
pub use error::Error;
pub use types::{AuthorView, PostRecord, PostView, ThreadResponse, ThreadView};
