pub mod client;
pub mod sync;

pub use client::BotApiClient;
pub use sync::{run_sync_loop, ApiCommand, ApiEvent, POLL_INTERVAL};
