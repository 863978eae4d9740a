pub mod config;
pub mod errors;
pub mod event;
pub mod fetch;

pub use config::FetchConfig;
pub use errors::FetchError;
pub use event::{CompletionNotifier, FetchCompletion};
pub use fetch::{fetch_remote, FetchPhase, RemoteContent, RemoteFetch, RemoteRequest};
