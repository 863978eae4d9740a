pub mod buffer;
mod exchange;
pub mod oneshot;
pub mod remote;
pub mod request;
mod transport;

pub use oneshot::{fetch_remote, RemoteContent};
pub use remote::{FetchPhase, RemoteFetch};
pub use request::RemoteRequest;
