use std::sync::Mutex;

use crate::config::FetchConfig;
use crate::fetch::buffer::BodyBuffer;
use crate::fetch::exchange;
use crate::fetch::request::RemoteRequest;
use crate::fetch::transport::Transport;

/// Everything a one-shot fetch produced.
#[derive(Debug)]
pub struct RemoteContent {
    /// Overall result under the fail-on-error policy: always `true` when no
    /// error occurred; on error, `false` only if the caller asked for hard
    /// failures.
    pub ok: bool,
    /// Accumulated body bytes. On failure this holds whatever arrived before
    /// the error, which may be empty or partial.
    pub body: Vec<u8>,
    /// Transport error description; empty when the exchange succeeded.
    pub error: String,
    /// HTTP status code; 0 if no response ever arrived.
    pub status: u16,
    /// X-Signature response header, if the server sent one.
    pub signature: Option<String>,
}

/// Fetches `request` and resolves in place: the calling task is parked until
/// the exchange reaches its terminal event.
///
/// Transport errors never escape as a panic or an `Err`; they land in
/// [`RemoteContent::error`] and, when `fail_on_error` is set, flip
/// [`RemoteContent::ok`] to `false`. Each call builds its own client, so
/// concurrent calls never share connection state.
pub async fn fetch_remote(
    config: &FetchConfig,
    request: RemoteRequest,
    fail_on_error: bool,
) -> RemoteContent {
    let (prepared, body) = match request.prepare(config) {
        Ok(parts) => parts,
        Err(e) => {
            let message = e.to_string();
            log::warn!("fetch_remote: HTTP request failed. {message}");
            return RemoteContent {
                ok: !fail_on_error,
                body: Vec::new(),
                error: message,
                status: 0,
                signature: None,
            };
        }
    };

    let transport = Transport::new(reqwest::Client::new());
    let in_flight = match body {
        Some(body) => transport.post(prepared, body),
        None => transport.get(prepared),
    };

    let buffer = Mutex::new(BodyBuffer::new());
    let outcome = exchange::drive(in_flight, &buffer).await;
    let body = buffer.into_inner().unwrap().into_bytes();

    match outcome.error {
        None => RemoteContent {
            ok: true,
            body,
            error: String::new(),
            status: outcome.status,
            signature: outcome.signature,
        },
        Some(message) => {
            log::warn!("fetch_remote: HTTP request failed. {message}");
            RemoteContent {
                ok: !fail_on_error,
                body,
                error: message,
                status: outcome.status,
                signature: outcome.signature,
            }
        }
    }
}
