use std::sync::Mutex;

use crate::fetch::buffer::BodyBuffer;
use crate::fetch::transport::{InFlight, TransportEvent};

/// What one finished exchange amounted to, body aside.
#[derive(Debug)]
pub(crate) struct ExchangeOutcome {
    /// Transport error message, if the terminal event was a failure
    pub error: Option<String>,
    /// HTTP status code; 0 if no response ever arrived
    pub status: u16,
    /// Value of the X-Signature response header, if present
    pub signature: Option<String>,
}

/// Consumes transport events for one exchange, appending body chunks to
/// `buffer`, until the first terminal event.
///
/// The first terminal event wins: the receiver is dropped on return, so a
/// late "finished" arriving after a failure (or the other way around) is
/// never processed and cannot produce a second completion.
pub(crate) async fn drive(mut in_flight: InFlight, buffer: &Mutex<BodyBuffer>) -> ExchangeOutcome {
    let mut status = 0u16;
    let mut signature = None;

    while let Some(event) = in_flight.events.recv().await {
        match event {
            TransportEvent::Meta {
                status: code,
                signature: sig,
            } => {
                status = code;
                signature = sig;
            }
            TransportEvent::Chunk(chunk) => {
                buffer.lock().unwrap().append(&chunk);
            }
            TransportEvent::Finished => {
                return ExchangeOutcome {
                    error: None,
                    status,
                    signature,
                };
            }
            TransportEvent::Failed(message) => {
                return ExchangeOutcome {
                    error: Some(message),
                    status,
                    signature,
                };
            }
        }
    }

    // The transport task went away without reaching a terminal event.
    ExchangeOutcome {
        error: Some("transfer interrupted".to_string()),
        status,
        signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedSender};

    fn in_flight() -> (UnboundedSender<TransportEvent>, InFlight) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, InFlight { events: rx })
    }

    #[tokio::test]
    async fn chunks_accumulate_in_arrival_order() {
        let (tx, handle) = in_flight();
        tx.send(TransportEvent::Meta {
            status: 200,
            signature: None,
        })
        .unwrap();
        tx.send(TransportEvent::Chunk(b"hello ".to_vec())).unwrap();
        tx.send(TransportEvent::Chunk(b"world".to_vec())).unwrap();
        tx.send(TransportEvent::Finished).unwrap();

        let buffer = Mutex::new(BodyBuffer::new());
        let outcome = drive(handle, &buffer).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.status, 200);
        assert_eq!(buffer.lock().unwrap().as_slice(), b"hello world");
    }

    #[tokio::test]
    async fn first_terminal_event_wins() {
        let (tx, handle) = in_flight();
        tx.send(TransportEvent::Chunk(b"partial".to_vec())).unwrap();
        tx.send(TransportEvent::Failed("connection reset".into()))
            .unwrap();
        // A late "finished" must not turn the exchange into a success.
        tx.send(TransportEvent::Finished).unwrap();

        let buffer = Mutex::new(BodyBuffer::new());
        let outcome = drive(handle, &buffer).await;

        assert_eq!(outcome.error.as_deref(), Some("connection reset"));
        assert_eq!(buffer.lock().unwrap().as_slice(), b"partial");
    }

    #[tokio::test]
    async fn signature_from_meta_is_carried_through() {
        let (tx, handle) = in_flight();
        tx.send(TransportEvent::Meta {
            status: 200,
            signature: Some("abc123".into()),
        })
        .unwrap();
        tx.send(TransportEvent::Finished).unwrap();

        let buffer = Mutex::new(BodyBuffer::new());
        let outcome = drive(handle, &buffer).await;

        assert_eq!(outcome.signature.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn closed_channel_without_terminal_is_a_failure() {
        let (tx, handle) = in_flight();
        drop(tx);

        let buffer = Mutex::new(BodyBuffer::new());
        let outcome = drive(handle, &buffer).await;

        assert!(outcome.error.is_some());
        assert_eq!(outcome.status, 0);
    }
}
