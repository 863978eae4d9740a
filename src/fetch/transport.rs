use tokio::sync::mpsc;

use crate::fetch::request::Prepared;

const SIGNATURE_HEADER: &str = "X-Signature";

/// Events produced by the transport task for one in-flight exchange.
#[derive(Debug)]
pub(crate) enum TransportEvent {
    /// Response headers arrived.
    Meta { status: u16, signature: Option<String> },
    /// A body chunk arrived.
    Chunk(Vec<u8>),
    /// The exchange completed without a transport error.
    Finished,
    /// The exchange failed; the message describes the transport error.
    Failed(String),
}

/// Handle on an in-flight exchange. Dropping it detaches the transfer; there
/// is no cancellation.
pub(crate) struct InFlight {
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Hands prepared requests to the HTTP client and streams each exchange back
/// as a sequence of [`TransportEvent`]s.
pub(crate) struct Transport {
    client: reqwest::Client,
}

impl Transport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn get(&self, prepared: Prepared) -> InFlight {
        self.dispatch(reqwest::Method::GET, prepared, None)
    }

    pub fn post(&self, prepared: Prepared, body: Vec<u8>) -> InFlight {
        self.dispatch(reqwest::Method::POST, prepared, Some(body))
    }

    fn dispatch(
        &self,
        method: reqwest::Method,
        prepared: Prepared,
        body: Option<Vec<u8>>,
    ) -> InFlight {
        let mut request = reqwest::Request::new(method, prepared.url);
        *request.headers_mut() = prepared.headers;
        *request.timeout_mut() = prepared.timeout;
        if let Some(body) = body {
            *request.body_mut() = Some(body.into());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.execute(request).await {
                Ok(response) => stream_response(response, &tx).await,
                Err(e) => {
                    let _ = tx.send(TransportEvent::Failed(e.to_string()));
                }
            }
        });

        InFlight { events: rx }
    }
}

async fn stream_response(
    mut response: reqwest::Response,
    tx: &mpsc::UnboundedSender<TransportEvent>,
) {
    let status = response.status();
    let signature = response
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let _ = tx.send(TransportEvent::Meta {
        status: status.as_u16(),
        signature,
    });

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let _ = tx.send(TransportEvent::Chunk(chunk.to_vec()));
            }
            Ok(None) => {
                // An error status is a failed exchange; its body (usually an
                // error page) has still been streamed at this point.
                let event = if status.is_client_error() || status.is_server_error() {
                    TransportEvent::Failed(format!(
                        "server replied: {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    ))
                } else {
                    TransportEvent::Finished
                };
                let _ = tx.send(event);
                break;
            }
            Err(e) => {
                let _ = tx.send(TransportEvent::Failed(e.to_string()));
                break;
            }
        }
    }
}
