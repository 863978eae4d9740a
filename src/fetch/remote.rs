use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::event::{CompletionNotifier, FetchCompletion};
use crate::fetch::buffer::BodyBuffer;
use crate::fetch::exchange;
use crate::fetch::request::RemoteRequest;
use crate::fetch::transport::Transport;

/// Where a fetch object currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// A reusable asynchronous fetch object.
///
/// [`start`] dispatches a request and returns immediately; the terminal
/// result arrives later as exactly one [`FetchCompletion`] through the
/// notifier the host injected at construction. Once that completion has
/// fired the object can be started again; the accumulated body from the
/// previous exchange is cleared before the new one begins.
///
/// [`start`]: RemoteFetch::start
pub struct RemoteFetch {
    config: FetchConfig,
    client: reqwest::Client,
    notifier: Arc<dyn CompletionNotifier>,
    buffer: Arc<Mutex<BodyBuffer>>,
    phase: Arc<Mutex<FetchPhase>>,
    driver: Option<JoinHandle<()>>,
}

impl RemoteFetch {
    pub fn new(config: FetchConfig, notifier: impl CompletionNotifier + 'static) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            notifier: Arc::new(notifier),
            buffer: Arc::new(Mutex::new(BodyBuffer::new())),
            phase: Arc::new(Mutex::new(FetchPhase::Idle)),
            driver: None,
        }
    }

    pub fn phase(&self) -> FetchPhase {
        *self.phase.lock().unwrap()
    }

    /// Starts a new exchange. The object owns at most one in-flight exchange;
    /// starting while one is still running returns [`FetchError::Busy`].
    ///
    /// A request that cannot be built (bad URL, unrepresentable header)
    /// resolves through the normal failure path: the completion fires with
    /// the error message and an empty body.
    pub fn start(&mut self, request: RemoteRequest) -> Result<(), FetchError> {
        if self.driver.as_ref().is_some_and(|driver| !driver.is_finished()) {
            return Err(FetchError::Busy);
        }

        self.buffer.lock().unwrap().clear();
        *self.phase.lock().unwrap() = FetchPhase::InFlight;

        let (prepared, body) = match request.prepare(&self.config) {
            Ok(parts) => parts,
            Err(e) => {
                self.resolve_failed(e.to_string());
                return Ok(());
            }
        };

        let transport = Transport::new(self.client.clone());
        let in_flight = match body {
            Some(body) => transport.post(prepared, body),
            None => transport.get(prepared),
        };

        let buffer = Arc::clone(&self.buffer);
        let phase = Arc::clone(&self.phase);
        let notifier = Arc::clone(&self.notifier);

        self.driver = Some(tokio::spawn(async move {
            let outcome = exchange::drive(in_flight, &buffer).await;
            match outcome.error {
                None => {
                    let body =
                        String::from_utf8_lossy(buffer.lock().unwrap().as_slice()).into_owned();
                    *phase.lock().unwrap() = FetchPhase::Succeeded;
                    notifier.notify(FetchCompletion {
                        body,
                        error: String::new(),
                    });
                }
                Some(message) => {
                    log::warn!("RemoteFetch: HTTP request failed. {message}");
                    *phase.lock().unwrap() = FetchPhase::Failed;
                    notifier.notify(FetchCompletion {
                        body: String::new(),
                        error: message,
                    });
                }
            }
        }));

        Ok(())
    }

    fn resolve_failed(&self, message: String) {
        log::warn!("RemoteFetch: HTTP request failed. {message}");
        *self.phase.lock().unwrap() = FetchPhase::Failed;
        self.notifier.notify(FetchCompletion {
            body: String::new(),
            error: message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn new_object_starts_idle() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetch = RemoteFetch::new(FetchConfig::new("test-app", "0.0.0"), tx);
        assert_eq!(fetch.phase(), FetchPhase::Idle);
    }

    #[tokio::test]
    async fn unbuildable_request_resolves_through_failure_path() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetch = RemoteFetch::new(FetchConfig::new("test-app", "0.0.0"), tx);

        fetch.start(RemoteRequest::new("not a url")).unwrap();

        let completion = rx.recv().await.unwrap();
        assert!(completion.body.is_empty());
        assert!(!completion.error.is_empty());
        assert_eq!(fetch.phase(), FetchPhase::Failed);
    }

    #[tokio::test]
    async fn failed_object_can_be_started_again() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fetch = RemoteFetch::new(FetchConfig::new("test-app", "0.0.0"), tx);

        fetch.start(RemoteRequest::new("not a url")).unwrap();
        rx.recv().await.unwrap();

        // No driver is running after an immediate failure, so a new start
        // must be accepted.
        fetch.start(RemoteRequest::new("also not a url")).unwrap();
        let completion = rx.recv().await.unwrap();
        assert!(!completion.error.is_empty());
    }
}
