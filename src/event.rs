use tokio::sync::mpsc;

/// Terminal notification for one exchange. Exactly one of `body` and `error`
/// is non-empty: a successful exchange carries the UTF-8 decoded body and an
/// empty error, a failed one carries an empty body and the error description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    pub body: String,
    pub error: String,
}

/// How completions reach the host. The host's event loop stays outside this
/// crate; it injects something implementing this trait into [`RemoteFetch`]
/// and consumes completions however it likes.
///
/// [`RemoteFetch`]: crate::fetch::RemoteFetch
pub trait CompletionNotifier: Send + Sync {
    fn notify(&self, completion: FetchCompletion);
}

/// Hosts that drain events on their own loop can hand the fetch object the
/// sending side of a channel. A send to a closed channel is dropped, like an
/// event posted to a torn-down window.
impl CompletionNotifier for mpsc::UnboundedSender<FetchCompletion> {
    fn notify(&self, completion: FetchCompletion) {
        let _ = self.send(completion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_notifier_delivers_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.notify(FetchCompletion {
            body: "payload".into(),
            error: String::new(),
        });

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.body, "payload");
        assert!(completion.error.is_empty());
    }

    #[tokio::test]
    async fn closed_channel_drops_completion_silently() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.notify(FetchCompletion {
            body: String::new(),
            error: "gone".into(),
        });
    }
}
