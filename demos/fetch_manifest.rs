use remote_fetch::{fetch_remote, FetchCompletion, FetchConfig, RemoteFetch, RemoteRequest};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com/".to_string());

    // The host application would pass its own product name and version here;
    // they end up in the User-Agent header of every request.
    let config = FetchConfig::new("demo-app", "1.0.0");

    // One-shot mode: dispatch and wait in place for the whole result.
    let content = fetch_remote(
        &config,
        RemoteRequest::new(&url).timeout_secs(10),
        true,
    )
    .await;

    if content.ok {
        println!("status: {}", content.status);
        if let Some(signature) = &content.signature {
            println!("signature: {signature}");
        }
        println!("{}", String::from_utf8_lossy(&content.body));
    } else {
        eprintln!("fetch failed: {}", content.error);
    }

    // Asynchronous mode: the fetch object reports back through a channel,
    // the way a GUI host would drain completions on its event loop.
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchCompletion>();
    let mut fetch = RemoteFetch::new(config, tx);
    fetch
        .start(RemoteRequest::new(&url).timeout_secs(10))
        .expect("no fetch is in flight yet");

    if let Some(completion) = rx.recv().await {
        if completion.error.is_empty() {
            println!("async fetch delivered {} bytes", completion.body.len());
        } else {
            eprintln!("async fetch failed: {}", completion.error);
        }
    }
}
