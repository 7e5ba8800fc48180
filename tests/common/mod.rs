#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use vendor_fetch::core::download::{DownloadRequest, DownloadSummary};
use vendor_fetch::core::progress::{DownloadProgress, ProgressObserver};
use vendor_fetch::error::VendorFetchError;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start(String),
    Progress(DownloadProgress),
    Complete(DownloadSummary),
    Abort(String),
    Finished(String),
}

/// Observer that remembers every event it was handed.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn progress(&self) -> Vec<DownloadProgress> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Progress(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> bool {
        matches!(self.events.last(), Some(Event::Complete(_)))
    }

    pub fn aborted(&self) -> bool {
        matches!(self.events.last(), Some(Event::Abort(_)))
    }
}

impl ProgressObserver for Recorder {
    fn on_start(&mut self, request: &DownloadRequest) {
        self.events.push(Event::Start(request.source_url.clone()));
    }

    fn on_progress(&mut self, progress: &DownloadProgress) {
        self.events.push(Event::Progress(*progress));
    }

    fn on_complete(&mut self, summary: &DownloadSummary) {
        self.events.push(Event::Complete(*summary));
    }

    fn on_abort(&mut self, error: &VendorFetchError) {
        self.events.push(Event::Abort(error.to_string()));
    }

    fn on_finished(&mut self, package: &str) {
        self.events.push(Event::Finished(package.to_string()));
    }
}

/// Serves `response` verbatim to the first connection, then hangs up.
/// Returns a URL pointing at the server.
pub async fn serve_raw_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }

        let _ = socket.write_all(&response).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/http_parser.c")
}

/// A localhost URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/http_parser.c")
}
