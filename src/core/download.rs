use crate::core::progress::{DownloadProgress, ProgressObserver};
use crate::error::{Result, VendorFetchError};
use crate::utils::fs::remove_partial_file;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use log::debug;
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{redirect, Client, StatusCode, Url};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// One remote file and where it lands on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub destination: PathBuf,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub bytes_written: u64,
    pub total_bytes: Option<u64>,
}

/// Anything that can turn a [`DownloadRequest`] into a file on disk.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(
        &self,
        request: &DownloadRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DownloadSummary>;
}

pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Builds a client that neither follows redirects nor goes through a proxy.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|e| VendorFetchError::config_error(format!("HTTP client setup failed: {e}")))?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Streams `request.source_url` into `request.destination`.
    ///
    /// The destination is created (or truncated) before the request goes out.
    /// On any failure the file handle is closed and the file removed before
    /// the error is returned, so the destination is either complete or absent.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DownloadSummary> {
        let url = Url::parse(&request.source_url).map_err(|_| VendorFetchError::InvalidUrl {
            url: request.source_url.clone(),
        })?;

        observer.on_start(request);

        let mut sink = match File::create(&request.destination).await {
            Ok(file) => file,
            Err(e) => {
                let err = VendorFetchError::local_io(&request.destination, e);
                observer.on_abort(&err);
                return Err(err);
            }
        };

        let transferred = self.transfer(url, request, &mut sink, observer).await;
        let closed = sink.flush().await;
        drop(sink);

        let result = match (transferred, closed) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(e)) => Err(VendorFetchError::local_io(&request.destination, e)),
            (Err(e), _) => Err(e),
        };

        match result {
            Ok(summary) => {
                debug!("Wrote {} bytes to {:?}", summary.bytes_written, request.destination);
                observer.on_complete(&summary);
                Ok(summary)
            }
            Err(e) => {
                observer.on_abort(&e);
                remove_partial_file(&request.destination).await;
                Err(e)
            }
        }
    }

    async fn transfer(
        &self,
        url: Url,
        request: &DownloadRequest,
        sink: &mut File,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DownloadSummary> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VendorFetchError::network(&request.source_url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(VendorFetchError::HttpStatus {
                url: request.source_url.clone(),
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let total_bytes = declared_length(response.headers());
        debug!("{} declared length: {total_bytes:?}", request.source_url);

        stream_body(response.bytes_stream(), sink, total_bytes, request, observer).await
    }
}

#[async_trait]
impl Fetch for Downloader {
    async fn fetch(
        &self,
        request: &DownloadRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DownloadSummary> {
        self.download(request, observer).await
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Writes every chunk of `body` to `sink` in arrival order, reporting
/// progress after each chunk lands.
async fn stream_body<S, B, W>(
    body: S,
    sink: &mut W,
    total_bytes: Option<u64>,
    request: &DownloadRequest,
    observer: &mut dyn ProgressObserver,
) -> Result<DownloadSummary>
where
    S: Stream<Item = reqwest::Result<B>>,
    B: AsRef<[u8]>,
    W: AsyncWrite + Unpin,
{
    let mut body = std::pin::pin!(body);
    let mut progress = DownloadProgress::new(total_bytes);

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| VendorFetchError::network(&request.source_url, e))?;
        let bytes = chunk.as_ref();

        sink.write_all(bytes)
            .await
            .map_err(|e| VendorFetchError::local_io(&request.destination, e))?;

        progress.advance(bytes.len() as u64);
        observer.on_progress(&progress);
    }

    Ok(DownloadSummary {
        bytes_written: progress.bytes_received,
        total_bytes,
    })
}
