//! Download progress values and the observers that display them.

use crate::core::download::{DownloadRequest, DownloadSummary};
use crate::error::VendorFetchError;
use std::fmt;
use std::io::{self, Stdout, Write};

/// Bytes received so far against the total declared at header time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub bytes_received: u64,
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            bytes_received: 0,
            total_bytes,
        }
    }

    pub fn advance(&mut self, len: u64) {
        self.bytes_received = self.bytes_received.saturating_add(len);
    }

    /// Percentage complete, or `None` when the server declared no length.
    pub fn percent(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                100.0
            } else {
                self.bytes_received as f64 / total as f64 * 100.0
            }
        })
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "{percent:.2}%"),
            None => write!(f, "{} bytes", self.bytes_received),
        }
    }
}

/// Receives the events of one download at a time, in order:
/// `on_start`, any number of `on_progress`, then `on_complete` or `on_abort`.
/// `on_finished` fires once after every artifact of a package has landed.
pub trait ProgressObserver: Send {
    fn on_start(&mut self, request: &DownloadRequest);

    fn on_progress(&mut self, progress: &DownloadProgress);

    fn on_complete(&mut self, summary: &DownloadSummary);

    fn on_abort(&mut self, error: &VendorFetchError);

    fn on_finished(&mut self, _package: &str) {}
}

/// Console display with a single progress line rewritten in place.
pub struct ConsoleProgress<W: Write + Send = Stdout> {
    out: W,
    line_open: bool,
}

impl ConsoleProgress<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        // A broken console must not fail the transfer.
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            log::debug!("Console write failed: {e}");
        }
    }

    fn close_line(&mut self) {
        if self.line_open {
            self.emit(format_args!("\n"));
            self.line_open = false;
        }
    }
}

impl<W: Write + Send> ProgressObserver for ConsoleProgress<W> {
    fn on_start(&mut self, request: &DownloadRequest) {
        self.close_line();
        self.emit(format_args!("Downloading {}...\n", request.source_url));
    }

    fn on_progress(&mut self, progress: &DownloadProgress) {
        let label = if progress.total_bytes.is_some() {
            "Progress"
        } else {
            "Received"
        };
        self.emit(format_args!("\r{label}: {progress}"));
        self.line_open = true;
    }

    fn on_complete(&mut self, _summary: &DownloadSummary) {
        self.close_line();
        self.emit(format_args!("Download complete\n"));
    }

    fn on_abort(&mut self, _error: &VendorFetchError) {
        self.close_line();
    }

    fn on_finished(&mut self, package: &str) {
        self.close_line();
        self.emit(format_args!("{package} download complete\n"));
    }
}
