use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VendorFetchError>;

#[derive(Error, Debug)]
pub enum VendorFetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to create directory {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {path:?}")]
    PermissionDenied { path: PathBuf },

    #[error("Path exists and is not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    #[error("Invalid download URL: '{url}'")]
    InvalidUrl { url: String },

    #[error("Download failed: {code} {message} ({url})")]
    HttpStatus {
        url: String,
        code: u16,
        message: String,
    },

    #[error("Network error while fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Write to {path:?} failed: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl VendorFetchError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        VendorFetchError::Config {
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(url: S, source: reqwest::Error) -> Self {
        VendorFetchError::Network {
            url: url.into(),
            source,
        }
    }

    pub fn local_io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        VendorFetchError::LocalIo {
            path: path.into(),
            source,
        }
    }
}
