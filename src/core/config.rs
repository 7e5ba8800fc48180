use crate::core::download::DownloadRequest;
use crate::error::{Result, VendorFetchError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_ROOT: &str = "third_party";
pub const DEFAULT_PACKAGE: &str = "http-parser";

const HTTP_PARSER_BASE_URL: &str = "https://raw.githubusercontent.com/nodejs/http-parser/v2.9.4";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub url: String,
    pub file_name: String,
}

impl Artifact {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }
}

/// What to fetch and where: `root/package/<file_name>` for every artifact.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_package")]
    pub package: String,
    pub artifacts: Vec<Artifact>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            root: default_root(),
            package: default_package(),
            artifacts: vec![
                Artifact::new(
                    format!("{HTTP_PARSER_BASE_URL}/http_parser.c"),
                    "http_parser.c",
                ),
                Artifact::new(
                    format!("{HTTP_PARSER_BASE_URL}/http_parser.h"),
                    "http_parser.h",
                ),
            ],
        }
    }
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            VendorFetchError::config_error(format!("Manifest serialization failed: {e}"))
        })
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Rejects manifests that would fetch over plain HTTP or write outside
    /// the package directory.
    pub fn validate(&self) -> Result<()> {
        if self.artifacts.is_empty() {
            return Err(VendorFetchError::config_error("Manifest lists no artifacts"));
        }

        if !is_plain_component(&self.package) {
            return Err(VendorFetchError::config_error(format!(
                "Package directory '{}' must be a single path component",
                self.package
            )));
        }

        for artifact in &self.artifacts {
            let url = Url::parse(&artifact.url).map_err(|_| VendorFetchError::InvalidUrl {
                url: artifact.url.clone(),
            })?;
            if url.scheme() != "https" {
                return Err(VendorFetchError::config_error(format!(
                    "Artifact URL '{}' must use https",
                    artifact.url
                )));
            }

            if !is_plain_component(&artifact.file_name) {
                return Err(VendorFetchError::config_error(format!(
                    "Artifact file name '{}' must be a single path component",
                    artifact.file_name
                )));
            }
        }

        Ok(())
    }

    pub fn package_dir(&self) -> PathBuf {
        self.root.join(&self.package)
    }

    pub fn destination(&self, artifact: &Artifact) -> PathBuf {
        self.package_dir().join(&artifact.file_name)
    }

    /// Download requests in manifest order.
    pub fn requests(&self) -> Vec<DownloadRequest> {
        self.artifacts
            .iter()
            .map(|artifact| DownloadRequest::new(artifact.url.clone(), self.destination(artifact)))
            .collect()
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}

fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
