use crate::core::config::Manifest;
use crate::core::download::Fetch;
use crate::core::progress::ProgressObserver;
use crate::error::Result;
use crate::utils::fs;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchReport {
    pub files: usize,
    pub bytes: u64,
}

/// Creates the vendor directories, then downloads every artifact in order.
/// Stops at the first failure; nothing after it runs.
pub async fn run<F>(
    manifest: &Manifest,
    fetcher: &F,
    observer: &mut dyn ProgressObserver,
) -> Result<FetchReport>
where
    F: Fetch + ?Sized,
{
    let package_dir = manifest.package_dir();
    info!("Fetching {} artifact(s) into {:?}", manifest.artifacts.len(), package_dir);

    fs::ensure_dir_exists(&manifest.root)?;
    fs::ensure_dir_exists(&package_dir)?;

    let mut report = FetchReport::default();
    for request in manifest.requests() {
        let summary = fetcher.fetch(&request, observer).await?;
        report.files += 1;
        report.bytes += summary.bytes_written;
    }

    observer.on_finished(&manifest.package);
    Ok(report)
}
