use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use vendor_fetch::commands;
use vendor_fetch::core::config::Manifest;
use vendor_fetch::core::download::Downloader;
use vendor_fetch::core::progress::ConsoleProgress;

#[derive(Parser)]
#[clap(name = "vendor-fetch")]
#[clap(about = "Fetch pinned third-party sources into a vendor directory")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Root directory for vendored sources (default: third_party)
    #[clap(long)]
    root: Option<PathBuf>,
    /// TOML manifest listing the artifacts to fetch (default: built-in http-parser set)
    #[clap(long)]
    manifest: Option<PathBuf>,
    /// Print the effective manifest and exit
    #[clap(long)]
    print_manifest: bool,
    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn resolve_manifest(cli: &Cli) -> Result<Manifest> {
    let mut manifest = match &cli.manifest {
        Some(path) => Manifest::load(path).map_err(|e| anyhow::anyhow!("{path:?}: {e}"))?,
        None => Manifest::default(),
    };

    if let Some(root) = &cli.root {
        manifest = manifest.with_root(root);
    }

    manifest.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(manifest)
}

async fn run(cli: Cli) -> Result<()> {
    let manifest = resolve_manifest(&cli)?;

    if cli.print_manifest {
        print!("{}", manifest.to_toml().map_err(|e| anyhow::anyhow!(e))?);
        return Ok(());
    }

    let downloader = Downloader::new().map_err(|e| anyhow::anyhow!(e))?;
    let mut console = ConsoleProgress::stdout();

    let report = commands::fetch::run(&manifest, &downloader, &mut console)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    log::info!(
        "Fetched {} file(s), {} bytes in total",
        report.files,
        report.bytes
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
