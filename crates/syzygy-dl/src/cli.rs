//! Command-line surface and the immutable per-run configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://tablebase.lichess.ovh/tables/standard/3-4-5-wdl/";
const DEFAULT_DEST_DIR: &str = "syzygy";
const DEFAULT_CHUNK_SIZE: usize = 1 << 20;
const DEFAULT_USER_AGENT: &str = concat!(
    "syzygy-dl/",
    env!("CARGO_PKG_VERSION"),
    " (+https://lichess.org)"
);

#[derive(Debug, Parser)]
#[command(
    name = "syzygy-dl",
    about = "Download small Syzygy WDL tablebases from a mirror index"
)]
pub struct Cli {
    /// Mirror directory listing to fetch tables from.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Directory the tables are written into (created if absent).
    #[arg(long, default_value = DEFAULT_DEST_DIR)]
    pub dest_dir: PathBuf,

    /// Write-buffer capacity in bytes for each transfer.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Replace tables that already exist instead of skipping them.
    #[arg(long)]
    pub overwrite: bool,

    /// List the selected tables without downloading anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Piece counts to download.
    #[arg(long, value_delimiter = ',', default_values_t = [3u32, 4])]
    pub pieces: Vec<u32>,

    /// User-Agent header sent with every request.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

/// Read once at startup, immutable for the whole run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: Url,
    pub dest_dir: PathBuf,
    pub chunk_size: usize,
    pub overwrite: bool,
    pub dry_run: bool,
    pub accepted: BTreeSet<u32>,
    pub user_agent: String,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            base_url: cli.base_url,
            dest_dir: cli.dest_dir,
            chunk_size: cli.chunk_size,
            overwrite: cli.overwrite,
            dry_run: cli.dry_run,
            accepted: cli.pieces.into_iter().collect(),
            user_agent: cli.user_agent,
        }
    }
}
