//! Sequential run driver: fetch, scan, classify, then download in sorted
//! order. One request in flight at a time; the first failure aborts the
//! whole batch.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;

use anyhow::Context;
use syzygy_fetch::{FetchOptions, Fetcher, HttpClient, ReqwestClient};
use syzygy_index::{TABLE_SUFFIX, TableEntry, classify_tables, collect_table_links};

use crate::cli::RunConfig;

/// Runs the whole pipeline and returns the process exit code. `Err` means a
/// fatal transfer or filesystem failure; `Ok(1)` is the clean "nothing to
/// do" outcome for an index with no accepted tables.
pub async fn run(config: RunConfig) -> anyhow::Result<u8> {
    let client = ReqwestClient::new(&config.user_agent).context("failed to build HTTP client")?;
    run_with_client(config, client).await
}

pub async fn run_with_client<C: HttpClient>(config: RunConfig, client: C) -> anyhow::Result<u8> {
    let options = FetchOptions {
        chunk_size: config.chunk_size,
        overwrite: config.overwrite,
    };
    let fetcher = Fetcher::new(client, config.base_url.clone()).with_options(options);

    let html = fetcher
        .fetch_index()
        .await
        .context("failed to fetch the table index")?;
    let names = collect_table_links(&html, TABLE_SUFFIX);
    let tables = classify_tables(names, &config.accepted);
    tracing::debug!(accepted = tables.len(), "classified index");

    if tables.is_empty() {
        eprintln!(
            "No matching tables found in the index at {}",
            config.base_url
        );
        return Ok(1);
    }

    println!("Destination: {}", config.dest_dir.display());
    println!(
        "Found {} tables at {}",
        found_summary(&config.accepted, &tables),
        config.base_url
    );

    tokio::fs::create_dir_all(&config.dest_dir)
        .await
        .with_context(|| format!("failed to create {}", config.dest_dir.display()))?;

    if config.dry_run {
        for entry in &tables {
            println!("{}-man {}", entry.piece_count, entry.name);
        }
        return Ok(0);
    }

    let total = tables.len();
    for (index, entry) in tables.iter().enumerate() {
        print!(
            "[{}/{}] {}-man {} ... ",
            index + 1,
            total,
            entry.piece_count,
            entry.name
        );
        std::io::stdout().flush().ok();
        let report = fetcher
            .download_table(entry, &config.dest_dir)
            .await
            .with_context(|| format!("failed to download {}", entry.name))?;
        println!("{}", report.summary());
    }

    println!();
    println!("All requested tables are present.");
    Ok(0)
}

/// Counts accepted entries per piece count, keeping zero-count groups so
/// the summary always names every requested count.
fn found_summary(accepted: &BTreeSet<u32>, tables: &[TableEntry]) -> String {
    let mut counts: BTreeMap<u32, usize> = accepted.iter().map(|&pieces| (pieces, 0)).collect();
    for entry in tables {
        *counts.entry(entry.piece_count).or_default() += 1;
    }
    counts
        .iter()
        .map(|(pieces, count)| format!("{count} {pieces}-man"))
        .collect::<Vec<_>>()
        .join(" and ")
}
