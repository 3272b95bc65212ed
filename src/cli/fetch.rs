//! One-shot fetch command.
//!
//! Fetches a single page, rewrites it and writes the result to stdout or a
//! file, without starting the server.

use crate::{config::ProxyConfig, fetch::PageFetcher, log, rewrite};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Fetch `url`, rewrite it and write the rewritten HTML to `output` or stdout.
pub fn run_fetch(config: &ProxyConfig, url: &str, output: Option<&Path>) -> Result<()> {
    let fetcher = PageFetcher::new(&config.fetch)?;
    let html = fetcher
        .fetch(url)
        .with_context(|| format!("failed to fetch {url}"))?;

    let rewritten = rewrite::rewrite_document(&html);

    match output {
        Some(path) => {
            fs::write(path, &rewritten.html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !rewritten.title.is_empty() {
                log!("fetch"; "{}", rewritten.title);
            }
            log!("fetch"; "saved {}", path.display());
        }
        // Keep stdout clean for piping: the document only
        None => println!("{}", rewritten.html),
    }

    Ok(())
}
