//! `snout fetch <input> --output <path>` – resolve, then download the image.

use anyhow::{Context, Result};
use snout_core::config::SnoutConfig;
use snout_core::fetch::{CurlFetcher, ImageFetcher};
use snout_core::resolver::UrlResolver;
use std::path::Path;

pub async fn run_fetch(cfg: &SnoutConfig, input: &str, output: &Path) -> Result<()> {
    let resolved = UrlResolver::new(cfg.resolver_limits()).prepare(input)?;
    tracing::info!(
        url = %resolved.url,
        extracted_from_wrapper = resolved.extracted_from_wrapper,
        "fetching resolved image"
    );

    let fetcher = CurlFetcher::new(cfg.fetch_config());
    tracing::debug!(
        timeout_secs = fetcher.config().timeout_secs,
        max_bytes = fetcher.config().max_bytes,
        "fetch settings"
    );
    let image = tokio::task::spawn_blocking({
        let url = resolved.url.clone();
        move || fetcher.fetch(&url)
    })
    .await
    .context("fetch task join")?
    .map_err(|e| anyhow::anyhow!("{} ({})", e.kind(), e))?;

    std::fs::write(output, &image.bytes)
        .with_context(|| format!("write {}", output.display()))?;
    println!(
        "saved {} bytes ({}) from {} to {}",
        image.bytes.len(),
        image.content_type.as_deref().unwrap_or("unknown type"),
        resolved.url,
        output.display()
    );
    Ok(())
}
