//! `snout check-file <path>` – upload validation for a local file.

use anyhow::{Context, Result};
use snout_core::config::SnoutConfig;
use snout_core::validate::{
    mime_from_path, validate_file_with_limit, ErrorKind, FileMeta, ACCEPTED_FILE_EXTENSIONS,
};
use std::path::Path;

pub async fn run_check_file(cfg: &SnoutConfig, path: &Path) -> Result<()> {
    let size_bytes = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    let meta = FileMeta {
        mime_type: mime_from_path(path).to_string(),
        size_bytes,
    };

    match validate_file_with_limit(&meta, cfg.max_upload_bytes) {
        Ok(()) => {}
        Err(ErrorKind::InvalidType) => anyhow::bail!(
            "{}: {} (accepted: {})",
            path.display(),
            ErrorKind::InvalidType,
            ACCEPTED_FILE_EXTENSIONS
        ),
        Err(kind) => anyhow::bail!("{}: {}", path.display(), kind),
    }
    println!(
        "{}: ok ({}, {} bytes)",
        path.display(),
        meta.mime_type,
        meta.size_bytes
    );
    Ok(())
}
