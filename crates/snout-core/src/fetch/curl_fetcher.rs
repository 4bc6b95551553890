//! libcurl-backed [`ImageFetcher`].

use std::time::Duration;

use super::{FetchError, FetchedImage, ImageFetcher};
use crate::config::FetchConfig;

/// Blocking GET via the curl crate. Follows a bounded number of redirects.
/// Call from `spawn_blocking` when used from async code.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    config: FetchConfig,
}

impl CurlFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl ImageFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let limit = self.config.max_bytes;
        let mut body: Vec<u8> = Vec::new();
        let mut over_limit = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.config.timeout_secs))?;
        easy.useragent(&self.config.user_agent)?;
        let mut headers = curl::easy::List::new();
        headers.append("Accept: image/avif,image/webp,image/png,image/jpeg,image/*;q=0.8")?;
        easy.http_headers(headers)?;

        let result = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if body.len() as u64 + data.len() as u64 > limit {
                    over_limit = true;
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };

        if over_limit {
            tracing::debug!(url, limit, "image fetch aborted at byte cap");
            return Err(FetchError::TooLarge { limit });
        }
        result?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::debug!(url, code, "image fetch returned non-success status");
            return Err(FetchError::Http(code));
        }
        if body.is_empty() {
            return Err(FetchError::Empty);
        }

        let content_type = easy.content_type()?.map(str::to_string);
        let effective_url = easy.effective_url()?.map(str::to_string);
        tracing::debug!(
            url,
            bytes = body.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            "fetched image"
        );

        Ok(FetchedImage {
            bytes: body,
            content_type,
            effective_url,
        })
    }
}
