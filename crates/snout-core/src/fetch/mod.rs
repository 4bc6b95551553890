//! Fetching the bytes behind a resolved image URL.
//!
//! This is the caller-side network step; the resolver never performs I/O.

mod curl_fetcher;

pub use curl_fetcher::CurlFetcher;

use crate::validate::ErrorKind;

/// Body and metadata of a fetched image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` of the final response, if sent.
    pub content_type: Option<String>,
    /// URL after redirects.
    pub effective_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, TLS, timeout).
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),
    /// Non-2xx final response.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body exceeded the configured byte cap.
    #[error("response exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    /// 2xx response without a body.
    #[error("empty response body")]
    Empty,
}

impl FetchError {
    /// User-facing error kind for this failure.
    ///
    /// Hosts that refuse direct access (401/403/451) are reported like a
    /// cross-origin block; everything else is a load failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Http(401 | 403 | 451) => ErrorKind::CorsBlocked,
            _ => ErrorKind::ImageLoadFailed,
        }
    }
}

/// Retrieves image bytes for a URL.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

impl<F: ImageFetcher + ?Sized> ImageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        (**self).fetch(url)
    }
}
