//! Image URL resolution.
//!
//! Turns an arbitrary pasted string (direct link, search-engine redirect,
//! HTML/Markdown/JSON snippet, CDN URL with nested encoded parameters,
//! `srcset`, Wikimedia file page) into the single best absolute http(s) URL
//! to fetch. Pure and synchronous: no I/O, no state shared between calls.
//!
//! Pipeline: sanitize -> candidate extraction -> parameter decoding ->
//! wrapper unwrapping -> known-host normalization -> image-likeness ranking.

mod candidates;
mod decode;
mod extract;
mod image_like;
mod known_host;
mod parse;
mod sanitize;
mod wrapper;

use serde::{Deserialize, Serialize};

use crate::validate::ErrorKind;

pub use candidates::CandidateSet;
pub use decode::{expand_param_candidates, percent_decode_strict};
pub use extract::{extract_inline_candidates, split_srcset};
pub use image_like::{has_image_extension, looks_like_image};
pub use known_host::normalize_known_host;
pub use parse::{ensure_scheme, parse_http_url, HttpUrl};
pub use sanitize::{normalize_token, sanitize};
pub use wrapper::{Unwrapped, WrapperResolver};

/// Maximum wrapper nesting followed below the top-level candidate.
pub const DEFAULT_MAX_DEPTH: usize = 4;
/// Maximum candidates produced by any single extraction step.
pub const DEFAULT_MAX_CANDIDATES: usize = 48;

/// Work bounds for one resolution. Both caps together guarantee termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverLimits {
    pub max_depth: usize,
    pub max_candidates: usize,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUrl {
    /// Normalized absolute http(s) URL.
    pub url: String,
    /// False only when the input already was a clean URL that needed no
    /// unwrapping or normalization.
    pub extracted_from_wrapper: bool,
}

/// Flat report of a resolution, as printed by `snout resolve --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedImageUrl {
    pub normalized_url: Option<String>,
    pub ok: bool,
    pub error_kind: Option<ErrorKind>,
    pub extracted_from_wrapper: bool,
}

impl From<Result<ResolvedUrl, ErrorKind>> for PreparedImageUrl {
    fn from(result: Result<ResolvedUrl, ErrorKind>) -> Self {
        match result {
            Ok(resolved) => Self {
                normalized_url: Some(resolved.url),
                ok: true,
                error_kind: None,
                extracted_from_wrapper: resolved.extracted_from_wrapper,
            },
            Err(kind) => Self {
                normalized_url: None,
                ok: false,
                error_kind: Some(kind),
                extracted_from_wrapper: false,
            },
        }
    }
}

/// Resolver with fixed limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlResolver {
    limits: ResolverLimits,
}

impl UrlResolver {
    pub fn new(limits: ResolverLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ResolverLimits {
        self.limits
    }

    /// Resolves `raw_input` to the best image URL it denotes.
    ///
    /// Candidates are tried in priority order; the first whose resolved URL
    /// looks like an image wins. If none does, the first parseable URL is
    /// returned anyway, since many image endpoints carry no extension.
    /// Fails with [`ErrorKind::InvalidUrl`] only when nothing parses.
    pub fn prepare(&self, raw_input: &str) -> Result<ResolvedUrl, ErrorKind> {
        let cleaned = sanitize(raw_input);
        if cleaned.is_empty() {
            return Err(ErrorKind::InvalidUrl);
        }

        let mut fallback: Option<ResolvedUrl> = None;
        for candidate in self.input_candidates(&cleaned) {
            let unwrapped = WrapperResolver::new(&self.limits).resolve(&candidate);
            let Some(resolved) = unwrapped.url else {
                continue;
            };

            let normalized = normalize_known_host(resolved.clone());
            let extracted_from_wrapper = unwrapped.extracted_from_wrapper
                || candidate != cleaned
                || normalized != resolved;

            if looks_like_image(&normalized) {
                tracing::debug!(url = %normalized, extracted_from_wrapper, "resolved image URL");
                return Ok(ResolvedUrl {
                    url: normalized.as_str().to_string(),
                    extracted_from_wrapper,
                });
            }

            if fallback.is_none() {
                fallback = Some(ResolvedUrl {
                    url: normalized.as_str().to_string(),
                    extracted_from_wrapper,
                });
            }
        }

        match fallback {
            Some(resolved) => {
                tracing::debug!(url = %resolved.url, "no image-like candidate, using first parseable URL");
                Ok(resolved)
            }
            None => {
                tracing::debug!("no parseable URL in input");
                Err(ErrorKind::InvalidUrl)
            }
        }
    }

    /// The input itself, its inline candidates, then every decoded expansion
    /// of those, capped at `max_candidates`.
    fn input_candidates(&self, cleaned: &str) -> Vec<String> {
        let cap = self.limits.max_candidates;
        let mut candidates = CandidateSet::new(cap);

        candidates.push(normalize_token(cleaned));
        for candidate in extract_inline_candidates(cleaned, cap) {
            candidates.push(normalize_token(&candidate));
        }

        let direct: Vec<String> = candidates.iter().cloned().collect();
        for candidate in direct {
            for expanded in expand_param_candidates(&candidate, cap) {
                candidates.push(normalize_token(&expanded));
            }
        }

        candidates.into_vec()
    }
}

/// [`UrlResolver::prepare`] with the default limits.
pub fn prepare_image_url(raw_input: &str) -> Result<ResolvedUrl, ErrorKind> {
    UrlResolver::default().prepare(raw_input)
}
