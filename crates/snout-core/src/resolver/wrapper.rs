//! Recursive unwrapping of redirect/viewer URLs that carry the real image URL
//! in their query string, fragment or path.
//!
//! Search engines and image aggregators wrap the target several layers deep
//! (search result -> CDN redirect -> image). Each layer is parsed, its nested
//! candidates are gathered in priority order and resolved one level deeper.
//! Recursion is bounded by `max_depth`; `visited` stops self-referential loops.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::candidates::CandidateSet;
use super::decode::expand_param_candidates;
use super::extract::extract_inline_candidates;
use super::image_like::{has_image_extension, looks_like_image};
use super::parse::{parse_http_url, HttpUrl};
use super::ResolverLimits;

/// Query keys whose value is expected to be the wrapped URL itself.
const WRAPPER_PARAM_KEYS: [&str; 21] = [
    "mediaurl",
    "imgurl",
    "imageurl",
    "image_url",
    "image",
    "img",
    "url",
    "u",
    "r",
    "redirect",
    "redirect_url",
    "redirecturl",
    "target",
    "destination",
    "dest",
    "src",
    "source",
    "media",
    "photo",
    "picture",
    "original",
];

static EMBEDDED_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.|https?%3A%2F%2F)").expect("static embedded url pattern")
});

/// Outcome of one resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    pub url: Option<HttpUrl>,
    /// True when the URL came from inside a wrapper rather than the candidate itself.
    pub extracted_from_wrapper: bool,
}

impl Unwrapped {
    fn none() -> Self {
        Self {
            url: None,
            extracted_from_wrapper: false,
        }
    }

    fn direct(url: HttpUrl) -> Self {
        Self {
            url: Some(url),
            extracted_from_wrapper: false,
        }
    }

    fn nested(url: HttpUrl) -> Self {
        Self {
            url: Some(url),
            extracted_from_wrapper: true,
        }
    }
}

/// One top-level unwrapping attempt. Owns the visited set for that attempt.
pub struct WrapperResolver<'a> {
    limits: &'a ResolverLimits,
    visited: HashSet<String>,
}

impl<'a> WrapperResolver<'a> {
    pub fn new(limits: &'a ResolverLimits) -> Self {
        Self {
            limits,
            visited: HashSet::new(),
        }
    }

    /// Resolves `candidate` starting at depth 0.
    pub fn resolve(&mut self, candidate: &str) -> Unwrapped {
        self.resolve_at(candidate, 0)
    }

    fn resolve_at(&mut self, candidate: &str, depth: usize) -> Unwrapped {
        if depth > self.limits.max_depth {
            tracing::trace!(depth, "wrapper depth exhausted");
            return Unwrapped::none();
        }

        let Some(parsed) = parse_http_url(candidate, self.limits.max_candidates) else {
            return Unwrapped::none();
        };

        let canonical = parsed.as_str().to_string();
        if !self.visited.insert(canonical.clone()) {
            return Unwrapped::direct(parsed);
        }

        for nested_candidate in self.nested_candidates(&parsed) {
            let resolved = self.resolve_at(&nested_candidate, depth + 1);
            let Some(nested) = resolved.url else {
                continue;
            };
            if nested.as_str() == canonical {
                continue;
            }

            let host_changed = nested.host() != parsed.host();
            if host_changed || looks_like_image(&nested) || resolved.extracted_from_wrapper {
                tracing::trace!(depth, wrapper = %parsed, nested = %nested, "unwrapped nested URL");
                return Unwrapped::nested(nested);
            }
        }

        Unwrapped::direct(parsed)
    }

    /// Nested candidates of `url`: allowlisted wrapper parameters first, then
    /// any parameter that embeds a URL or image filename, then inline
    /// candidates from the fragment and the path.
    fn nested_candidates(&self, url: &HttpUrl) -> Vec<String> {
        let cap = self.limits.max_candidates;
        let mut seen = CandidateSet::new(cap);
        let mut prioritized = Vec::new();
        let mut fallback = Vec::new();

        let mut push = |bucket: &mut Vec<String>, value: &str| {
            for candidate in expand_param_candidates(value, cap) {
                if seen.is_full() {
                    return;
                }
                if seen.push(candidate.clone()) {
                    bucket.push(candidate);
                }
            }
        };

        for (key, value) in search_like_params(url) {
            if WRAPPER_PARAM_KEYS.contains(&key.to_lowercase().as_str()) {
                push(&mut prioritized, &value);
                continue;
            }
            if EMBEDDED_URL_RE.is_match(&value) || has_image_extension(&value) {
                push(&mut fallback, &value);
            }
        }

        for candidate in extract_inline_candidates(&url.hash(), cap) {
            push(&mut fallback, &candidate);
        }
        for candidate in extract_inline_candidates(url.path(), cap) {
            push(&mut fallback, &candidate);
        }

        prioritized.extend(fallback);
        prioritized
    }
}

/// Key/value pairs from the query string, followed by those of the fragment
/// when the fragment looks like a query string.
fn search_like_params(url: &HttpUrl) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .as_url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let hash = url.hash();
    let fragment = hash.strip_prefix('#').unwrap_or(&hash);
    let fragment_query = fragment.strip_prefix('?').unwrap_or(fragment);
    if fragment_query.contains(['=', '&']) {
        params.extend(
            url::form_urlencoded::parse(fragment_query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    params
}
