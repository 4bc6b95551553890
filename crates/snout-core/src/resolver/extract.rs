//! Inline candidate extraction from pasted text, markup and JSON.
//!
//! Each rule scans the sanitized text independently; matches are appended in
//! rule order so earlier (more structural) rules win ties downstream.

use regex::Regex;
use std::sync::LazyLock;

use super::candidates::CandidateSet;
use super::sanitize::{normalize_token, sanitize};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static extraction pattern")
}

static HTML_ATTR_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)\b(?:src|href|content|data-src|data-original|data-image)\s*=\s*["']([^"']+)["']"#)
});
static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)url\(([^)]+)\)"));
static JSON_URL_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)"(?:url|src|image|image_url|imageUrl|thumbnail|thumbnailUrl)"\s*:\s*"([^"]+)""#)
});
static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\[[^\[\]]*\]\(([^)]+)\)"));
static SRCSET_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)\bsrcset\s*=\s*["']([^"']+)["']"#));
static HTTP_URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)https?://[^\s"'<>]+"#));
static WWW_URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)\bwww\.[^\s"'<>]+"#));

/// Extracts URL-like substrings from `text`.
///
/// The sanitized text itself is always the first candidate. Results are
/// token-normalized, de-duplicated and capped at `max_candidates`.
pub fn extract_inline_candidates(text: &str, max_candidates: usize) -> Vec<String> {
    let source = sanitize(text);
    if source.is_empty() {
        return Vec::new();
    }

    let mut candidates = CandidateSet::new(max_candidates);
    let mut push = |candidate: &str| {
        candidates.push(normalize_token(candidate));
    };

    push(&source);
    for value in captures(&HTML_ATTR_URL_RE, &source) {
        push(value);
    }
    for value in captures(&CSS_URL_RE, &source) {
        push(value);
    }
    for value in captures(&JSON_URL_FIELD_RE, &source) {
        push(value);
    }
    for target in captures(&MARKDOWN_LINK_RE, &source) {
        // Drop an optional link title: `[alt](url "title")`.
        push(first_token(target).unwrap_or(target));
    }
    for srcset in captures(&SRCSET_VALUE_RE, &source) {
        for url in split_srcset(srcset) {
            push(&url);
        }
    }
    for m in HTTP_URL_IN_TEXT_RE.find_iter(&source) {
        push(m.as_str());
    }
    for m in WWW_URL_IN_TEXT_RE.find_iter(&source) {
        push(m.as_str());
    }

    candidates.into_vec()
}

/// Splits a `srcset` value into its URLs, dropping width/density descriptors.
pub fn split_srcset(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .map(|entry| normalize_token(first_token(entry).unwrap_or("")))
        .filter(|url| !url.is_empty())
        .collect()
}

/// Non-empty first capture group of every match.
fn captures<'t>(pattern: &Regex, haystack: &'t str) -> Vec<&'t str> {
    pattern
        .captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .collect()
}

fn first_token(value: &str) -> Option<&str> {
    value.split_whitespace().next()
}
