//! Canonicalization for hosts whose page URLs have a known direct-file form.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

use super::decode::percent_decode_strict;
use super::parse::HttpUrl;

static FILE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/wiki/Special:FilePath/(.+)$").expect("static file path pattern")
});
static FILE_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/wiki/File:(.+)$").expect("static file page pattern"));
/// Component-style encode set that leaves `/` literal.
const TITLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'/');

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Rewrites Wikimedia/Wikipedia file pages (`/wiki/File:<title>`) and file
/// paths to the direct `/wiki/Special:FilePath/<title>` form.
///
/// Any other URL is returned unchanged.
pub fn normalize_known_host(url: HttpUrl) -> HttpUrl {
    if !is_wiki_family_host(url.host()) {
        return url;
    }

    let Some(decoded_path) = percent_decode_strict(url.path()) else {
        return url;
    };
    let title = FILE_PATH_RE
        .captures(&decoded_path)
        .or_else(|| FILE_PAGE_RE.captures(&decoded_path))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    if title.is_empty() {
        return url;
    }

    let title = WHITESPACE_RE.replace_all(title, "_");
    // Keep only the origin.
    let mut rebuilt = url.clone().into_url();
    let _ = rebuilt.set_username("");
    let _ = rebuilt.set_password(None);
    rebuilt.set_path(&format!("/wiki/Special:FilePath/{}", encode_title(&title)));
    rebuilt.set_query(None);
    rebuilt.set_fragment(None);

    match HttpUrl::new(rebuilt) {
        Some(normalized) => {
            tracing::trace!(from = %url, to = %normalized, "normalized wiki file URL");
            normalized
        }
        None => url,
    }
}

fn is_wiki_family_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "commons.wikimedia.org"
        || host.ends_with(".wikimedia.org")
        || host.ends_with(".wikipedia.org")
}

fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, TITLE).to_string()
}
