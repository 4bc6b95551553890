//! Structural parsing of candidates into absolute http(s) URLs.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

use super::extract::extract_inline_candidates;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z\d+.-]*:").expect("static scheme pattern"));
static WWW_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^www\.").expect("static www pattern"));
static BARE_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(?:[/:?#]|$)").expect("static host pattern")
});

/// An absolute URL whose scheme is guaranteed to be `http` or `https`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpUrl(Url);

impl HttpUrl {
    /// Wraps `url` if its scheme is http or https.
    pub fn new(url: Url) -> Option<Self> {
        matches!(url.scheme(), "http" | "https").then_some(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Canonical serialization; used for equality and the visited set.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host as serialized in the URL, or "" for hostless URLs.
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or("")
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Fragment including its leading `#`, or "" when absent or empty.
    pub fn hash(&self) -> String {
        match self.0.fragment() {
            Some(f) if !f.is_empty() => format!("#{f}"),
            _ => String::new(),
        }
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adds `https:` to scheme-less candidates that look like a host.
///
/// - `//host/...` becomes `https://host/...`
/// - anything already shaped like `scheme:` is left alone
/// - `www.` prefixes and bare `host.tld[/path]` get `https://`
pub fn ensure_scheme(value: &str) -> String {
    if value.starts_with("//") {
        return format!("https:{value}");
    }
    if SCHEME_RE.is_match(value) {
        return value.to_string();
    }
    if WWW_PREFIX_RE.is_match(value) || BARE_HOST_RE.is_match(value) {
        return format!("https://{value}");
    }
    value.to_string()
}

/// Parses the first sub-candidate of `candidate` that is an absolute http(s) URL.
///
/// `candidate` may itself be a snippet, so inline extraction runs again first.
pub fn parse_http_url(candidate: &str, max_candidates: usize) -> Option<HttpUrl> {
    extract_inline_candidates(candidate, max_candidates)
        .iter()
        .find_map(|sub| Url::parse(&ensure_scheme(sub)).ok().and_then(HttpUrl::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: usize = 48;

    #[test]
    fn ensure_scheme_variants() {
        assert_eq!(ensure_scheme("//cdn.example/a.png"), "https://cdn.example/a.png");
        assert_eq!(ensure_scheme("http://a.example"), "http://a.example");
        assert_eq!(ensure_scheme("ftp://a.example"), "ftp://a.example");
        assert_eq!(ensure_scheme("WWW.a.example/x"), "https://WWW.a.example/x");
        assert_eq!(ensure_scheme("a.example/cat.jpg"), "https://a.example/cat.jpg");
        assert_eq!(ensure_scheme("sub.a.example"), "https://sub.a.example");
        assert_eq!(ensure_scheme("/relative/path"), "/relative/path");
        assert_eq!(ensure_scheme("cat"), "cat");
    }

    #[test]
    fn parses_plain_and_inferred_urls() {
        let url = parse_http_url("https://a.example/cat.jpg", CAP).unwrap();
        assert_eq!(url.as_str(), "https://a.example/cat.jpg");
        assert_eq!(url.host(), "a.example");

        let url = parse_http_url("www.a.example/dog.png", CAP).unwrap();
        assert_eq!(url.as_str(), "https://www.a.example/dog.png");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(parse_http_url("ftp://a.example/cat.jpg", CAP).is_none());
        assert!(parse_http_url("data:image/png;base64,AAAA", CAP).is_none());
        assert!(parse_http_url("javascript:alert(1)", CAP).is_none());
    }

    #[test]
    fn rejects_non_urls() {
        assert!(parse_http_url("not a url at all", CAP).is_none());
        assert!(parse_http_url("/only/a/path.png", CAP).is_none());
        assert!(parse_http_url("", CAP).is_none());
    }

    #[test]
    fn finds_url_inside_snippet() {
        let url = parse_http_url(r#"<a href="https://a.example/x">x</a>"#, CAP).unwrap();
        assert_eq!(url.as_str(), "https://a.example/x");
    }

    #[test]
    fn hash_keeps_leading_marker() {
        let url = parse_http_url("https://a.example/#u=1", CAP).unwrap();
        assert_eq!(url.hash(), "#u=1");
        let url = parse_http_url("https://a.example/#", CAP).unwrap();
        assert_eq!(url.hash(), "");
    }
}
