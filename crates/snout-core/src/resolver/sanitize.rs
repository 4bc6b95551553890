//! Input sanitization: strips entity/escape noise and wrapping characters.

use regex::Regex;
use std::sync::LazyLock;

/// Entity and escape sequences decoded by [`sanitize`], applied in order.
static ESCAPE_REPLACEMENTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)&amp;", "&"),
        (r"(?i)&quot;", "\""),
        (r"(?i)&#39;", "'"),
        (r"(?i)&lt;", "<"),
        (r"(?i)&gt;", ">"),
        (r"(?i)\\u0026", "&"),
        (r"(?i)\\u003d", "="),
        (r"(?i)\\u002f", "/"),
        (r"\\/", "/"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("static escape pattern"),
            replacement,
        )
    })
    .collect()
});

const QUOTE_CHARS: [char; 3] = ['"', '\'', '`'];

/// Decodes the common HTML entities and JSON unicode escapes found in pasted
/// snippets, un-escapes `\/`, trims whitespace, then strips surrounding quotes.
///
/// Never fails; the result may be empty.
pub fn sanitize(raw: &str) -> String {
    let mut value = raw.to_string();
    for (pattern, replacement) in ESCAPE_REPLACEMENTS.iter() {
        if pattern.is_match(&value) {
            value = pattern.replace_all(&value, *replacement).into_owned();
        }
    }
    value.trim().trim_matches(&QUOTE_CHARS[..]).to_string()
}

/// [`sanitize`] plus removal of the brackets, quotes and trailing punctuation
/// that usually surround a URL embedded in prose or markup.
pub fn normalize_token(value: &str) -> String {
    let sanitized = sanitize(value);
    sanitized
        .trim_start_matches(is_leading_wrapper)
        .trim_end_matches(is_trailing_wrapper)
        .to_string()
}

fn is_leading_wrapper(c: char) -> bool {
    matches!(c, '"' | '\'' | '`' | '(' | '[' | '{' | '<') || c.is_whitespace()
}

fn is_trailing_wrapper(c: char) -> bool {
    matches!(
        c,
        '>' | '"' | '\'' | '`' | ')' | ']' | '}' | '.' | ',' | ';' | '!' | '?'
    ) || c.is_whitespace()
}
