//! Heuristic "does this URL point at an image" check.

use regex::Regex;
use std::sync::LazyLock;

use super::parse::HttpUrl;

static IMAGE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(avif|bmp|gif|heic|heif|jfif|jpe?g|png|svg|webp)(?:$|[/?#])")
        .expect("static extension pattern")
});

const IMAGE_FORMAT_HINTS: [&str; 11] = [
    "avif", "bmp", "gif", "heic", "heif", "jfif", "jpg", "jpeg", "png", "svg", "webp",
];

/// Query parameters CDNs commonly use to select an output format.
const FORMAT_PARAM_KEYS: [&str; 5] = ["fm", "format", "ext", "mime", "type"];

/// True if `text` contains an image file extension followed by the end of the
/// string or a path/query/fragment delimiter.
pub fn has_image_extension(text: &str) -> bool {
    IMAGE_EXTENSION_RE.is_match(text)
}

/// True if the path has an image extension, or a format-selecting query
/// parameter (first occurrence of each key) names an image format.
///
/// A `false` answer is not proof the URL is not an image.
pub fn looks_like_image(url: &HttpUrl) -> bool {
    if has_image_extension(url.path()) {
        return true;
    }

    FORMAT_PARAM_KEYS.iter().any(|key| {
        url.as_url()
            .query_pairs()
            .find(|(k, _)| k == *key)
            .map(|(_, value)| {
                let value = value.to_lowercase();
                IMAGE_FORMAT_HINTS.iter().any(|hint| value.contains(hint))
            })
            .unwrap_or(false)
    })
}
