//! User-facing validation: error taxonomy, upload checks and URL checks.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::resolver::prepare_image_url;

/// Maximum accepted upload size in MiB.
pub const MAX_UPLOAD_MB: u64 = 10;
/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;
/// File-picker filter matching [`ACCEPTED_MIME_TYPES`].
pub const ACCEPTED_FILE_EXTENSIONS: &str = ".jpg,.jpeg,.png,.webp";
/// MIME types accepted for direct uploads.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Every terminal, user-visible failure. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Please upload JPG, PNG, or WEBP images only.")]
    InvalidType,
    #[error("Image exceeds 10MB. Choose a smaller file.")]
    FileTooLarge,
    #[error("Enter a valid absolute image URL (http/https).")]
    InvalidUrl,
    #[error("This URL blocks browser access (CORS). Upload the image directly instead.")]
    CorsBlocked,
    #[error("Could not load image from this source. Try another image.")]
    ImageLoadFailed,
    #[error("Model prediction failed. Refresh and try again.")]
    ClassificationFailed,
}

impl ErrorKind {
    /// Stable snake_case code, e.g. `invalid_url`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidType => "invalid_type",
            ErrorKind::FileTooLarge => "file_too_large",
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::CorsBlocked => "cors_blocked",
            ErrorKind::ImageLoadFailed => "image_load_failed",
            ErrorKind::ClassificationFailed => "classification_failed",
        }
    }
}

pub type ValidationResult = Result<(), ErrorKind>;

/// What is known about an uploaded file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Checks MIME type, then size against [`MAX_UPLOAD_BYTES`].
pub fn validate_file(file: &FileMeta) -> ValidationResult {
    validate_file_with_limit(file, MAX_UPLOAD_BYTES)
}

/// Like [`validate_file`] with an explicit byte cap.
pub fn validate_file_with_limit(file: &FileMeta, max_bytes: u64) -> ValidationResult {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(ErrorKind::InvalidType);
    }
    if file.size_bytes > max_bytes {
        return Err(ErrorKind::FileTooLarge);
    }
    Ok(())
}

/// Ok if `url` resolves to some absolute http(s) URL.
pub fn validate_image_url(url: &str) -> ValidationResult {
    prepare_image_url(url).map(|_| ())
}

/// Guesses an image MIME type from a file extension. Unknown extensions
/// yield `application/octet-stream`, which [`validate_file`] rejects.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(mime: &str, size: u64) -> FileMeta {
        FileMeta {
            mime_type: mime.to_string(),
            size_bytes: size,
        }
    }

    #[test]
    fn accepts_supported_types_within_limit() {
        for mime in ACCEPTED_MIME_TYPES {
            assert_eq!(validate_file(&meta(mime, 1000)), Ok(()));
        }
        assert_eq!(validate_file(&meta("image/png", MAX_UPLOAD_BYTES)), Ok(()));
    }

    #[test]
    fn rejects_unsupported_type() {
        assert_eq!(
            validate_file(&meta("image/gif", 1000)),
            Err(ErrorKind::InvalidType)
        );
        assert_eq!(validate_file(&meta("", 0)), Err(ErrorKind::InvalidType));
    }

    #[test]
    fn type_is_checked_before_size() {
        assert_eq!(
            validate_file(&meta("text/plain", MAX_UPLOAD_BYTES + 1)),
            Err(ErrorKind::InvalidType)
        );
    }

    #[test]
    fn rejects_oversized_file() {
        assert_eq!(
            validate_file(&meta("image/jpeg", MAX_UPLOAD_BYTES + 1)),
            Err(ErrorKind::FileTooLarge)
        );
        assert_eq!(
            validate_file_with_limit(&meta("image/jpeg", 2048), 1024),
            Err(ErrorKind::FileTooLarge)
        );
    }

    #[test]
    fn validate_image_url_wraps_resolver() {
        assert_eq!(validate_image_url("https://example.com/cat.jpg"), Ok(()));
        assert_eq!(validate_image_url("nothing here"), Err(ErrorKind::InvalidUrl));
    }

    #[test]
    fn error_codes_match_serde_names() {
        for kind in [
            ErrorKind::InvalidType,
            ErrorKind::FileTooLarge,
            ErrorKind::InvalidUrl,
            ErrorKind::CorsBlocked,
            ErrorKind::ImageLoadFailed,
            ErrorKind::ClassificationFailed,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn display_is_user_message() {
        assert_eq!(
            ErrorKind::InvalidUrl.to_string(),
            "Enter a valid absolute image URL (http/https)."
        );
    }

    #[test]
    fn mime_guess() {
        assert_eq!(mime_from_path(Path::new("a/Cat.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("dog.webp")), "image/webp");
        assert_eq!(mime_from_path(Path::new("anim.gif")), "image/gif");
        assert_eq!(mime_from_path(Path::new("README")), "application/octet-stream");
    }
}
