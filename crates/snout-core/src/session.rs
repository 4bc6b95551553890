//! End-to-end classification flow: input -> image bytes -> prediction.
//!
//! Mirrors what a front end does around the resolver: resolve the pasted URL,
//! fetch it, hand the bytes to the classifier, and map every failure onto an
//! [`ErrorKind`]. One classification may run at a time per session.

use serde::Serialize;

use crate::classify::{Classifier, ClassifyGate, Prediction};
use crate::config::SnoutConfig;
use crate::fetch::ImageFetcher;
use crate::resolver::UrlResolver;
use crate::validate::{validate_file_with_limit, ErrorKind, FileMeta, MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub prediction: Prediction,
    /// Resolved URL the image was fetched from; `None` for uploads.
    pub source_url: Option<String>,
    pub extracted_from_wrapper: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Another classification is in flight.
    #[error("a classification is already running")]
    Busy,
    #[error("{0}")]
    Rejected(#[from] ErrorKind),
}

pub struct Session<F, C> {
    fetcher: F,
    classifier: C,
    resolver: UrlResolver,
    max_upload_bytes: u64,
    gate: ClassifyGate,
}

impl<F: ImageFetcher, C: Classifier> Session<F, C> {
    pub fn new(fetcher: F, classifier: C) -> Self {
        Self {
            fetcher,
            classifier,
            resolver: UrlResolver::default(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            gate: ClassifyGate::new(),
        }
    }

    /// Session using the limits from `cfg`.
    pub fn with_config(fetcher: F, classifier: C, cfg: &SnoutConfig) -> Self {
        Self {
            resolver: UrlResolver::new(cfg.resolver_limits()),
            max_upload_bytes: cfg.max_upload_bytes,
            ..Self::new(fetcher, classifier)
        }
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Resolves `raw_input`, fetches the image and classifies it.
    pub fn classify_url(&self, raw_input: &str) -> Result<Classification, SessionError> {
        let _permit = self.gate.try_acquire().ok_or(SessionError::Busy)?;

        let resolved = self.resolver.prepare(raw_input)?;
        let image = self.fetcher.fetch(&resolved.url).map_err(|e| {
            tracing::warn!(url = %resolved.url, "image fetch failed: {}", e);
            e.kind()
        })?;
        if image.bytes.is_empty() {
            return Err(ErrorKind::ImageLoadFailed.into());
        }

        let prediction = self.run_classifier(&image.bytes)?;
        Ok(Classification {
            prediction,
            source_url: Some(resolved.url),
            extracted_from_wrapper: resolved.extracted_from_wrapper,
        })
    }

    /// Validates an uploaded file and classifies its bytes.
    pub fn classify_upload(
        &self,
        meta: &FileMeta,
        bytes: &[u8],
    ) -> Result<Classification, SessionError> {
        let _permit = self.gate.try_acquire().ok_or(SessionError::Busy)?;

        validate_file_with_limit(meta, self.max_upload_bytes)?;
        if bytes.is_empty() {
            return Err(ErrorKind::ImageLoadFailed.into());
        }

        let prediction = self.run_classifier(bytes)?;
        Ok(Classification {
            prediction,
            source_url: None,
            extracted_from_wrapper: false,
        })
    }

    fn run_classifier(&self, bytes: &[u8]) -> Result<Prediction, ErrorKind> {
        self.classifier.classify(bytes).map_err(|e| {
            tracing::warn!("classification failed: {}", e);
            ErrorKind::ClassificationFailed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifyError, Label};
    use crate::fetch::{FetchError, FetchedImage};
    use std::cell::RefCell;

    /// Records requested URLs and answers from a fixed table.
    struct StubFetcher {
        requested: RefCell<Vec<String>>,
        status: Option<u32>,
    }

    impl StubFetcher {
        fn ok() -> Self {
            Self {
                requested: RefCell::new(Vec::new()),
                status: None,
            }
        }

        fn failing(code: u32) -> Self {
            Self {
                requested: RefCell::new(Vec::new()),
                status: Some(code),
            }
        }
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            match self.status {
                Some(code) => Err(FetchError::Http(code)),
                None => Ok(FetchedImage {
                    bytes: b"\x89PNG".to_vec(),
                    content_type: Some("image/png".to_string()),
                    effective_url: Some(url.to_string()),
                }),
            }
        }
    }

    struct StubClassifier(Result<Label, ()>);

    impl Classifier for StubClassifier {
        fn classify(&self, _image: &[u8]) -> Result<Prediction, ClassifyError> {
            match self.0 {
                Ok(label) => Ok(Prediction {
                    label,
                    probability_percent: 88.8,
                }),
                Err(()) => Err(ClassifyError::Model("boom".to_string())),
            }
        }
    }

    #[test]
    fn classify_url_fetches_resolved_url() {
        let session = Session::new(StubFetcher::ok(), StubClassifier(Ok(Label::Dog)));
        let out = session
            .classify_url("https://search.example/imgres?imgurl=https%3A%2F%2Fcdn.example%2Fdog.png")
            .unwrap();
        assert_eq!(out.prediction.label, Label::Dog);
        assert_eq!(out.source_url.as_deref(), Some("https://cdn.example/dog.png"));
        assert!(out.extracted_from_wrapper);
        assert_eq!(
            session.fetcher.requested.borrow().as_slice(),
            ["https://cdn.example/dog.png".to_string()]
        );
        assert!(!session.is_busy());
    }

    #[test]
    fn invalid_input_never_fetches() {
        let session = Session::new(StubFetcher::ok(), StubClassifier(Ok(Label::Cat)));
        assert_eq!(
            session.classify_url("definitely not a link"),
            Err(SessionError::Rejected(ErrorKind::InvalidUrl))
        );
        assert!(session.fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn fetch_failures_map_to_error_kinds() {
        let session = Session::new(StubFetcher::failing(403), StubClassifier(Ok(Label::Cat)));
        assert_eq!(
            session.classify_url("https://a.example/cat.jpg"),
            Err(SessionError::Rejected(ErrorKind::CorsBlocked))
        );

        let session = Session::new(StubFetcher::failing(404), StubClassifier(Ok(Label::Cat)));
        assert_eq!(
            session.classify_url("https://a.example/cat.jpg"),
            Err(SessionError::Rejected(ErrorKind::ImageLoadFailed))
        );
    }

    #[test]
    fn classifier_failure_is_classification_failed() {
        let session = Session::new(StubFetcher::ok(), StubClassifier(Err(())));
        assert_eq!(
            session.classify_url("https://a.example/cat.jpg"),
            Err(SessionError::Rejected(ErrorKind::ClassificationFailed))
        );
        assert!(!session.is_busy());
    }

    #[test]
    fn busy_session_rejects_second_request() {
        let session = Session::new(StubFetcher::ok(), StubClassifier(Ok(Label::Cat)));
        let _held = session.gate.try_acquire().unwrap();
        assert_eq!(
            session.classify_url("https://a.example/cat.jpg"),
            Err(SessionError::Busy)
        );
        assert!(session.fetcher.requested.borrow().is_empty());
    }

    #[test]
    fn upload_is_validated_before_classifying() {
        let session = Session::new(StubFetcher::ok(), StubClassifier(Ok(Label::Cat)));
        let gif = FileMeta {
            mime_type: "image/gif".to_string(),
            size_bytes: 10,
        };
        assert_eq!(
            session.classify_upload(&gif, b"GIF89a"),
            Err(SessionError::Rejected(ErrorKind::InvalidType))
        );

        let png = FileMeta {
            mime_type: "image/png".to_string(),
            size_bytes: 4,
        };
        let out = session.classify_upload(&png, b"\x89PNG").unwrap();
        assert_eq!(out.prediction.label, Label::Cat);
        assert!(out.source_url.is_none());
    }

    #[test]
    fn upload_cap_comes_from_config() {
        let cfg = SnoutConfig {
            max_upload_bytes: 3,
            ..SnoutConfig::default()
        };
        let session =
            Session::with_config(StubFetcher::ok(), StubClassifier(Ok(Label::Cat)), &cfg);
        let png = FileMeta {
            mime_type: "image/png".to_string(),
            size_bytes: 4,
        };
        assert_eq!(
            session.classify_upload(&png, b"\x89PNG"),
            Err(SessionError::Rejected(ErrorKind::FileTooLarge))
        );
    }
}
