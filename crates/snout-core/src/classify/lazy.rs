//! Load-once classifier holder.

use std::sync::{Arc, Mutex};

use super::{Classifier, ClassifyError, Prediction};

type Loader<C> = Box<dyn Fn() -> Result<C, ClassifyError> + Send + Sync>;

/// Defers loading an expensive classifier (model weights) until first use and
/// shares the loaded instance afterwards. A failed load is returned to the
/// caller and attempted again on the next call.
pub struct LazyClassifier<C> {
    loader: Loader<C>,
    loaded: Mutex<Option<Arc<C>>>,
}

impl<C> LazyClassifier<C> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<C, ClassifyError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            loaded: Mutex::new(None),
        }
    }

    /// Loads the classifier if needed. Concurrent callers wait for one load.
    pub fn get(&self) -> Result<Arc<C>, ClassifyError> {
        let mut slot = self
            .loaded
            .lock()
            .map_err(|_| ClassifyError::Model("classifier lock poisoned".to_string()))?;
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }
        let instance = Arc::new((self.loader)()?);
        tracing::info!("classifier loaded");
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl<C: Classifier> Classifier for LazyClassifier<C> {
    fn classify(&self, image: &[u8]) -> Result<Prediction, ClassifyError> {
        self.get()?.classify(image)
    }
}
