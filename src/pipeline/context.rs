use super::config::Config;
use super::observer::LogObserver;
use super::observer::Observer;
use crate::store::DocStore;
use crate::store::ObjectStore;
use crate::store::VectorIndex;
use std::sync::Arc;

/// everything a pipeline invocation needs, owned immutably. no global
/// state: embedders build one of these and pass it down.
#[derive(Clone)]
pub struct Context {
    pub object_store: Arc<dyn ObjectStore>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub doc_store: Arc<dyn DocStore>,
    pub config: Config,
    pub observer: Arc<dyn Observer>,
}

impl Context {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        vector_index: Arc<dyn VectorIndex>,
        doc_store: Arc<dyn DocStore>,
        config: Config,
    ) -> Self {
        Self {
            object_store,
            vector_index,
            doc_store,
            config,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }
}
