//! Memoizing knowledge store: loads the knowledge base from its source once and
//! serves the same `Arc<KnowledgeBase>` to every caller afterwards.

use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{load_knowledge_base, InlineSource, KnowledgeBase, KnowledgeSource};

/// Process-wide, read-only knowledge handle.
///
/// The first call to [`KnowledgeStore::get`] reads the source; concurrent first
/// callers wait on the same initialization, so the source is read at most once.
/// A failed load is logged and cached as an empty knowledge base.
pub struct KnowledgeStore {
    source: Arc<dyn KnowledgeSource>,
    cell: OnceCell<Arc<KnowledgeBase>>,
}

impl KnowledgeStore {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// A store that is already loaded with `kb`; its source is never consulted.
    pub fn preloaded(kb: KnowledgeBase) -> Self {
        Self {
            source: Arc::new(InlineSource::new("preloaded", "[]")),
            cell: OnceCell::new_with(Some(Arc::new(kb))),
        }
    }

    /// Name of the backing source (file path, URL, ...).
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Returns the knowledge base, loading it on first use.
    pub async fn get(&self) -> Arc<KnowledgeBase> {
        let kb = self
            .cell
            .get_or_init(|| async {
                match load_knowledge_base(self.source.as_ref()).await {
                    Ok(kb) => {
                        tracing::info!(
                            target: "faqbot::knowledge",
                            source = %self.source.name(),
                            entries = kb.len(),
                            matchable = kb.matchable_count(),
                            "Knowledge base loaded"
                        );
                        Arc::new(kb)
                    }
                    Err(e) => {
                        tracing::warn!(
                            target: "faqbot::knowledge",
                            source = %self.source.name(),
                            "Knowledge base not loaded, using empty knowledge base: {}",
                            e
                        );
                        Arc::new(KnowledgeBase::default())
                    }
                }
            })
            .await;
        Arc::clone(kb)
    }

    /// The knowledge base if it has been loaded already; never triggers a load.
    pub fn loaded(&self) -> Option<Arc<KnowledgeBase>> {
        self.cell.get().cloned()
    }
}
