//! Static knowledge base: pattern→answer records loaded once from a source.
//!
//! | Piece            | Role                                                   |
//! |------------------|--------------------------------------------------------|
//! | `KnowledgeEntry` | one record: `patterns` (example phrasings) + `answer` |
//! | `KnowledgeBase`  | ordered, read-only list of entries                     |
//! | `KnowledgeSource`| where the JSON comes from (file, inline, remote)       |
//! | `KnowledgeStore` | load-once handle shared by all requests               |

mod entry;
mod source;
mod store;

pub use entry::{KnowledgeBase, KnowledgeEntry};
pub use source::{FileSource, InlineSource};
pub use store::KnowledgeStore;

use crate::error::LoadError;

/// Common trait for all knowledge sources.
#[async_trait::async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Human-readable name for logs and errors (path, URL, ...).
    fn name(&self) -> &str;

    /// Returns the raw JSON record list.
    async fn fetch(&self) -> Result<String, LoadError>;
}

/// Reads and parses the knowledge base from `source`. Errors are returned as-is;
/// use [`KnowledgeStore`] for the degrade-to-empty behaviour.
pub async fn load_knowledge_base(source: &dyn KnowledgeSource) -> Result<KnowledgeBase, LoadError> {
    let raw = source.fetch().await?;
    KnowledgeBase::from_json(source.name(), &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_parses_inline_source() {
        let source = InlineSource::new(
            "inline",
            r#"[{"patterns":["Öffnungszeiten","Adresse"],"answer":"Mo-Fr 9-17 Uhr"}]"#,
        );
        let kb = load_knowledge_base(&source).await.unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.entries()[0].answer_text(), "Mo-Fr 9-17 Uhr");
    }

    #[tokio::test]
    async fn load_propagates_parse_error() {
        let source = InlineSource::new("inline", "[");
        assert!(matches!(
            load_knowledge_base(&source).await,
            Err(LoadError::Parse { .. })
        ));
    }
}
