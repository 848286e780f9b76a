//! Knowledge records and the ordered, read-only knowledge base.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoadError;

/// One pattern→answer record.
///
/// Both fields are optional on the wire. Entries without `patterns` are never
/// matched; a missing `answer` is left for the consumer of a match to handle.
/// Extra fields in the source record are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl KnowledgeEntry {
    pub fn new<I, S>(patterns: I, answer: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: Some(patterns.into_iter().map(Into::into).collect()),
            answer: Some(answer.into()),
        }
    }

    /// Converts one source record. Ill-typed fields are dropped instead of
    /// failing the whole knowledge base: a non-object record or `patterns`
    /// that is not a string array leaves the entry without patterns, and a
    /// non-string `answer` leaves it without an answer.
    fn from_record(source_name: &str, index: usize, record: Value) -> Self {
        let Value::Object(mut fields) = record else {
            tracing::warn!(target: "faqbot::knowledge", source = %source_name, index, "Knowledge record is not an object, ignoring it");
            return Self::default();
        };

        let patterns = match fields.remove("patterns") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => {
                let strings: Option<Vec<String>> = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                if strings.is_none() {
                    tracing::warn!(target: "faqbot::knowledge", source = %source_name, index, "Knowledge record has non-string patterns, entry will not match");
                }
                strings
            }
            Some(_) => {
                tracing::warn!(target: "faqbot::knowledge", source = %source_name, index, "Knowledge record patterns is not an array, entry will not match");
                None
            }
        };

        let answer = match fields.remove("answer") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                tracing::warn!(target: "faqbot::knowledge", source = %source_name, index, "Knowledge record answer is not a string, dropping it");
                None
            }
        };

        Self { patterns, answer }
    }

    /// Answer text, or empty when the record has none.
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or("")
    }

    /// Patterns, or an empty slice when the record has none.
    pub fn pattern_list(&self) -> &[String] {
        self.patterns.as_deref().unwrap_or(&[])
    }
}

/// Ordered knowledge entries. Order matters: earlier entries win score ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Parses a JSON array of records. Only invalid JSON or a non-array
    /// top level is an error; ill-typed records are kept in place with the
    /// offending fields dropped, so the remaining entries are unaffected.
    pub fn from_json(source_name: &str, raw: &str) -> Result<Self, LoadError> {
        let records: Vec<Value> = serde_json::from_str(raw).map_err(|error| LoadError::Parse {
            source_name: source_name.to_string(),
            error,
        })?;
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| KnowledgeEntry::from_record(source_name, index, record))
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that carry a `patterns` field and can therefore match.
    pub fn matchable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.patterns.is_some()).count()
    }
}
