//! Fuzzy matcher: picks the single knowledge entry whose patterns best resemble
//! the question's keywords.
//!
//! Every (entry, pattern, keyword) triple is scored with Jaro-Winkler similarity,
//! in store order, and the best score is kept with a strict `>` comparison, so the
//! first triple reaching the maximum wins ties. The winner is only returned when
//! its score is strictly greater than the configured threshold. There is no index
//! and no early exit: which entry wins must not depend on scan shortcuts.

mod keywords;

pub use keywords::{extract_keywords, DEFAULT_STOPWORDS};

use crate::knowledge::{KnowledgeBase, KnowledgeEntry};

/// Default confidence threshold. Empirically tuned; scores must exceed it.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Matcher settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Minimum similarity (exclusive) for a match.
    pub threshold: f64,
    /// Lowercased stopwords.
    pub stopwords: Vec<String>,
}

impl MatchConfig {
    pub fn new<I, S>(threshold: f64, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            threshold,
            stopwords: stopwords.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD, DEFAULT_STOPWORDS)
    }
}

/// The winning entry, borrowed from the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Position of `entry` in the knowledge base.
    pub index: usize,
    pub score: f64,
    /// Question keyword that produced `score`.
    pub keyword: String,
    /// Pattern (as stored) that produced `score`.
    pub pattern: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Keywords this matcher would score for `question`.
    pub fn keywords(&self, question: &str) -> Vec<String> {
        extract_keywords(question, &self.config.stopwords)
    }

    /// Best entry for `question` if its similarity exceeds the threshold.
    pub fn find<'a>(&self, question: &str, kb: &'a KnowledgeBase) -> Option<Match<'a>> {
        let keywords = self.keywords(question);
        self.find_for_keywords(&keywords, kb)
    }

    /// Like [`Matcher::find`] but with already extracted keywords.
    pub fn find_for_keywords<'a>(&self, keywords: &[String], kb: &'a KnowledgeBase) -> Option<Match<'a>> {
        best_candidate(keywords, kb).filter(|m| m.score > self.config.threshold)
    }
}

/// Highest scoring triple regardless of threshold. `None` when nothing scored above 0.
pub fn best_candidate<'a>(keywords: &[String], kb: &'a KnowledgeBase) -> Option<Match<'a>> {
    let mut best_score = 0.0_f64;
    let mut best: Option<Match<'a>> = None;

    for (index, entry) in kb.entries().iter().enumerate() {
        let Some(patterns) = entry.patterns.as_deref() else {
            continue;
        };
        for pattern in patterns {
            let lowered = pattern.to_lowercase();
            for keyword in keywords {
                let score = strsim::jaro_winkler(keyword, &lowered);
                if score > best_score {
                    best_score = score;
                    best = Some(Match {
                        entry,
                        index,
                        score,
                        keyword: keyword.clone(),
                        pattern: pattern.as_str(),
                    });
                }
            }
        }
    }

    best
}
