use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Words that never carry search intent on their own.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "which", "what", "how", "why", "when",
    "where", "who", "whom", "whose", "will", "would", "should", "could", "can", "may", "might",
    "shall", "must", "have", "has", "had", "do", "does", "did", "is", "are", "was", "were", "be",
    "been", "being", "it", "its", "they", "them", "their", "theirs", "our", "ours", "we", "us",
    "you", "your", "yours", "my", "mine", "his", "her", "hers", "he", "she", "him",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Tokens of this length or shorter are ignored.
const MAX_IGNORED_LEN: usize = 2;

/// Turns free-text questions into search terms
#[derive(Debug, Clone, Default)]
pub struct QueryNormalizer;

impl QueryNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase alphanumeric tokens in first-occurrence order, without
    /// duplicates, short tokens or stopwords.
    pub fn normalize(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let terms: Vec<String> = cleaned
            .split_whitespace()
            .filter(|token| token.len() > MAX_IGNORED_LEN)
            .filter(|token| !Self::is_stopword(token))
            .filter(|token| seen.insert(*token))
            .map(str::to_string)
            .collect();

        debug!("Normalized query '{query}' into {terms:?}");
        terms
    }

    pub fn is_stopword(token: &str) -> bool {
        STOPWORD_SET.contains(token)
    }
}
