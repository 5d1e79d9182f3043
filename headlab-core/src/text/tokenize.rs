//! Headline tokenization and basic text statistics.
//!
//! Lowercases, splits on non-alphanumeric boundaries, and optionally removes
//! English stopwords from an embedded list. Deliberately simple: headlines
//! are short and the downstream consumers are frequency counts, not parsing.
//! Part-of-speech tagging stays with the external NLP collaborator.

use std::collections::HashMap;

/// Common English stopwords (the usual closed-class words seen in headlines).
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "out",
    "over", "own", "s", "same", "she", "should", "so", "some", "such", "t", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

/// Whether a lowercase token is an English stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Lowercase alphanumeric tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize and drop stopwords.
pub fn tokenize_filtered(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stopword(t))
        .collect()
}

/// Basic statistics for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStats {
    pub char_count: usize,
    pub word_count: usize,
    /// Alphanumeric tokens after stopword removal.
    pub token_count: usize,
}

/// Compute `TextStats` for one text.
pub fn analyze_text(text: &str) -> TextStats {
    TextStats {
        char_count: text.chars().count(),
        word_count: text.split_whitespace().count(),
        token_count: tokenize_filtered(text).len(),
    }
}

/// Token frequency counts across many texts (stopwords removed).
pub fn token_frequencies<'a>(texts: impl IntoIterator<Item = &'a str>) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for text in texts {
        for token in tokenize_filtered(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    counts
}

/// The `k` most frequent tokens, descending by count, ties broken
/// alphabetically so output is deterministic.
pub fn top_tokens(counts: &HashMap<String, u64>, k: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts.iter().map(|(t, c)| (t.clone(), *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopword_table_is_sorted() {
        // binary_search depends on this
        assert!(STOPWORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Tesla Stock Surges 10% After Strong Earnings"),
            vec!["tesla", "stock", "surges", "10", "after", "strong", "earnings"]
        );
    }

    #[test]
    fn filtered_drops_stopwords() {
        let tokens = tokenize_filtered("The stock is up after the earnings");
        assert_eq!(tokens, vec!["stock", "earnings"]);
    }

    #[test]
    fn stats_count_the_right_things() {
        let stats = analyze_text("Apple beats on earnings");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 23);
        assert_eq!(stats.token_count, 3); // "on" is a stopword
    }

    #[test]
    fn top_tokens_is_deterministic() {
        let counts = token_frequencies(["apple beats", "apple misses", "tesla beats"]);
        let top = top_tokens(&counts, 2);
        assert_eq!(top[0], ("apple".to_string(), 2));
        assert_eq!(top[1], ("beats".to_string(), 2));
    }
}
