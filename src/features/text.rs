//! Text feature extraction.
//!
//! Two independent signals are derived from the project description:
//!
//! - simple lexical statistics (token count, keyword-hit ratio, uniqueness
//!   ratio), computed per call with no fitted state
//! - a TF-IDF weighted bag of 1–2-grams over a capped vocabulary, fit once
//!   over the training corpus and frozen
//!
//! Tokenization is a swappable strategy: callers hold a `&dyn Tokenizer`
//! and the output contract (shape, ranges) is identical for every
//! implementation; only tokenization fidelity differs.

use std::collections::{HashMap, HashSet};

/// Tokenizer strategy. All implementations lowercase their input.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Simple whitespace splitter. Baseline fallback; keeps punctuation glued
/// to words.
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|t| t.to_string())
            .collect()
    }
}

/// Punctuation-aware tokenizer: splits on any non-alphanumeric character.
///
/// Richer than [`WhitespaceTokenizer`] ("co2," becomes "co2"), with the
/// same calling contract.
pub struct UnicodeTokenizer;

impl Tokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }
}

/// Pick the richest tokenizer available.
///
/// The original service tried to load an external NLP tokenizer and fell
/// back to whitespace splitting when it was missing. Here the richer
/// implementation is always compiled in, so selection is trivial, but the
/// seam is kept so callers never depend on a concrete tokenizer.
pub fn select_tokenizer() -> Box<dyn Tokenizer> {
    Box::new(UnicodeTokenizer)
}

/// Per-text lexical statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalStats {
    pub count: usize,
    pub keyword_ratio: f64,
    pub unique_ratio: f64,
}

impl LexicalStats {
    /// Compute stats over pre-tokenized text.
    ///
    /// Empty input yields all-zero stats; the `max(1, count)` denominators
    /// keep the ratios total.
    pub fn compute(tokens: &[String], keywords: &HashSet<String>) -> Self {
        let count = tokens.len();
        let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        let hits = tokens.iter().filter(|t| keywords.contains(t.as_str())).count();
        Self {
            count,
            keyword_ratio: hits as f64 / count.max(1) as f64,
            unique_ratio: unique.len() as f64 / count.max(1) as f64,
        }
    }
}

/// TF-IDF vectorizer over 1–2-grams with a capped vocabulary.
///
/// Mirrors the usual smoothed-IDF convention:
/// `idf(t) = ln((1 + n_docs) / (1 + df(t))) + 1`, rows L2-normalized.
///
/// The vocabulary is chosen by corpus-wide term frequency (ties broken
/// lexicographically) and column order is the sorted term order, so `fit`
/// is fully deterministic regardless of hash-map iteration order.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and IDF weights over tokenized documents.
    pub fn fit(docs: &[Vec<String>], max_features: usize) -> Self {
        let mut corpus_counts: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();

        for tokens in docs {
            let terms = ngrams(tokens);
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *corpus_counts.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        // Cap the vocabulary: highest corpus frequency first, then term
        // order for determinism.
        let mut ranked: Vec<(&String, &u64)> = corpus_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let mut selected: Vec<String> = ranked
            .into_iter()
            .take(max_features)
            .map(|(term, _)| term.clone())
            .collect();
        selected.sort();

        let n_docs = docs.len() as f64;
        let mut vocabulary = HashMap::with_capacity(selected.len());
        let mut idf = Vec::with_capacity(selected.len());
        for (col, term) in selected.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, col);
        }

        Self { vocabulary, idf }
    }

    /// Number of output columns (frozen at fit time).
    pub fn width(&self) -> usize {
        self.idf.len()
    }

    /// Transform tokenized text into a TF-IDF row.
    ///
    /// Terms outside the frozen vocabulary contribute zero; the row of an
    /// all-unknown document is the zero vector.
    pub fn transform(&self, tokens: &[String]) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for term in ngrams(tokens) {
            if let Some(&col) = self.vocabulary.get(&term) {
                row[col] += self.idf[col];
            }
        }

        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut row {
                *v /= norm;
            }
        }
        row
    }
}

/// Unigrams plus adjacent bigrams (joined with a single space).
fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len().saturating_mul(2));
    out.extend(tokens.iter().cloned());
    for pair in tokens.windows(2) {
        out.push(format!("{} {}", pair[0], pair[1]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(tokenizer: &dyn Tokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text)
    }

    #[test]
    fn whitespace_tokenizer_lowercases() {
        let t = toks(&WhitespaceTokenizer, "Solar AUDIT plan");
        assert_eq!(t, vec!["solar", "audit", "plan"]);
    }

    #[test]
    fn unicode_tokenizer_strips_punctuation() {
        let t = toks(&UnicodeTokenizer, "CO2, offset; audit.");
        assert_eq!(t, vec!["co2", "offset", "audit"]);
    }

    #[test]
    fn lexical_stats_empty_text() {
        let keywords: HashSet<String> = ["audit".to_string()].into_iter().collect();
        let s = LexicalStats::compute(&[], &keywords);
        assert_eq!(s.count, 0);
        assert_eq!(s.keyword_ratio, 0.0);
        assert_eq!(s.unique_ratio, 0.0);
    }

    #[test]
    fn lexical_stats_ratios() {
        let keywords: HashSet<String> =
            ["audit".to_string(), "co2".to_string()].into_iter().collect();
        let tokens = toks(&WhitespaceTokenizer, "audit audit co2 plan");
        let s = LexicalStats::compute(&tokens, &keywords);
        assert_eq!(s.count, 4);
        assert!((s.keyword_ratio - 0.75).abs() < 1e-12);
        assert!((s.unique_ratio - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ngrams_include_bigrams() {
        let tokens = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let grams = ngrams(&tokens);
        assert!(grams.contains(&"a b".to_string()));
        assert!(grams.contains(&"b c".to_string()));
        assert_eq!(grams.len(), 5);
    }

    #[test]
    fn tfidf_caps_vocabulary_and_is_deterministic() {
        let docs: Vec<Vec<String>> = (0..10)
            .map(|i| {
                toks(
                    &WhitespaceTokenizer,
                    &format!("solar audit plan term{} term{}", i, i % 3),
                )
            })
            .collect();
        let a = TfidfVectorizer::fit(&docs, 8);
        let b = TfidfVectorizer::fit(&docs, 8);
        assert_eq!(a.width(), 8);
        let doc = toks(&WhitespaceTokenizer, "solar audit plan");
        assert_eq!(a.transform(&doc), b.transform(&doc));
    }

    #[test]
    fn tfidf_unknown_terms_are_zero() {
        let docs = vec![toks(&WhitespaceTokenizer, "solar audit plan")];
        let v = TfidfVectorizer::fit(&docs, 300);
        let row = v.transform(&toks(&WhitespaceTokenizer, "entirely novel words"));
        assert!(row.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn tfidf_rows_are_unit_norm() {
        let docs = vec![
            toks(&WhitespaceTokenizer, "solar audit plan"),
            toks(&WhitespaceTokenizer, "wind audit report"),
        ];
        let v = TfidfVectorizer::fit(&docs, 300);
        let row = v.transform(&toks(&WhitespaceTokenizer, "solar audit"));
        let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}
