//! Query parsing: object terms, stemmed search terms and exclusions.

use crate::stemmer::PorterStemmer;

/// English stopwords skipped for full-text search.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "near", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// Knobs for query parsing.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub stopwords: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl QueryConfig {
    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.iter().any(|w| w == word)
    }
}

/// A query split into the term lists the engine works with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Every lowercased word; matched against object names.
    pub object_terms: Vec<String>,
    /// Stemmed words every matching document must contain.
    pub search_terms: Vec<String>,
    /// Stemmed words (written with a leading `-`) no matching document may contain.
    pub excluded_terms: Vec<String>,
    /// Lowercased original words, for highlighting.
    pub highlight_terms: Vec<String>,
}

impl ParsedQuery {
    pub fn parse(text: &str, config: &QueryConfig) -> Self {
        let stemmer = PorterStemmer::new();
        let mut query = ParsedQuery::default();

        for raw in text.split_whitespace() {
            let lower = raw.to_lowercase();
            push_unique(&mut query.object_terms, lower.clone());

            let (excluded, word) = match lower.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, lower.as_str()),
            };
            if word.is_empty()
                || config.is_stopword(word)
                || word.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }

            let mut stem = stemmer.stem(word);
            if stem.chars().count() < 3 && word.chars().count() >= 3 {
                stem = word.to_string();
            }

            if excluded {
                push_unique(&mut query.excluded_terms, stem);
            } else {
                push_unique(&mut query.search_terms, stem);
                push_unique(&mut query.highlight_terms, lower.clone());
            }
        }

        query
    }

    pub fn is_empty(&self) -> bool {
        self.object_terms.is_empty()
    }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !terms.contains(&term) {
        terms.push(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedQuery {
        ParsedQuery::parse(text, &QueryConfig::default())
    }

    #[test]
    fn test_object_terms_keep_every_word() {
        let query = parse("The  Cellular\tAutomaton 42");
        assert_eq!(query.object_terms, vec!["the", "cellular", "automaton", "42"]);
        assert_eq!(query.search_terms, vec!["cellular", "automaton"]);
        assert_eq!(query.highlight_terms, vec!["cellular", "automaton"]);
    }

    #[test]
    fn test_stemming_and_short_stem_fallback() {
        let query = parse("initializers running ties");
        // "ties" stems to "ti", shorter than 3, so the word is kept.
        assert_eq!(query.search_terms, vec!["initi", "run", "ties"]);
    }

    #[test]
    fn test_excluded_terms() {
        let query = parse("rules -forest");
        assert_eq!(query.search_terms, vec!["rule"]);
        assert_eq!(query.excluded_terms, vec!["forest"]);
        assert_eq!(query.highlight_terms, vec!["rules"]);
        assert_eq!(query.object_terms, vec!["rules", "-forest"]);
    }

    #[test]
    fn test_excluded_stopwords_and_numbers_ignored() {
        let query = parse("rules -the -42 -forest");
        assert_eq!(query.search_terms, vec!["rule"]);
        assert_eq!(query.excluded_terms, vec!["forest"]);
        assert_eq!(query.object_terms, vec!["rules", "-the", "-42", "-forest"]);
    }

    #[test]
    fn test_duplicates_dropped() {
        let query = parse("rule rules RULE");
        assert_eq!(query.search_terms, vec!["rule"]);
        assert_eq!(query.object_terms, vec!["rule", "rules"]);
    }

    #[test]
    fn test_empty_and_stopword_only() {
        assert!(parse("   ").is_empty());
        let query = parse("the of and");
        assert!(!query.is_empty());
        assert!(query.search_terms.is_empty());
        let query = parse("-");
        assert!(query.search_terms.is_empty());
        assert!(query.excluded_terms.is_empty());
    }

    #[test]
    fn test_custom_stopwords() {
        let config = QueryConfig {
            stopwords: vec!["cellular".to_string()],
        };
        let query = ParsedQuery::parse("cellular the", &config);
        assert_eq!(query.search_terms, vec!["the"]);
    }
}
