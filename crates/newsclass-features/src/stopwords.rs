//! English stopword list

use newsclass_core::Result;
use std::collections::HashSet;
use std::path::Path;

/// The NLTK English stopword list, one word per line.
const ENGLISH: &str = include_str!("../resources/english_stopwords.txt");

/// Set of words dropped before lemmatization
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The built-in English list
    pub fn english() -> Self {
        Self::from_list(ENGLISH)
    }

    /// Parse a newline-separated list. Blank lines and `#` comments are ignored.
    pub fn from_list(list: &str) -> Self {
        let words = list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();

        Self { words }
    }

    /// Load a list from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            newsclass_core::Error::config(format!(
                "Failed to read stopword list {}: {}",
                path.display(),
                e
            ))
        })?;

        let set = Self::from_list(&content);
        if set.is_empty() {
            return Err(newsclass_core::Error::config(format!(
                "Stopword list {} is empty",
                path.display()
            )));
        }

        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list() {
        let stopwords = StopwordSet::english();
        assert_eq!(stopwords.len(), 179);
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("as"));
        assert!(stopwords.contains("don"));
        assert!(!stopwords.contains("market"));
    }

    #[test]
    fn test_from_list_skips_comments() {
        let stopwords = StopwordSet::from_list("# news noise\nSaid\n\n  mr \n");
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("said"));
        assert!(stopwords.contains("mr"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = StopwordSet::from_file("/nonexistent/stopwords.txt").unwrap_err();
        assert!(err.is_fatal());
    }
}
