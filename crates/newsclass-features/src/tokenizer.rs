//! Text normalization and tokenization
//!
//! Turns raw article text into the token sequence the embedding table and
//! classifier were trained on. The steps run in a fixed order:
//!
//! 1. lowercase
//! 2. replace every non-word character with a space
//! 3. split into words (whitespace pre-tokenizer, then contraction splits)
//! 4. drop stopwords and punctuation tokens
//! 5. lemmatize
//!
//! Changing the order or any step silently degrades predictions, since the
//! classifier has no way to notice a shifted input distribution.

use crate::lemmatizer::Lemmatizer;
use crate::stopwords::StopwordSet;
use newsclass_core::{Result, TokenSequence};
use regex::Regex;
use tokenizers::pre_tokenizers::whitespace::WhitespaceSplit;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

/// ASCII punctuation; a token is dropped when it occurs inside this string
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Treebank contractions that survive non-word stripping
const CONTRACTIONS: [(&str, &str, &str); 6] = [
    ("cannot", "can", "not"),
    ("gimme", "gim", "me"),
    ("gonna", "gon", "na"),
    ("gotta", "got", "ta"),
    ("lemme", "lem", "me"),
    ("wanna", "wan", "na"),
];

/// Five-step article tokenizer
#[derive(Debug, Clone)]
pub struct TextTokenizer {
    non_word: Regex,
    stopwords: StopwordSet,
    lemmatizer: Lemmatizer,
}

impl TextTokenizer {
    /// Create a tokenizer from its language resources
    pub fn new(stopwords: StopwordSet, lemmatizer: Lemmatizer) -> Result<Self> {
        // Word characters are letters, numbers and underscore. Marks and
        // joiners are not, unlike the regex crate's Unicode `\w`.
        let non_word = Regex::new(r"[^\p{L}\p{N}_]").map_err(|e| {
            newsclass_core::Error::pipeline(format!("Failed to build non-word matcher: {}", e))
        })?;

        Ok(Self {
            non_word,
            stopwords,
            lemmatizer,
        })
    }

    /// Run the full pipeline on raw text
    pub fn tokenize(&self, text: &str) -> Result<TokenSequence> {
        let normalized = self.normalize(text);
        let words = self.split_words(&normalized)?;

        Ok(words
            .into_iter()
            .filter(|word| !self.is_dropped(word))
            .map(|word| self.lemmatizer.lemmatize(&word))
            .collect())
    }

    /// Steps 1 and 2: lowercase, then blank out non-word characters
    pub fn normalize(&self, text: &str) -> String {
        self.non_word
            .replace_all(&text.to_lowercase(), " ")
            .into_owned()
    }

    /// Step 3: split normalized text into word units
    pub fn split_words(&self, normalized: &str) -> Result<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(normalized);
        WhitespaceSplit.pre_tokenize(&mut pretokenized).map_err(|e| {
            newsclass_core::Error::pipeline(format!("Whitespace pre-tokenization failed: {}", e))
        })?;

        let mut words = Vec::new();
        for (split, _, _) in pretokenized.get_splits(OffsetReferential::Original, OffsetType::Byte)
        {
            match CONTRACTIONS.iter().find(|(whole, _, _)| *whole == split) {
                Some((_, head, tail)) => {
                    words.push((*head).to_string());
                    words.push((*tail).to_string());
                }
                None => words.push(split.to_string()),
            }
        }

        Ok(words)
    }

    /// Step 4 predicate
    fn is_dropped(&self, word: &str) -> bool {
        self.stopwords.contains(word) || PUNCTUATION.contains(word)
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}
