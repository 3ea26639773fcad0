//! Noun lemmatizer using WordNet morphology
//!
//! A word is reduced to its base form by checking the noun exception list,
//! then applying suffix detachment rules. Candidates are kept only if they
//! appear in the lemma index, and the shortest one wins. Unknown words are
//! returned unchanged.

use newsclass_core::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Suffix detachment rules for nouns, applied in this order
const NOUN_RULES: [(&str, &str); 9] = [
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// WordNet-style noun lemmatizer
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    /// Known base forms
    lemmas: HashSet<String>,

    /// Irregular inflections mapped to their base forms
    exceptions: HashMap<String, Vec<String>>,
}

impl Lemmatizer {
    /// Build a lemmatizer from a list of known base forms
    pub fn from_lemmas<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lemmas: lemmas.into_iter().map(|s| s.as_ref().to_string()).collect(),
            exceptions: HashMap::new(),
        }
    }

    /// Add irregular forms, e.g. `("geese", ["goose"])`
    pub fn with_exceptions<I, S>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: AsRef<str>,
    {
        for (form, bases) in exceptions {
            self.exceptions.insert(
                form.as_ref().to_string(),
                bases.iter().map(|b| b.as_ref().to_string()).collect(),
            );
        }
        self
    }

    /// Load `index.noun` and `noun.exc` from a WordNet dictionary directory
    pub fn from_wordnet_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let index = read_dictionary_file(&dir.join("index.noun"))?;
        let exceptions = read_dictionary_file(&dir.join("noun.exc"))?;

        let lemmatizer = Self {
            lemmas: parse_index(&index),
            exceptions: parse_exceptions(&exceptions),
        };

        if lemmatizer.lemmas.is_empty() {
            return Err(newsclass_core::Error::config(format!(
                "WordNet noun index in {} contains no lemmas",
                dir.display()
            )));
        }

        info!(
            "Loaded WordNet noun index: {} lemmas, {} exceptions",
            lemmatizer.lemmas.len(),
            lemmatizer.exceptions.len()
        );

        Ok(lemmatizer)
    }

    /// Reduce a lowercase word to its noun base form.
    ///
    /// Exception forms are checked once. Otherwise the detachment rules are
    /// applied round after round to the previous round's forms until some
    /// form is a known lemma or no rule applies any more.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(bases) = self.exceptions.get(word) {
            let candidates = std::iter::once(word.to_string()).chain(bases.iter().cloned());
            return self
                .shortest_known(candidates)
                .unwrap_or_else(|| word.to_string());
        }

        let mut forms = apply_rules(&[word.to_string()]);
        let first_round = std::iter::once(word.to_string()).chain(forms.iter().cloned());
        if let Some(lemma) = self.shortest_known(first_round) {
            return lemma;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms);
            if let Some(lemma) = self.shortest_known(forms.iter().cloned()) {
                return lemma;
            }
        }

        word.to_string()
    }

    /// Shortest candidate in the lemma index, first on ties
    fn shortest_known(&self, candidates: impl Iterator<Item = String>) -> Option<String> {
        // min_by_key keeps the first of equally short candidates
        candidates
            .filter(|form| self.lemmas.contains(form))
            .min_by_key(|form| form.chars().count())
    }

    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}

/// One round of suffix detachment over every form.
///
/// Duplicates are dropped (first occurrence kept) so repeated rounds stay
/// linear in the word length.
fn apply_rules(forms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    forms
        .iter()
        .flat_map(|form| {
            NOUN_RULES.iter().filter_map(move |(suffix, replacement)| {
                form.strip_suffix(suffix)
                    .map(|stem| format!("{stem}{replacement}"))
            })
        })
        .filter(|form| seen.insert(form.clone()))
        .collect()
}

fn read_dictionary_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        newsclass_core::Error::config(format!(
            "Failed to read WordNet file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Lemma is the first field; license lines start with a space.
fn parse_index(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(' '))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn parse_exceptions(content: &str) -> HashMap<String, Vec<String>> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let form = fields.next()?;
            let bases: Vec<String> = fields.map(str::to_string).collect();
            (!bases.is_empty()).then(|| (form.to_string(), bases))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmatizer() -> Lemmatizer {
        Lemmatizer::from_lemmas([
            "stock", "stocks", "market", "rally", "company", "box", "church", "woman", "glass",
            "goose", "wolf", "news",
        ])
        .with_exceptions([("geese", vec!["goose"]), ("wolves", vec!["wolf"])])
    }

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = lemmatizer();
        assert_eq!(lemmatizer.lemmatize("markets"), "market");
        assert_eq!(lemmatizer.lemmatize("companies"), "company");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
        assert_eq!(lemmatizer.lemmatize("churches"), "church");
        assert_eq!(lemmatizer.lemmatize("women"), "woman");
        assert_eq!(lemmatizer.lemmatize("glasses"), "glass");
    }

    #[test]
    fn test_shortest_known_candidate_wins() {
        // both "stocks" and "stock" are lemmas
        assert_eq!(lemmatizer().lemmatize("stocks"), "stock");
    }

    #[test]
    fn test_exceptions_bypass_rules() {
        let lemmatizer = lemmatizer();
        assert_eq!(lemmatizer.lemmatize("geese"), "goose");
        assert_eq!(lemmatizer.lemmatize("wolves"), "wolf");
    }

    #[test]
    fn test_base_forms_and_unknown_words_unchanged() {
        let lemmatizer = lemmatizer();
        assert_eq!(lemmatizer.lemmatize("rally"), "rally");
        assert_eq!(lemmatizer.lemmatize("news"), "news");
        assert_eq!(lemmatizer.lemmatize("surges"), "surges");
        assert_eq!(lemmatizer.lemmatize("s"), "s");
    }

    #[test]
    fn test_rules_repeat_until_a_lemma_matches() {
        let lemmatizer = Lemmatizer::from_lemmas(["box", "man"]);
        // boxess -> boxes -> box
        assert_eq!(lemmatizer.lemmatize("boxess"), "box");
        // mens -> men -> man
        assert_eq!(lemmatizer.lemmatize("mens"), "man");
        // no round ever reaches a lemma
        assert_eq!(lemmatizer.lemmatize("dresses"), "dresses");
    }

    #[test]
    fn test_first_matching_round_wins() {
        // "glasses" matches in the first round, so the deeper "gla" is never reached
        let lemmatizer = Lemmatizer::from_lemmas(["glass", "gla"]);
        assert_eq!(lemmatizer.lemmatize("glasses"), "glass");
    }

    #[test]
    fn test_long_suffix_chains_terminate() {
        let word = "ses".repeat(200);
        assert_eq!(lemmatizer().lemmatize(&word), word);
    }

    #[test]
    fn test_parse_wordnet_files() {
        let index = "  1 This software and database is being provided\n\
                     market n 5 4 @ ~ + ; 5 3 08541130\n\
                     stock_market n 1 2 @ ~ 1 0 08424951\n";
        let lemmas = parse_index(index);
        assert_eq!(lemmas.len(), 2);
        assert!(lemmas.contains("market"));
        assert!(lemmas.contains("stock_market"));

        let exceptions = parse_exceptions("aardwolves aardwolf\nmice mouse\nbroken\n");
        assert_eq!(exceptions.len(), 2);
        assert_eq!(exceptions["mice"], vec!["mouse".to_string()]);
    }

    #[test]
    fn test_wordnet_dir_missing() {
        let err = Lemmatizer::from_wordnet_dir("/nonexistent/wordnet").unwrap_err();
        assert!(err.to_string().contains("index.noun"));
    }
}
