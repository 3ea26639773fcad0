//! Core types for newsclass

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered sequence of normalized, lemmatized tokens
pub type TokenSequence = Vec<String>;

/// News category predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    Politics,
    Sport,
    Tech,
}

impl Category {
    /// All categories, in the label order the classifier is trained with
    pub const ALL: [Category; 5] = [
        Category::Business,
        Category::Entertainment,
        Category::Politics,
        Category::Sport,
        Category::Tech,
    ];

    /// Lowercase identifier, as stored in classifier label lists
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Politics => "politics",
            Self::Sport => "sport",
            Self::Tech => "tech",
        }
    }

    /// Capitalized name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::Politics => "Politics",
            Self::Sport => "Sport",
            Self::Tech => "Tech",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "entertainment" => Ok(Self::Entertainment),
            "politics" => Ok(Self::Politics),
            "sport" | "sports" => Ok(Self::Sport),
            "tech" | "technology" => Ok(Self::Tech),
            other => Err(crate::Error::config(format!("unknown news category: {other:?}"))),
        }
    }
}

/// Fixed-dimension document vector fed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// The zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// True when every component is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Result of classifying one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Winning category
    pub label: Category,

    /// Probability of the winning category (0.0-1.0)
    pub score: f32,

    /// Probability of every category, in classifier label order
    pub scores: Vec<(Category, f32)>,

    /// Tokens produced by the feature pipeline
    pub token_count: usize,

    /// Tokens found in the embedding table
    pub matched_count: usize,

    /// End-to-end latency in microseconds
    pub latency_us: u64,
}

impl Prediction {
    /// Create a prediction with no pipeline statistics attached
    pub fn new(label: Category, score: f32, scores: Vec<(Category, f32)>) -> Self {
        Self {
            label,
            score,
            scores,
            token_count: 0,
            matched_count: 0,
            latency_us: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("business".parse::<Category>().unwrap(), Category::Business);
        assert_eq!("Sport".parse::<Category>().unwrap(), Category::Sport);
        assert_eq!(" TECH ".parse::<Category>().unwrap(), Category::Tech);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Entertainment.to_string(), "Entertainment");
        assert_eq!(Category::Politics.as_str(), "politics");
        let json = serde_json::to_string(&Category::Tech).unwrap();
        assert_eq!(json, "\"tech\"");
    }

    #[test]
    fn test_embedding_vector_zeros() {
        let v = EmbeddingVector::zeros(100);
        assert_eq!(v.dim(), 100);
        assert!(v.is_zero());

        let v = EmbeddingVector::from(vec![0.0, 0.5]);
        assert!(!v.is_zero());
    }
}
