//! Text-to-vector feature pipeline

use crate::{EmbeddingTable, TextTokenizer};
use newsclass_core::{EmbeddingVector, Result, TokenSequence};
use std::sync::Arc;

/// Document features produced by [`FeaturePipeline::vectorize`]
#[derive(Debug, Clone)]
pub struct Features {
    /// Mean embedding of the matched tokens
    pub vector: EmbeddingVector,

    /// Tokens produced by the tokenizer
    pub tokens: TokenSequence,

    /// How many tokens were found in the embedding table
    pub matched: usize,
}

impl Features {
    /// True when no token had an embedding
    pub fn is_out_of_vocabulary(&self) -> bool {
        self.matched == 0
    }
}

/// Tokenizer plus embedding table
///
/// Both halves are read-only once built, so one pipeline serves every
/// request.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    tokenizer: TextTokenizer,
    table: Arc<EmbeddingTable>,
}

impl FeaturePipeline {
    pub fn new(tokenizer: TextTokenizer, table: Arc<EmbeddingTable>) -> Self {
        Self { tokenizer, table }
    }

    /// Raw text to token sequence
    pub fn tokenize(&self, text: &str) -> Result<TokenSequence> {
        self.tokenizer.tokenize(text)
    }

    /// Average the embeddings of the tokens found in the table
    pub fn embed<S: AsRef<str>>(&self, tokens: &[S]) -> EmbeddingVector {
        self.table.embed(tokens).0
    }

    /// Tokenize then embed
    pub fn vectorize(&self, text: &str) -> Result<Features> {
        let tokens = self.tokenize(text)?;
        let (vector, matched) = self.table.embed(&tokens);

        Ok(Features {
            vector,
            tokens,
            matched,
        })
    }

    /// Dimension of the produced vectors
    pub fn dim(&self) -> usize {
        self.table.dim()
    }

    pub fn tokenizer(&self) -> &TextTokenizer {
        &self.tokenizer
    }

    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }
}
