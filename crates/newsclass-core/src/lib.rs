//! newsclass Core
//!
//! Core types and utilities shared across newsclass components.
//!
//! This crate provides:
//! - The closed set of news categories and the prediction type
//! - The document embedding vector passed between pipeline and classifier
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Category, EmbeddingVector, Prediction, TokenSequence};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Category, EmbeddingVector, Prediction, TokenSequence};
}
