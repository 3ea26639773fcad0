//! Word embedding tables and bag-of-embeddings averaging
//!
//! Tables are read from the word2vec formats gensim exports:
//!
//! - text: a `<vocab_size> <dim>` header, then one `word v1 .. vdim` line per word
//! - binary: the same header line, then for each word its UTF-8 bytes, a space,
//!   and `dim` little-endian `f32` values (optionally followed by a newline)

use newsclass_core::{EmbeddingVector, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Rows reserved up front; larger tables grow as they are read
const PREALLOC_ROWS: usize = 1 << 16;

/// On-disk layout of an embedding table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingFormat {
    #[default]
    Text,
    Binary,
}

/// Immutable word -> vector lookup table
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    index: HashMap<String, usize>,
    words: Vec<String>,
    /// Row-major `[words.len(), dim]`
    vectors: Vec<f32>,
}

impl EmbeddingTable {
    /// Build a table from in-memory entries
    pub fn from_entries<I, S>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = Self::with_capacity(dim, 0)?;
        for (word, vector) in entries {
            table.push(word.into(), &vector)?;
        }
        Ok(table)
    }

    /// Load a table from disk
    pub fn load(path: impl AsRef<Path>, format: EmbeddingFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open embedding table {}: {}",
                path.display(),
                e
            ))
        })?;
        let reader = BufReader::new(file);

        let table = match format {
            EmbeddingFormat::Text => Self::from_text_reader(reader)?,
            EmbeddingFormat::Binary => Self::from_binary_reader(reader)?,
        };

        info!(
            "Loaded embedding table {} ({} words, dim {})",
            path.display(),
            table.len(),
            table.dim()
        );

        Ok(table)
    }

    /// Parse the word2vec text format
    pub fn from_text_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let header = lines
            .next()
            .ok_or_else(|| Error::config("Embedding table is empty"))??;
        let (vocab_size, dim) = parse_header(&header)?;

        let mut table = Self::with_capacity(dim, vocab_size)?;
        let mut vector = Vec::with_capacity(dim);

        for (line_no, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let word = fields
                .next()
                .ok_or_else(|| Error::config(format!("Missing word on line {}", line_no + 2)))?;

            vector.clear();
            for field in fields {
                let value: f32 = field.parse().map_err(|_| {
                    Error::config(format!(
                        "Invalid vector component {:?} on line {}",
                        field,
                        line_no + 2
                    ))
                })?;
                vector.push(value);
            }

            if vector.len() != dim {
                return Err(Error::config(format!(
                    "Vector for {:?} has {} components, expected {}",
                    word,
                    vector.len(),
                    dim
                )));
            }

            table.push(word.to_string(), &vector)?;
        }

        table.check_vocab_size(vocab_size)?;
        Ok(table)
    }

    /// Parse the word2vec binary format
    pub fn from_binary_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(Error::config("Embedding table is empty"));
        }
        let (vocab_size, dim) = parse_header(&header)?;

        let mut table = Self::with_capacity(dim, vocab_size)?;
        let mut word_bytes = Vec::new();
        let row_bytes = dim
            .checked_mul(4)
            .ok_or_else(|| Error::config(format!("Embedding dimension {} is too large", dim)))?;
        let mut raw = zeroed::<u8>(row_bytes)?;
        let mut vector = zeroed::<f32>(dim)?;

        for row in 0..vocab_size {
            word_bytes.clear();
            reader.read_until(b' ', &mut word_bytes)?;
            if word_bytes.last() != Some(&b' ') {
                return Err(Error::config(format!(
                    "Embedding table truncated at row {} of {}",
                    row, vocab_size
                )));
            }
            word_bytes.pop();

            // Some writers end each row with a newline
            let start = word_bytes
                .iter()
                .position(|b| *b != b'\n')
                .unwrap_or(word_bytes.len());
            let word = std::str::from_utf8(&word_bytes[start..])
                .map_err(|e| Error::config(format!("Invalid UTF-8 word at row {}: {}", row, e)))?
                .to_string();

            reader.read_exact(&mut raw).map_err(|e| {
                Error::config(format!("Truncated vector for {:?}: {}", word, e))
            })?;
            for (value, bytes) in vector.iter_mut().zip(raw.chunks_exact(4)) {
                *value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }

            table.push(word, &vector)?;
        }

        Ok(table)
    }

    fn with_capacity(dim: usize, words: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::config("Embedding dimension must be positive"));
        }

        let rows = words.min(PREALLOC_ROWS);
        let floats = rows.checked_mul(dim).ok_or_else(|| {
            Error::config(format!(
                "Embedding table header {} x {} is too large",
                words, dim
            ))
        })?;
        let mut vectors = Vec::new();
        vectors.try_reserve_exact(floats).map_err(|e| {
            Error::config(format!(
                "Cannot allocate embedding table {} x {}: {}",
                words, dim, e
            ))
        })?;

        Ok(Self {
            dim,
            index: HashMap::with_capacity(rows),
            words: Vec::with_capacity(rows),
            vectors,
        })
    }

    fn push(&mut self, word: String, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::config(format!(
                "Vector for {:?} has {} components, expected {}",
                word,
                vector.len(),
                self.dim
            )));
        }
        if self.index.contains_key(&word) {
            return Err(Error::config(format!(
                "Duplicate word {:?} in embedding table",
                word
            )));
        }

        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.extend_from_slice(vector);
        Ok(())
    }

    fn check_vocab_size(&self, expected: usize) -> Result<()> {
        if self.len() != expected {
            return Err(Error::config(format!(
                "Embedding table header declares {} words, found {}",
                expected,
                self.len()
            )));
        }
        Ok(())
    }

    /// Vector for `word`, if it is in the vocabulary
    pub fn lookup(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        Some(&self.vectors[row * self.dim..(row + 1) * self.dim])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Vocabulary in file order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Average the vectors of every token found in the table.
    ///
    /// Returns the mean vector and the number of matched tokens. Tokens
    /// missing from the table are skipped; with no matches at all the zero
    /// vector is returned.
    pub fn embed<S: AsRef<str>>(&self, tokens: &[S]) -> (EmbeddingVector, usize) {
        let mut sum = vec![0f64; self.dim];
        let mut matched = 0usize;

        for token in tokens {
            if let Some(vector) = self.lookup(token.as_ref()) {
                for (acc, value) in sum.iter_mut().zip(vector) {
                    *acc += f64::from(*value);
                }
                matched += 1;
            }
        }

        if matched == 0 {
            return (EmbeddingVector::zeros(self.dim), 0);
        }

        let count = matched as f64;
        let mean: Vec<f32> = sum.into_iter().map(|s| (s / count) as f32).collect();
        (EmbeddingVector::from(mean), matched)
    }
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(Error::config(format!(
            "Invalid embedding table header {:?}, expected \"<vocab_size> <dim>\"",
            header.trim()
        )));
    }

    let vocab_size = parts[0]
        .parse()
        .map_err(|_| Error::config(format!("Invalid vocabulary size {:?}", parts[0])))?;
    let dim = parts[1]
        .parse()
        .map_err(|_| Error::config(format!("Invalid dimension {:?}", parts[1])))?;

    Ok((vocab_size, dim))
}

fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::config(format!("Cannot allocate {} embedding values: {}", len, e)))?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table() -> EmbeddingTable {
        EmbeddingTable::from_entries(
            3,
            vec![
                ("stock", vec![1.0, 0.0, 2.0]),
                ("rally", vec![3.0, 1.0, 0.0]),
                ("market", vec![0.0, 2.0, 4.0]),
                ("surge", vec![4.0, 1.0, 2.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_text_format() {
        let data = "3 2\nstock 0.5 -1\nmarket 1e-1 2.0\n\nfilm 0 0\n";
        let table = EmbeddingTable::from_text_reader(Cursor::new(data)).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.dim(), 2);
        assert_eq!(table.lookup("stock"), Some(&[0.5, -1.0][..]));
        assert_eq!(table.lookup("market"), Some(&[0.1, 2.0][..]));
        assert!(table.contains("film"));
        assert!(table.lookup("tv").is_none());
        assert_eq!(table.words(), &["stock", "market", "film"]);
    }

    #[test]
    fn test_text_format_errors() {
        let cases = [
            "",
            "not a header\n",
            "2\nstock 1 2\n",
            "1 2\nstock 1\n",
            "1 2\nstock 1 x\n",
            "2 2\nstock 1 2\n",
            "2 2\nstock 1 2\nstock 3 4\n",
            "0 0\n",
        ];

        for data in cases {
            let result = EmbeddingTable::from_text_reader(Cursor::new(data));
            assert!(result.is_err(), "expected error for {:?}", data);
        }
    }

    #[test]
    fn test_oversized_header_is_rejected() {
        let cases = [
            "18446744073709551615 100\nstock 1 2\n",
            "1 4611686018427387904\nstock 1 2\n",
            "18446744073709551615 18446744073709551615\n",
        ];

        for data in cases {
            let err = EmbeddingTable::from_text_reader(Cursor::new(data)).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{:?}: {:?}", data, err);

            let err = EmbeddingTable::from_binary_reader(Cursor::new(data)).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{:?}: {:?}", data, err);
        }
    }

    #[test]
    fn test_binary_format() {
        let mut data = b"2 3\n".to_vec();
        for (word, vector) in [("stock", [1.0f32, 2.0, 3.0]), ("tech", [-0.5, 0.25, 0.0])] {
            data.extend_from_slice(word.as_bytes());
            data.push(b' ');
            for value in vector {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.push(b'\n');
        }

        let table = EmbeddingTable::from_binary_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("stock"), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(table.lookup("tech"), Some(&[-0.5, 0.25, 0.0][..]));
    }

    #[test]
    fn test_binary_format_truncated() {
        let mut data = b"2 2\nstock ".to_vec();
        data.extend_from_slice(&1.0f32.to_le_bytes());
        data.extend_from_slice(&2.0f32.to_le_bytes());
        data.extend_from_slice(b"tech ");
        data.extend_from_slice(&1.0f32.to_le_bytes());

        assert!(EmbeddingTable::from_binary_reader(Cursor::new(data)).is_err());
    }

    #[test]
    fn test_embed_mean_of_matches() {
        let table = table();
        let tokens = ["stock", "rally", "market", "surge"];
        let (vector, matched) = table.embed(&tokens);

        assert_eq!(matched, 4);
        assert_eq!(vector.as_slice(), &[2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_embed_skips_unknown_tokens() {
        let table = table();
        let (vector, matched) = table.embed(&["stock", "zzz", "market", "qqq"]);

        assert_eq!(matched, 2);
        assert_eq!(vector.as_slice(), &[0.5, 1.0, 3.0]);
    }

    #[test]
    fn test_embed_duplicates_weigh_in() {
        let table = table();
        let (vector, matched) = table.embed(&["stock", "stock", "rally"]);

        assert_eq!(matched, 3);
        let expected = [5.0 / 3.0, 1.0 / 3.0, 4.0 / 3.0];
        for (got, want) in vector.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{got} != {want}");
        }
    }

    #[test]
    fn test_embed_no_matches_is_zero_vector() {
        let table = table();
        let (vector, matched) = table.embed(&["blorft"]);
        assert_eq!(matched, 0);
        assert_eq!(vector, EmbeddingVector::zeros(3));

        let empty: [&str; 0] = [];
        let (vector, matched) = table.embed(&empty);
        assert_eq!(matched, 0);
        assert!(vector.is_zero());
    }
}
