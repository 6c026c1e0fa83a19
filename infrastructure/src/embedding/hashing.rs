//! Feature-hashing embedder
//!
//! Maps text to a fixed-size vector without a model: identifiers are split
//! into words (`snake_case`, `kebab-case`, `camelCase` and spaces all
//! separate), each word is padded as `^word$`, and every character n-gram is
//! hashed with FNV-1a into a signed bucket. The vector is L2-normalized.
//!
//! It captures surface similarity (`file_path` ~ `filepath` ~ `path`), not
//! meaning; plug a model-backed [`EmbedderPort`] in for real paraphrase
//! detection.

use async_trait::async_trait;
use toolalign_application::{EmbedderPort, EmbeddingError};
use toolalign_domain::Embedding;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic local embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    ngram: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 256;
    pub const DEFAULT_NGRAM: usize = 3;

    /// Zero values fall back to the defaults
    pub fn new(dimensions: usize, ngram: usize) -> Self {
        Self {
            dimensions: if dimensions == 0 {
                Self::DEFAULT_DIMENSIONS
            } else {
                dimensions
            },
            ngram: if ngram == 0 { Self::DEFAULT_NGRAM } else { ngram },
        }
    }

    /// Synchronous core of [`EmbedderPort::embed`]
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimensions];

        for word in split_words(text) {
            let padded: Vec<char> = std::iter::once('^')
                .chain(word.chars())
                .chain(std::iter::once('$'))
                .collect();

            if padded.len() <= self.ngram {
                self.add_feature(&mut vector, &padded);
                continue;
            }
            for gram in padded.windows(self.ngram) {
                self.add_feature(&mut vector, gram);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }

    fn add_feature(&self, vector: &mut [f32], gram: &[char]) {
        let hash = fnv1a(gram);
        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS, Self::DEFAULT_NGRAM)
    }
}

#[async_trait]
impl EmbedderPort for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut buf = [0u8; 4];
    for c in chars {
        for byte in c.encode_utf8(&mut buf).bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Lowercased words of an identifier or phrase
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in text.trim().chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
