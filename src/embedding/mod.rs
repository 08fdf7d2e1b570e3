//! Embedding client seam and the deterministic hash-based default adapter.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    /// Provider was unable to produce embeddings for the supplied input.
    #[error("Failed to generate embeddings: {0}")]
    GenerationFailed(String),
}

/// Interface implemented by embedding backends.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Produce one fixed-dimension vector per supplied text, order-preserving.
    async fn generate_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingClientError>;
}

/// Deterministic embedding client that hashes text content into the vector space.
///
/// Identical input always yields an identical vector, which keeps re-indexing idempotent
/// and tests reproducible. Vectors are L2-normalized whenever the computed norm is
/// nonzero; empty input text maps to the zero vector.
pub struct HashEmbeddingClient {
    dimension: usize,
}

impl HashEmbeddingClient {
    /// Construct a client producing vectors of the given dimension.
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0_f32; self.dimension];

        if text.is_empty() {
            return embedding;
        }

        let digest = Sha256::digest(text.as_bytes());
        for (position, value) in embedding.iter_mut().enumerate() {
            let byte = digest[position % digest.len()];
            *value = f32::from(byte) / 255.0;
        }

        let norm = embedding
            .iter()
            .map(|value| value * value)
            .sum::<f32>()
            .sqrt();

        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingClient for HashEmbeddingClient {
    async fn generate_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingClientError> {
        if self.dimension == 0 {
            return Err(EmbeddingClientError::GenerationFailed(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        if texts.is_empty() {
            return Err(EmbeddingClientError::GenerationFailed(
                "no texts provided".to_string(),
            ));
        }

        tracing::debug!(
            dimension = self.dimension,
            texts = texts.len(),
            "Generating embeddings"
        );

        Ok(texts.iter().map(|text| self.encode(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_yields_identical_vectors() {
        let client = HashEmbeddingClient::new(384);
        let first = client
            .generate_embeddings(vec!["Jane Doe, Software Engineer".into()])
            .await
            .unwrap();
        let second = client
            .generate_embeddings(vec!["Jane Doe, Software Engineer".into()])
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let client = HashEmbeddingClient::new(384);
        let vectors = client
            .generate_embeddings(vec!["alpha".into(), "beta".into()])
            .await
            .unwrap();
        for vector in vectors {
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6, "norm was {norm}");
        }
    }

    #[tokio::test]
    async fn empty_text_maps_to_zero_vector() {
        let client = HashEmbeddingClient::new(16);
        let vectors = client
            .generate_embeddings(vec![String::new()])
            .await
            .unwrap();
        assert_eq!(vectors[0], vec![0.0; 16]);
    }

    #[tokio::test]
    async fn output_preserves_input_order_and_dimension() {
        let client = HashEmbeddingClient::new(64);
        let vectors = client
            .generate_embeddings(vec!["one".into(), "two".into(), "three".into()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|vector| vector.len() == 64));
        assert_ne!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn zero_dimension_is_rejected() {
        let client = HashEmbeddingClient::new(0);
        let error = client
            .generate_embeddings(vec!["text".into()])
            .await
            .unwrap_err();
        assert!(matches!(error, EmbeddingClientError::GenerationFailed(_)));
    }
}
