//! 로컬 문장 임베딩 - all-MiniLM-L6-v2 (fastembed, ONNX)
//!
//! 첫 사용 시 모델을 내려받습니다 (~90MB). 384차원, 정규화된 벡터.

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::{Embedding, EmbeddingProvider};
use crate::error::EmbeddingError;

const MINILM_DIMENSION: usize = 384;

/// fastembed 기반 MiniLM 임베딩
pub struct MiniLmEmbedding {
    model: Mutex<TextEmbedding>,
}

impl MiniLmEmbedding {
    pub fn new() -> Result<Self, EmbeddingError> {
        let opts = InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(true);

        TextEmbedding::try_new(opts)
            .map(|model| Self {
                model: Mutex::new(model),
            })
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for MiniLmEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self
            .model
            .lock()
            .map_err(|e| EmbeddingError::Unavailable(format!("Lock error: {}", e)))?;

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = model
            .embed(inputs, None)
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        MINILM_DIMENSION
    }

    fn name(&self) -> &str {
        "sentence-transformers/all-MiniLM-L6-v2"
    }
}
