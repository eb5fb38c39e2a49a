//! 해시 임베딩 - 네트워크/모델 없이 동작하는 오프라인 프로바이더
//!
//! 단어와 단어 내부 문자 trigram을 SHA-256으로 해시하여 고정 길이 벡터의
//! 버킷에 부호와 함께 더한 뒤 L2 정규화합니다 (feature hashing).
//! 같은 입력은 플랫폼/실행과 무관하게 항상 같은 벡터가 됩니다.

use async_trait::async_trait;
use regex::Regex;
use sha2::{Digest, Sha256};

use super::{normalize, Embedding, EmbeddingProvider};
use crate::error::EmbeddingError;

/// 기본 차원
pub const HASH_DIMENSION: usize = 256;

/// trigram 가중치 (단어 전체 일치보다 약하게)
const TRIGRAM_WEIGHT: f32 = 0.5;

/// 해시 기반 임베딩
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str, token_re: Option<&Regex>) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text, token_re) {
            self.accumulate(&mut vector, &token, 1.0);

            let padded: Vec<char> = format!("#{}#", token).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut vector, &trigram, TRIGRAM_WEIGHT);
            }
        }

        normalize(&mut vector);
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(HASH_DIMENSION)
    }
}

/// 소문자 단어 토큰 (유니코드 `\w`)
fn tokenize(text: &str, token_re: Option<&Regex>) -> Vec<String> {
    let lower = text.to_lowercase();
    match token_re {
        Some(re) => re.find_iter(&lower).map(|m| m.as_str().to_string()).collect(),
        None => lower.split_whitespace().map(str::to_string).collect(),
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let token_re = Regex::new(r"\w+").ok();
        Ok(texts
            .iter()
            .map(|t| self.embed_one(t, token_re.as_ref()))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}
