//! 임베딩 모듈 - 텍스트 벡터화
//!
//! 시맨틱 매처가 질문과 팩트를 같은 공간의 벡터로 바꿀 때 사용합니다.
//!
//! - `GeminiEmbedding`: Gemini API (gemini-embedding-001)
//! - `HashEmbedding`: 네트워크 없이 동작하는 해시 기반 임베딩
//! - `MiniLmEmbedding`: 로컬 all-MiniLM-L6-v2 (`local-model` feature)
//!
//! 모든 프로바이더는 정규화된 벡터를 반환합니다. 실패는 `EmbeddingError`로
//! 돌려주며, 호출자가 패턴 매칭으로 처리합니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let embedder = create_embedder(EmbedderKind::Hash);
//! let vectors = embedder.embed_batch(&["Team: McLaren".to_string()]).await?;
//! ```

mod gemini;
mod hash;
#[cfg(feature = "local-model")]
mod local;

use async_trait::async_trait;

use crate::config::EmbedderKind;
use crate::error::EmbeddingError;

pub use gemini::{GeminiEmbedding, DEFAULT_DIMENSION};
pub use hash::{HashEmbedding, HASH_DIMENSION};
#[cfg(feature = "local-model")]
pub use local::MiniLmEmbedding;

/// 임베딩 벡터
pub type Embedding = Vec<f32>;

// ============================================================================
// EmbeddingProvider Trait
// ============================================================================

/// 임베딩 프로바이더 트레이트
///
/// 텍스트 목록을 같은 길이의 벡터 목록으로 변환합니다.
/// 상태를 갖지 않으며 재진입 가능해야 합니다.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// 배치 임베딩 - 입력 순서와 같은 순서로 반환
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// 단일 텍스트 임베딩 (기본 구현: 배치 호출)
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Malformed("provider returned no embeddings".to_string()))
    }

    /// 임베딩 차원 수
    fn dimension(&self) -> usize;

    /// 프로바이더 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Unavailable Provider
// ============================================================================

/// 생성에 실패한 프로바이더 자리를 채우는 구현체
///
/// 모든 호출이 생성 당시의 사유로 `EmbeddingError::Unavailable`을 반환합니다.
/// 키워드 규칙으로 답할 수 있는 질문은 임베딩 없이도 계속 동작합니다.
#[derive(Debug, Clone)]
pub struct UnavailableEmbedding {
    reason: String,
}

impl UnavailableEmbedding {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for UnavailableEmbedding {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Err(EmbeddingError::Unavailable(self.reason.clone()))
    }

    fn dimension(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

// ============================================================================
// Vector Utilities
// ============================================================================

/// 내적
///
/// 길이가 다르면 짧은 쪽 기준으로 계산합니다. 차원 검증은 호출자 책임입니다.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 정규화 (영벡터는 그대로)
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

// ============================================================================
// API Key Management
// ============================================================================

/// API 키 로드 (환경변수에서)
///
/// 우선순위:
/// 1. `GEMINI_API_KEY` 환경변수
/// 2. `GOOGLE_AI_API_KEY` 환경변수
pub fn get_api_key() -> Option<String> {
    for var in ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                tracing::debug!("Using API key from {}", var);
                return Some(key);
            }
        }
    }
    None
}

/// API 키 존재 여부 확인
pub fn has_api_key() -> bool {
    get_api_key().is_some()
}

// ============================================================================
// Factory Function
// ============================================================================

/// 설정에 맞는 임베딩 프로바이더 생성
///
/// 생성에 실패하면 경고를 남기고 `UnavailableEmbedding`을 돌려줍니다.
pub fn create_embedder(kind: EmbedderKind) -> Box<dyn EmbeddingProvider> {
    match try_create_embedder(kind) {
        Ok(embedder) => {
            tracing::info!(
                "Using {} embedding (dimension: {})",
                embedder.name(),
                embedder.dimension()
            );
            embedder
        }
        Err(e) => {
            tracing::warn!("Embedding provider '{}' unavailable: {}", kind.as_str(), e);
            Box::new(UnavailableEmbedding::new(e.to_string()))
        }
    }
}

fn try_create_embedder(kind: EmbedderKind) -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    match kind {
        EmbedderKind::Gemini => {
            let api_key = get_api_key().ok_or_else(|| {
                EmbeddingError::Unavailable(
                    "GEMINI_API_KEY or GOOGLE_AI_API_KEY not set".to_string(),
                )
            })?;
            Ok(Box::new(GeminiEmbedding::new(api_key)?))
        }
        EmbedderKind::Hash => Ok(Box::new(HashEmbedding::default())),
        #[cfg(feature = "local-model")]
        EmbedderKind::Local => Ok(Box::new(MiniLmEmbedding::new()?)),
        #[cfg(not(feature = "local-model"))]
        EmbedderKind::Local => Err(EmbeddingError::Unavailable(
            "built without the `local-model` feature".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
