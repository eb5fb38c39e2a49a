//! 에러 타입
//!
//! 임베딩 프로바이더와 OpenF1 수집기가 반환하는 타입 에러입니다.
//! CLI 레이어는 `anyhow`로 감싸서 사용합니다.

use thiserror::Error;

/// 임베딩 단계 실패
///
/// 시맨틱 매처는 이 값을 패턴 매칭하여 사용자에게 보여줄 메시지로 변환합니다.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// 프로바이더를 사용할 수 없음 (API 키 없음, 모델 로드 실패 등)
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    /// HTTP 전송 실패
    #[error("embedding request failed: {0}")]
    Request(String),

    /// API가 에러 응답을 반환
    #[error("embedding API error ({status}): {message}")]
    Api { status: String, message: String },

    /// 응답 파싱 실패 또는 입력/출력 개수 불일치
    #[error("malformed embedding response: {0}")]
    Malformed(String),

    /// 벡터 차원이 서로 다름
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// OpenF1 API 호출 실패
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
