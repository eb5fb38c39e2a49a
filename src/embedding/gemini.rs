//! Gemini 임베딩 프로바이더
//!
//! `batchEmbedContents`로 질문과 팩트를 보냅니다.
//! 요청 하나에 최대 100개까지만 허용되므로 나눠서 보내고 순서대로 합칩니다.
//! 768/1536 차원은 API가 정규화하지 않으므로 클라이언트에서 정규화합니다.
//! source: https://ai.google.dev/gemini-api/docs/embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{normalize, Embedding, EmbeddingProvider};
use crate::config::HTTP_TIMEOUT;
use crate::error::EmbeddingError;

/// Gemini 배치 임베딩 엔드포인트
const GEMINI_BATCH_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-embedding-001:batchEmbedContents";

const GEMINI_MODEL: &str = "models/gemini-embedding-001";

/// 요청 하나당 최대 텍스트 수
const MAX_BATCH_SIZE: usize = 100;

/// 기본 임베딩 차원
pub const DEFAULT_DIMENSION: usize = 768;

/// Google Gemini 임베딩 구현체
#[derive(Debug)]
pub struct GeminiEmbedding {
    api_key: String,
    client: reqwest::Client,
    dimension: usize,
}

impl GeminiEmbedding {
    /// 새 Gemini 임베딩 인스턴스 생성
    pub fn new(api_key: String) -> Result<Self, EmbeddingError> {
        Self::with_dimension(api_key, DEFAULT_DIMENSION)
    }

    /// 차원을 지정하여 생성
    ///
    /// # Arguments
    /// * `api_key` - Google AI API 키
    /// * `dimension` - 임베딩 차원 (768, 1536, 3072 중 선택)
    pub fn with_dimension(api_key: String, dimension: usize) -> Result<Self, EmbeddingError> {
        if ![768, 1536, 3072].contains(&dimension) {
            return Err(EmbeddingError::Unavailable(format!(
                "Invalid dimension: {}. Must be 768, 1536, or 3072",
                dimension
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| EmbeddingError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            dimension,
        })
    }

    fn request_for(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: GEMINI_MODEL.to_string(),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
            task_type: "SEMANTIC_SIMILARITY".to_string(),
            output_dimensionality: Some(self.dimension),
        }
    }

    /// 입력 순서를 유지한 채 `MAX_BATCH_SIZE` 단위로 분할
    fn request_batches(&self, texts: &[String]) -> Vec<BatchEmbedRequest> {
        texts
            .chunks(MAX_BATCH_SIZE)
            .map(|chunk| BatchEmbedRequest {
                requests: chunk.iter().map(|t| self.request_for(t)).collect(),
            })
            .collect()
    }

    async fn send_batch(&self, request: &BatchEmbedRequest) -> Result<Vec<Embedding>, EmbeddingError> {
        // API 키는 URL이 아닌 헤더로 전송
        let response = self
            .client
            .post(GEMINI_BATCH_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EmbeddingError::Request(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }

        parse_batch(&body, request.requests.len(), self.dimension)
    }
}

/// Gemini API 요청 본문
#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
    #[serde(rename = "taskType")]
    task_type: String,
    #[serde(rename = "outputDimensionality", skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Debug, Serialize)]
struct EmbedPart {
    text: String,
}

/// Gemini API 응답
#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Gemini API 에러 응답
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedding {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches = self.request_batches(texts);
        tracing::debug!(
            "Embedding {} texts with Gemini in {} request(s)",
            texts.len(),
            batches.len()
        );

        let mut vectors = Vec::with_capacity(texts.len());
        for batch in &batches {
            vectors.extend(self.send_batch(batch).await?);
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "gemini-embedding-001"
    }
}

fn parse_error(status: u16, body: &str) -> EmbeddingError {
    match serde_json::from_str::<GeminiError>(body) {
        Ok(error) => EmbeddingError::Api {
            status: error.error.status,
            message: error.error.message,
        },
        Err(_) => EmbeddingError::Api {
            status: status.to_string(),
            message: body.to_string(),
        },
    }
}

/// 응답 파싱 + 개수/차원 검증 + 정규화
fn parse_batch(body: &str, expected: usize, dimension: usize) -> Result<Vec<Embedding>, EmbeddingError> {
    let response: BatchEmbedResponse = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::Malformed(format!("Failed to parse embedding response: {}", e)))?;

    if response.embeddings.len() != expected {
        return Err(EmbeddingError::Malformed(format!(
            "expected {} embeddings, got {}",
            expected,
            response.embeddings.len()
        )));
    }

    response
        .embeddings
        .into_iter()
        .map(|e| {
            if e.values.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: e.values.len(),
                });
            }
            let mut values = e.values;
            normalize(&mut values);
            Ok(values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimension() {
        let result = GeminiEmbedding::with_dimension("fake_key".to_string(), 999);
        let err = result.err();
        assert!(err
            .as_ref()
            .map(|e| e.to_string().contains("Invalid dimension"))
            .unwrap_or(false));
    }

    #[test]
    fn test_valid_dimensions() {
        for dim in [768, 1536, 3072] {
            let result = GeminiEmbedding::with_dimension("fake_key".to_string(), dim);
            assert!(result.is_ok());
        }
    }

    #[test]
    fn test_request_serialization() {
        let embedder = GeminiEmbedding::new("fake_key".to_string()).expect("client");
        let request = BatchEmbedRequest {
            requests: vec![embedder.request_for("Team: McLaren")],
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["requests"][0]["model"], GEMINI_MODEL);
        assert_eq!(json["requests"][0]["taskType"], "SEMANTIC_SIMILARITY");
        assert_eq!(json["requests"][0]["outputDimensionality"], 768);
        assert_eq!(json["requests"][0]["content"]["parts"][0]["text"], "Team: McLaren");
    }

    #[test]
    fn test_request_batches_split_in_order() {
        let embedder = GeminiEmbedding::new("fake_key".to_string()).expect("client");
        let texts: Vec<String> = (0..250).map(|i| format!("fact {}", i)).collect();

        let batches = embedder.request_batches(&texts);
        let sizes: Vec<usize> = batches.iter().map(|b| b.requests.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        let first_of_second = &batches[1].requests[0].content.parts[0].text;
        assert_eq!(first_of_second, "fact 100");
        let last = &batches[2].requests[49].content.parts[0].text;
        assert_eq!(last, "fact 249");
    }

    #[test]
    fn test_request_batches_exact_limit() {
        let embedder = GeminiEmbedding::new("fake_key".to_string()).expect("client");
        let texts: Vec<String> = (0..MAX_BATCH_SIZE).map(|i| i.to_string()).collect();
        assert_eq!(embedder.request_batches(&texts).len(), 1);
    }

    #[test]
    fn test_parse_batch_normalizes() {
        let body = r#"{"embeddings":[{"values":[3.0,4.0]},{"values":[0.0,2.0]}]}"#;
        let vectors = parse_batch(body, 2, 2).expect("valid response");
        assert!((vectors[0][0] - 0.6).abs() < 1e-6);
        assert!((vectors[1][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_batch_count_mismatch() {
        let body = r#"{"embeddings":[{"values":[1.0,0.0]}]}"#;
        assert!(matches!(
            parse_batch(body, 2, 2),
            Err(EmbeddingError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_batch_dimension_mismatch() {
        let body = r#"{"embeddings":[{"values":[1.0,0.0,0.0]}]}"#;
        assert!(matches!(
            parse_batch(body, 1, 2),
            Err(EmbeddingError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        match parse_error(400, body) {
            EmbeddingError::Api { status, message } => {
                assert_eq!(status, "INVALID_ARGUMENT");
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match parse_error(502, "Bad Gateway") {
            EmbeddingError::Api { status, message } => {
                assert_eq!(status, "502");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
