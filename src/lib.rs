//! pitwall - F1 통계 수집 + 질의응답
//!
//! OpenF1 API에서 드라이버 데이터를 수집해 JSON으로 저장하고,
//! 키워드 규칙과 임베딩 유사도 검색으로 드라이버/팀 질문에 답합니다.

pub mod assistant;
pub mod cli;
pub mod collector;
pub mod config;
pub mod embedding;
pub mod error;
pub mod knowledge;

// Re-exports
pub use assistant::{classify, Assistant, Category, SemanticMatch};
pub use collector::{OpenF1Client, SessionInfo, Standing};
pub use config::{AppConfig, EmbedderKind};
pub use embedding::{
    create_embedder, EmbeddingProvider, GeminiEmbedding, HashEmbedding, UnavailableEmbedding,
};
pub use error::{CollectorError, EmbeddingError};
pub use knowledge::{
    extract_facts, DocumentStore, DriverRecord, KnowledgeBase, KnowledgeBaseBuilder, NOT_AVAILABLE,
};
