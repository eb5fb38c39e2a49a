//! Knowledge 모듈 - 드라이버 레코드와 팩트 지식 베이스
//!
//! - Record: OpenF1 드라이버 프로필
//! - Facts: 레코드 → 짧은 문장
//! - Base: 로드 시점에 만드는 불변 스냅샷
//! - Store: JSON 문서 저장/로드

mod base;
mod facts;
mod record;
mod store;

// Re-exports
pub use base::{KnowledgeBase, KnowledgeBaseBuilder};
pub use facts::extract_facts;
pub use record::{DriverRecord, NOT_AVAILABLE};
pub use store::{DocumentStore, StoreStats, StoredDocument, DRIVERS_PREFIX, SESSIONS_PREFIX};
