//! Knowledge Base - 레코드와 팩트의 불변 스냅샷
//!
//! 로드 단계에서 `KnowledgeBaseBuilder`로 쌓고, `build()` 이후에는
//! 읽기만 가능합니다. 팩트 순서는 삽입 순서입니다.

use super::facts::extract_facts;
use super::record::DriverRecord;

/// 로드 단계용 빌더 (append-only)
#[derive(Debug, Default)]
pub struct KnowledgeBaseBuilder {
    records: Vec<DriverRecord>,
    facts: Vec<String>,
}

impl KnowledgeBaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 추가 + 팩트 추출
    pub fn ingest<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = DriverRecord>,
    {
        for record in records {
            self.facts.extend(extract_facts(&record));
            self.records.push(record);
        }
        self
    }

    pub fn build(self) -> KnowledgeBase {
        tracing::info!(
            "Knowledge base built: {} drivers, {} facts",
            self.records.len(),
            self.facts.len()
        );

        KnowledgeBase {
            records: self.records,
            facts: self.facts,
        }
    }
}

/// 불변 지식 베이스
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<DriverRecord>,
    facts: Vec<String>,
}

impl KnowledgeBase {
    pub fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::new()
    }

    /// 레코드 목록에서 바로 생성
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DriverRecord>,
    {
        let mut builder = Self::builder();
        builder.ingest(records);
        builder.build()
    }

    /// 로드 순서의 레코드
    pub fn records(&self) -> &[DriverRecord] {
        &self.records
    }

    /// 삽입 순서의 팩트
    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// 팩트가 하나도 없는지
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
