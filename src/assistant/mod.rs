//! Assistant 모듈 - 규칙 우선, 시맨틱 폴백 질의응답
//!
//! 질문 → 라우터 → (규칙 응답기 | 시맨틱 매처) → 답변 문자열.
//! 지식 베이스는 생성 시점에 고정된 스냅샷을 씁니다.

mod responders;
mod router;
mod semantic;

pub use responders::{
    answer_number, answer_roster, answer_team, DRIVER_NOT_FOUND, NUMBER_NOT_FOUND, TEAM_NOT_FOUND,
};
pub use router::{classify, Category};
pub use semantic::{best_match, SemanticMatch, EMPTY_KNOWLEDGE_BASE};

use crate::embedding::EmbeddingProvider;
use crate::knowledge::KnowledgeBase;

/// 예시 질문 (데모/채팅 안내용)
pub const SAMPLE_QUESTIONS: &[&str] = &[
    "За какую команду выступает Макс Ферстаппен?",
    "Какой номер у Ландо Норриса?",
    "Кто выступает за Red Bull?",
    "Расскажи о Фернандо Алонсо",
];

/// F1 질의응답기
pub struct Assistant {
    knowledge: KnowledgeBase,
    embedder: Box<dyn EmbeddingProvider>,
}

impl Assistant {
    pub fn new(knowledge: KnowledgeBase, embedder: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            knowledge,
            embedder,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// 질문에 답변 (실패해도 항상 문자열)
    pub async fn answer(&self, question: &str) -> String {
        let category = classify(question);
        tracing::debug!("Routing '{}' -> {}", question, category.as_str());

        let records = self.knowledge.records();
        match category {
            Category::Team => answer_team(records, question),
            Category::Number => answer_number(records, question),
            Category::Driver => answer_roster(records, question),
            Category::Semantic => {
                semantic::answer(question, &self.knowledge, self.embedder.as_ref()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{HashEmbedding, UnavailableEmbedding};
    use crate::knowledge::DriverRecord;

    fn assistant() -> Assistant {
        let kb = KnowledgeBase::from_records(vec![DriverRecord {
            first_name: Some("Max".to_string()),
            last_name: Some("Verstappen".to_string()),
            driver_number: Some(1),
            team_name: Some("Red Bull".to_string()),
            country: Some("NED".to_string()),
        }]);
        Assistant::new(kb, Box::new(HashEmbedding::default()))
    }

    #[tokio::test]
    async fn test_routes_to_rules() {
        let assistant = assistant();
        assert_eq!(
            assistant.answer("What team uses number 1? Max Verstappen").await,
            "Max Verstappen plays for Red Bull"
        );
        assert_eq!(
            assistant.answer("max verstappen number").await,
            "Max Verstappen uses number 1"
        );
        assert_eq!(
            assistant.answer("Кто выступает за Red Bull?").await,
            "Red Bull drivers: Max Verstappen"
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_semantic() {
        let answer = assistant().answer("Verstappen NED").await;
        assert!(answer.starts_with("Found: "));
    }

    #[tokio::test]
    async fn test_rules_work_without_embeddings() {
        let assistant = Assistant::new(
            assistant().knowledge().clone(),
            Box::new(UnavailableEmbedding::new("offline")),
        );
        assert_eq!(
            assistant.answer("Max Verstappen team").await,
            "Max Verstappen plays for Red Bull"
        );
        assert!(assistant
            .answer("Расскажи о Максе")
            .await
            .starts_with("Search failed:"));
    }
}
