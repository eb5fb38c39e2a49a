//! 시맨틱 매처 - 임베딩 내적으로 가장 가까운 팩트 선택
//!
//! 호출마다 질문과 모든 팩트를 새로 임베딩합니다 (캐시 없음).
//! 점수가 같으면 지식 베이스 순서상 먼저 나온 팩트가 이깁니다.
//! NaN/무한대 점수는 후보에서 제외합니다.

use crate::embedding::{dot, EmbeddingProvider};
use crate::error::EmbeddingError;
use crate::knowledge::KnowledgeBase;

pub const EMPTY_KNOWLEDGE_BASE: &str = "The knowledge base is empty. Collect F1 data first.";

/// 선택된 팩트
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    /// 지식 베이스 내 위치
    pub index: usize,
    pub fact: String,
    pub score: f32,
}

/// 가장 높은 점수의 팩트
///
/// 지식 베이스가 비어 있으면 `Ok(None)`, 유한한 점수가 하나도 없으면 에러.
pub async fn best_match(
    question: &str,
    knowledge: &KnowledgeBase,
    embedder: &dyn EmbeddingProvider,
) -> Result<Option<SemanticMatch>, EmbeddingError> {
    let facts = knowledge.facts();
    if facts.is_empty() {
        return Ok(None);
    }

    let question_vector = embedder.embed(question).await?;
    let fact_vectors = embedder.embed_batch(facts).await?;

    if fact_vectors.len() != facts.len() {
        return Err(EmbeddingError::Malformed(format!(
            "expected {} fact embeddings, got {}",
            facts.len(),
            fact_vectors.len()
        )));
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, vector) in fact_vectors.iter().enumerate() {
        if vector.len() != question_vector.len() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: question_vector.len(),
                actual: vector.len(),
            });
        }

        let score = dot(vector, &question_vector);
        if !score.is_finite() {
            tracing::warn!("Skipping fact #{} with non-finite score", index);
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    let Some((index, score)) = best else {
        return Err(EmbeddingError::Malformed(
            "no finite similarity scores".to_string(),
        ));
    };

    tracing::debug!("Semantic match #{} (score {:.4}): {}", index, score, facts[index]);
    Ok(Some(SemanticMatch {
        index,
        fact: facts[index].clone(),
        score,
    }))
}

/// 사용자에게 보여줄 답변
///
/// 임베딩 실패는 에러 메시지 문자열로 바꿔서 돌려줍니다.
pub async fn answer(
    question: &str,
    knowledge: &KnowledgeBase,
    embedder: &dyn EmbeddingProvider,
) -> String {
    match best_match(question, knowledge, embedder).await {
        Ok(Some(found)) => format!("Found: {}", found.fact),
        Ok(None) => EMPTY_KNOWLEDGE_BASE.to_string(),
        Err(e) => {
            tracing::warn!("Semantic search failed: {}", e);
            format!("Search failed: {}", e)
        }
    }
}
