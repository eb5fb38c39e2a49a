//! 규칙 라우터 - 키워드로 질문 분류
//!
//! 팀 → 번호 → 드라이버 순서로 검사하고, 처음 맞는 분류가 이깁니다.
//! 아무것도 맞지 않으면 시맨틱 검색으로 넘깁니다.

/// 질문 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 드라이버가 어느 팀인지
    Team,
    /// 드라이버의 차량 번호
    Number,
    /// 팀의 드라이버 명단
    Driver,
    /// 임베딩 유사도 검색
    Semantic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Number => "number",
            Self::Driver => "driver",
            Self::Semantic => "semantic",
        }
    }
}

/// 러시아어는 어간으로 적어 격변화("команду", "водителя")도 잡습니다.
const TEAM_KEYWORDS: &[&str] = &["team", "команд", "за кого"];
const NUMBER_KEYWORDS: &[&str] = &["number", "номер"];
const DRIVER_KEYWORDS: &[&str] = &[
    "driver",
    "who drives",
    "who races",
    "пилот",
    "водител",
    "кто выступает",
];

/// 검사 순서 = 우선순위
const ROUTES: &[(&[&str], Category)] = &[
    (TEAM_KEYWORDS, Category::Team),
    (NUMBER_KEYWORDS, Category::Number),
    (DRIVER_KEYWORDS, Category::Driver),
];

/// 질문 분류 (대소문자 무시, 부분 문자열 검사)
pub fn classify(question: &str) -> Category {
    let lower = question.to_lowercase();

    ROUTES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Semantic)
}
