//! 팩트 추출 - 레코드 한 개를 짧은 문장 여러 개로 변환
//!
//! 신원 / 번호 / 팀 / 국가 순서. 필드가 없는 문장은 만들지 않습니다.

use super::record::DriverRecord;

/// 레코드에서 팩트 추출 (순수 함수)
pub fn extract_facts(record: &DriverRecord) -> Vec<String> {
    let full_name = record.full_name();
    let number = record.driver_number.map(|n| n.to_string());

    let candidates = [
        (!full_name.is_empty()).then(|| format!("Driver {}", full_name)),
        number.map(|n| format!("Car number: {}", n)),
        record.team().map(|t| format!("Team: {}", t)),
        record.country().map(|c| format!("Country: {}", c)),
    ];

    candidates.into_iter().flatten().collect()
}
