//! 규칙 응답기 - 레코드에서 직접 답을 찾습니다
//!
//! 이름/팀 일치는 대소문자만 무시한 부분 문자열 검사입니다.
//! 토큰 단위로 바꾸지 않습니다: 질문에 이름이 그대로 들어 있어야 합니다.

use crate::knowledge::DriverRecord;

pub const DRIVER_NOT_FOUND: &str = "Could not find that driver. Try asking another way.";
pub const NUMBER_NOT_FOUND: &str = "Could not find that driver.";
pub const TEAM_NOT_FOUND: &str = "Could not find that team.";

/// 이름이 질문에 들어 있는 첫 레코드 (로드 순서)
fn find_named<'a>(records: &'a [DriverRecord], question: &str) -> Option<(&'a DriverRecord, String)> {
    let question = question.to_lowercase();

    records.iter().find_map(|record| {
        let name = record.full_name();
        if !name.is_empty() && question.contains(&name.to_lowercase()) {
            Some((record, name))
        } else {
            None
        }
    })
}

/// "X는 어느 팀?" → "<name> plays for <team>"
pub fn answer_team(records: &[DriverRecord], question: &str) -> String {
    match find_named(records, question) {
        Some((record, name)) => format!("{} plays for {}", name, record.team_or_sentinel()),
        None => DRIVER_NOT_FOUND.to_string(),
    }
}

/// "X의 번호?" → "<name> uses number <n>"
pub fn answer_number(records: &[DriverRecord], question: &str) -> String {
    match find_named(records, question) {
        Some((record, name)) => format!("{} uses number {}", name, record.number_or_sentinel()),
        None => NUMBER_NOT_FOUND.to_string(),
    }
}

/// "팀 Y에 누가?" → "<team> drivers: a, b"
///
/// 첫 단계는 팀 이름의 부분 문자열 검사로 기준 레코드를 찾고,
/// 둘째 단계는 그 팀 이름과 (대소문자 무시) 정확히 같은 레코드만 모읍니다.
pub fn answer_roster(records: &[DriverRecord], question: &str) -> String {
    let question = question.to_lowercase();

    let seed = records.iter().find(|record| {
        record
            .team()
            .is_some_and(|team| question.contains(&team.to_lowercase()))
    });

    let Some(seed) = seed else {
        return TEAM_NOT_FOUND.to_string();
    };
    let team = seed.team_or_sentinel();

    // 수집 단계는 공백 정리 전의 원래 팀 이름끼리 비교
    let seed_raw = seed.team_name.as_deref().map(str::to_lowercase);
    let names: Vec<String> = records
        .iter()
        .filter(|r| r.team_name.as_deref().map(str::to_lowercase) == seed_raw)
        .map(|r| r.display_name())
        .collect();

    format!("{} drivers: {}", team, names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(first: &str, last: &str, number: u32, team: &str) -> DriverRecord {
        DriverRecord {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            driver_number: Some(number),
            team_name: Some(team.to_string()),
            country: None,
        }
    }

    fn grid() -> Vec<DriverRecord> {
        vec![
            driver("Max", "Verstappen", 1, "Red Bull Racing"),
            driver("Lando", "Norris", 4, "McLaren"),
            driver("Charles", "Leclerc", 16, "Ferrari"),
            driver("Carlos", "Sainz", 55, "Ferrari"),
        ]
    }

    #[test]
    fn test_team_found() {
        assert_eq!(
            answer_team(&grid(), "Which team does max verstappen drive for?"),
            "Max Verstappen plays for Red Bull Racing"
        );
    }

    #[test]
    fn test_team_transliterated_name_not_found() {
        assert_eq!(
            answer_team(&grid(), "За какую команду выступает Макс Ферстаппен?"),
            DRIVER_NOT_FOUND
        );
    }

    #[test]
    fn test_team_missing_team_uses_sentinel() {
        let records = vec![DriverRecord {
            first_name: Some("Oliver".to_string()),
            last_name: Some("Bearman".to_string()),
            ..Default::default()
        }];
        assert_eq!(
            answer_team(&records, "Oliver Bearman team?"),
            "Oliver Bearman plays for not available"
        );
    }

    #[test]
    fn test_nameless_record_never_matches() {
        let records = vec![DriverRecord {
            team_name: Some("Haas".to_string()),
            ..Default::default()
        }];
        assert_eq!(answer_team(&records, "any team question"), DRIVER_NOT_FOUND);
    }

    #[test]
    fn test_number_found() {
        let answer = answer_number(&grid(), "Какой номер у Lando Norris?");
        assert_eq!(answer, "Lando Norris uses number 4");
    }

    #[test]
    fn test_number_not_found() {
        assert_eq!(answer_number(&grid(), "Какой номер у Ландо Норриса?"), NUMBER_NOT_FOUND);
    }

    #[test]
    fn test_first_match_in_load_order() {
        let mut records = grid();
        records.insert(0, driver("Max", "Verstappen", 33, "Toro Rosso"));
        assert_eq!(
            answer_number(&records, "Max Verstappen number"),
            "Max Verstappen uses number 33"
        );
    }

    #[test]
    fn test_roster_load_order() {
        assert_eq!(
            answer_roster(&grid(), "Кто выступает за Ferrari?"),
            "Ferrari drivers: Charles Leclerc, Carlos Sainz"
        );
    }

    #[test]
    fn test_roster_case_insensitive() {
        assert_eq!(
            answer_roster(&grid(), "who drives for MCLAREN"),
            "McLaren drivers: Lando Norris"
        );
    }

    #[test]
    fn test_roster_substring_seed_exact_collect() {
        // first substring hit is "Red Bull"; only exact "Red Bull" entries are collected
        let mut records = grid();
        records.insert(0, driver("Sergio", "Perez", 11, "Red Bull"));
        assert_eq!(
            answer_roster(&records, "Who races for Red Bull Racing?"),
            "Red Bull drivers: Sergio Perez"
        );
    }

    #[test]
    fn test_roster_collect_compares_untrimmed_team() {
        let records = vec![
            driver("Charles", "Leclerc", 16, "Ferrari"),
            driver("Carlos", "Sainz", 55, " Ferrari"),
        ];
        assert_eq!(
            answer_roster(&records, "Who drives for Ferrari?"),
            "Ferrari drivers: Charles Leclerc"
        );
    }

    #[test]
    fn test_roster_not_found() {
        assert_eq!(answer_roster(&grid(), "Кто выступает за Williams?"), TEAM_NOT_FOUND);
        assert_eq!(answer_roster(&[], "Ferrari"), TEAM_NOT_FOUND);
    }
}
