//! 드라이버 레코드 - OpenF1 `/drivers` 객체 한 개
//!
//! 필드는 모두 선택적입니다. 없거나 빈 값은 `NOT_AVAILABLE`로 읽힙니다.
//! API 원본에 있는 다른 필드(headshot_url, session_key 등)는 무시합니다.

use serde::{Deserialize, Deserializer, Serialize};

/// 없는 필드 자리에 쓰는 값
pub const NOT_AVAILABLE: &str = "not available";

/// 드라이버 프로필
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// API는 숫자로 주지만 문자열도 허용
    #[serde(
        default,
        deserialize_with = "deserialize_driver_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub driver_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,

    /// OpenF1은 `country_code`로 줍니다 (저장 시에는 `country`)
    #[serde(default, alias = "country_code", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl DriverRecord {
    /// "이름 성" (있는 부분만, 둘 다 없으면 빈 문자열)
    pub fn full_name(&self) -> String {
        [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 표시용 이름 (없으면 `NOT_AVAILABLE`)
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            name
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        present(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        present(&self.last_name)
    }

    pub fn team(&self) -> Option<&str> {
        present(&self.team_name)
    }

    pub fn country(&self) -> Option<&str> {
        present(&self.country)
    }

    /// 팀 이름 (없으면 `NOT_AVAILABLE`)
    pub fn team_or_sentinel(&self) -> &str {
        self.team().unwrap_or(NOT_AVAILABLE)
    }

    /// 차량 번호 (없으면 `NOT_AVAILABLE`)
    pub fn number_or_sentinel(&self) -> String {
        self.driver_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

/// 숫자 또는 숫자 문자열. 해석할 수 없으면 없는 값으로 취급합니다.
fn deserialize_driver_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer).unwrap_or(None);

    Ok(match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(text)) => {
            let parsed = text.trim().parse().ok();
            if parsed.is_none() {
                tracing::debug!("Ignoring non-numeric driver_number '{}'", text);
            }
            parsed
        }
        None => None,
    })
}
