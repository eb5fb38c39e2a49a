//! OpenF1 수집 모듈
//!
//! OpenF1 REST API에서 드라이버/세션/포지션 데이터를 가져옵니다.
//! 네트워크 실패는 여기서 잡아서 로그를 남기고 `None`을 돌려줍니다.
//! 재시도나 페이지네이션은 하지 않습니다.
//!
//! source: https://openf1.org/

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::CollectorError;
use crate::knowledge::DriverRecord;

// ============================================================================
// Types
// ============================================================================

/// `/sessions` 객체 중 필요한 필드
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub session_key: Option<u64>,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
}

impl SessionInfo {
    /// 회의 이름 (없으면 개최지)
    pub fn meeting_label(&self) -> &str {
        self.meeting_name
            .as_deref()
            .or(self.location.as_deref())
            .unwrap_or(crate::knowledge::NOT_AVAILABLE)
    }

    /// 시작 날짜 (YYYY-MM-DD)
    pub fn start_date(&self) -> &str {
        match self.date_start.as_deref() {
            Some(date) => date.get(..10).unwrap_or(date),
            None => crate::knowledge::NOT_AVAILABLE,
        }
    }
}

/// `/position` 객체
#[derive(Debug, Clone, Deserialize)]
pub struct PositionUpdate {
    #[serde(default)]
    pub driver_number: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
}

/// 세션 내 드라이버의 마지막 순위
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub driver_number: u32,
    pub position: Option<u32>,
    /// 드라이버 목록에서 찾은 이름
    pub name: Option<String>,
}

// ============================================================================
// OpenF1Client
// ============================================================================

/// OpenF1 API 클라이언트
pub struct OpenF1Client {
    client: reqwest::Client,
    base_url: String,
}

impl OpenF1Client {
    /// 새 클라이언트 생성
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pitwall/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET + JSON 배열 디코딩
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<Vec<T>, CollectorError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| CollectorError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| CollectorError::Decode { url, source })
    }

    /// 실패를 로그로 바꾸고 `None` 반환
    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Option<Vec<T>> {
        match self.get_json(path, query).await {
            Ok(items) => {
                tracing::info!("Fetched {} items from /{}", items.len(), path);
                Some(items)
            }
            Err(e) => {
                tracing::warn!("OpenF1 request failed: {}", e);
                None
            }
        }
    }

    /// 전체 드라이버 (원본 JSON 객체, 저장용)
    pub async fn fetch_drivers(&self) -> Option<Vec<Value>> {
        self.fetch("drivers", &[]).await
    }

    /// 해당 시즌의 최신 세션 (원본 JSON 객체, 저장용)
    pub async fn fetch_sessions(&self, year: i32) -> Option<Vec<Value>> {
        self.fetch(
            "sessions",
            &[("year", year.to_string()), ("session_key", "latest".to_string())],
        )
        .await
    }

    /// 최신 세션의 드라이버별 마지막 순위
    pub async fn fetch_standings(&self) -> Option<Vec<Standing>> {
        let sessions: Vec<SessionInfo> = self
            .fetch("sessions", &[("session_key", "latest".to_string())])
            .await?;

        let Some(session_key) = sessions.first().and_then(|s| s.session_key) else {
            tracing::warn!("No session data available");
            return None;
        };

        let positions: Vec<PositionUpdate> = self
            .fetch("position", &[("session_key", session_key.to_string())])
            .await?;

        let drivers: Vec<DriverRecord> = self.fetch("drivers", &[]).await?;

        Some(compute_standings(&positions, &drivers))
    }
}

/// 드라이버 번호별 마지막 순위 (처음 등장한 순서 유지) + 이름 매칭
pub fn compute_standings(positions: &[PositionUpdate], drivers: &[DriverRecord]) -> Vec<Standing> {
    let mut order: Vec<u32> = Vec::new();
    let mut latest: HashMap<u32, Option<u32>> = HashMap::new();

    for update in positions {
        let Some(number) = update.driver_number else {
            continue;
        };
        if !latest.contains_key(&number) {
            order.push(number);
        }
        latest.insert(number, update.position);
    }

    order
        .into_iter()
        .map(|number| Standing {
            driver_number: number,
            position: latest.get(&number).copied().flatten(),
            name: drivers
                .iter()
                .find(|d| d.driver_number == Some(number))
                .map(|d| d.full_name())
                .filter(|n| !n.is_empty()),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
