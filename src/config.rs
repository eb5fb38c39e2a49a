//! 설정 모듈
//!
//! 환경변수에서 읽고, 없으면 기본값을 사용합니다.
//! CLI 플래그가 주어지면 환경변수보다 우선합니다.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::embedding::has_api_key;

/// OpenF1 API 기본 주소
/// source: https://openf1.org/
pub const DEFAULT_API_URL: &str = "https://api.openf1.org/v1";

/// 세션 조회 시 기본 시즌
pub const DEFAULT_SESSION_YEAR: i32 = 2024;

/// HTTP 타임아웃
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Data Directory
// ============================================================================

/// 데이터 디렉토리 경로 (~/.pitwall/)
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PITWALL_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pitwall")
}

// ============================================================================
// Embedder Kind
// ============================================================================

/// 사용할 임베딩 프로바이더
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Gemini API (GEMINI_API_KEY 필요)
    Gemini,
    /// 오프라인 해시 임베딩
    Hash,
    /// 로컬 all-MiniLM-L6-v2 (`local-model` feature)
    Local,
}

impl EmbedderKind {
    /// 문자열에서 파싱 (대소문자 무시)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "hash" => Some(Self::Hash),
            "local" | "minilm" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Hash => "hash",
            Self::Local => "local",
        }
    }

    /// API 키가 있으면 Gemini, 없으면 해시 임베딩
    fn detect() -> Self {
        if has_api_key() {
            Self::Gemini
        } else {
            Self::Hash
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub embedder: EmbedderKind,
    pub session_year: i32,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// 환경변수에서 설정 로드
    ///
    /// - `PITWALL_DATA_DIR`
    /// - `PITWALL_API_URL`
    /// - `PITWALL_EMBEDDER` (gemini | hash | local)
    /// - `PITWALL_SESSION_YEAR`
    pub fn from_env() -> Result<Self> {
        let api_url = match env_value("PITWALL_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => parse_api_url(DEFAULT_API_URL)?,
        };

        let embedder = match env_value("PITWALL_EMBEDDER") {
            Some(raw) => EmbedderKind::parse(&raw).with_context(|| {
                format!("Unknown PITWALL_EMBEDDER '{}' (expected gemini, hash or local)", raw)
            })?,
            None => EmbedderKind::detect(),
        };

        let session_year = match env_value("PITWALL_SESSION_YEAR") {
            Some(raw) => raw
                .parse::<i32>()
                .with_context(|| format!("Invalid PITWALL_SESSION_YEAR '{}'", raw))?,
            None => DEFAULT_SESSION_YEAR,
        };

        let config = Self {
            data_dir: get_data_dir(),
            api_url,
            embedder,
            session_year,
            http_timeout: HTTP_TIMEOUT,
        };

        tracing::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// 데이터 디렉토리 덮어쓰기
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    /// 임베딩 프로바이더 덮어쓰기
    pub fn with_embedder(mut self, kind: Option<EmbedderKind>) -> Self {
        if let Some(kind) = kind {
            self.embedder = kind;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            api_url: DEFAULT_API_URL.to_string(),
            embedder: EmbedderKind::Hash,
            session_year: DEFAULT_SESSION_YEAR,
            http_timeout: HTTP_TIMEOUT,
        }
    }
}

/// API 주소 검증 (끝의 `/` 제거)
pub fn parse_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("Invalid API URL '{}'", raw))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("API URL must be http(s): {}", raw);
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================
