//! Document Store - JSON 파일 기반 문서 저장소
//!
//! 수집한 API 응답을 `<prefix>_<YYYYmmdd_HHMM>.json`으로 저장하고,
//! 접두사로 골라서 다시 읽습니다.
//! 저장 위치: ~/.pitwall/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::record::DriverRecord;

/// 드라이버 문서 접두사
pub const DRIVERS_PREFIX: &str = "drivers";
/// 세션 문서 접두사
pub const SESSIONS_PREFIX: &str = "sessions";

// ============================================================================
// Types
// ============================================================================

/// 저장된 문서 정보
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub path: PathBuf,
    pub prefix: String,
    pub size_bytes: u64,
}

/// 저장소 통계
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub document_count: usize,
    pub total_bytes: u64,
    pub data_dir: PathBuf,
}

// ============================================================================
// DocumentStore
// ============================================================================

/// JSON 문서 저장소
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// 저장소 열기 (디렉토리가 없으면 생성)
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 문서 저장 (빈 목록은 저장하지 않음)
    ///
    /// # Returns
    /// 저장한 파일 경로, 저장하지 않았으면 `None`
    pub fn save<T: Serialize>(&self, prefix: &str, items: &[T]) -> Result<Option<PathBuf>> {
        self.save_at(prefix, items, Local::now())
    }

    fn save_at<T: Serialize>(
        &self,
        prefix: &str,
        items: &[T],
        now: DateTime<Local>,
    ) -> Result<Option<PathBuf>> {
        if items.is_empty() {
            tracing::debug!("Nothing to save for '{}'", prefix);
            return Ok(None);
        }

        let file_name = format!("{}_{}.json", prefix, now.format("%Y%m%d_%H%M"));
        let path = self.dir.join(file_name);

        let json = serde_json::to_string_pretty(items).context("Failed to serialize documents")?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;

        tracing::info!("Saved {} items to {:?}", items.len(), path);
        Ok(Some(path))
    }

    /// 접두사에 맞는 문서 목록 (파일 이름 순 = 시간 순)
    pub fn list(&self, prefix: &str) -> Result<Vec<PathBuf>> {
        let wanted = format!("{}_", prefix);
        let mut paths: Vec<PathBuf> = self
            .documents()?
            .into_iter()
            .filter(|doc| file_name(&doc.path).starts_with(&wanted))
            .map(|doc| doc.path)
            .collect();

        paths.sort();
        Ok(paths)
    }

    /// 가장 최근 문서
    pub fn latest(&self, prefix: &str) -> Result<Option<PathBuf>> {
        Ok(self.list(prefix)?.pop())
    }

    /// 문서 읽기
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let items = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(items)
    }

    /// 드라이버 레코드 읽기
    ///
    /// 원소 단위로 변환합니다. 형식이 잘못된 원소는 경고 후 건너뜁니다.
    /// 파일 자체를 읽거나 배열로 파싱할 수 없으면 에러입니다.
    pub fn load_records(&self, path: &Path) -> Result<Vec<DriverRecord>> {
        let raw: Vec<Value> = self.load(path)?;
        let total = raw.len();

        let records: Vec<DriverRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping driver #{} in {:?}: {}", i, path, e);
                    None
                }
            })
            .collect();

        tracing::info!(
            "Loaded {} drivers from {:?} ({} skipped)",
            records.len(),
            path,
            total - records.len()
        );
        Ok(records)
    }

    /// 저장된 모든 JSON 문서
    pub fn documents(&self) -> Result<Vec<StoredDocument>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory {:?}", self.dir))?;

        let mut docs = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let name = file_name(&path);
            if !path.is_file() || !name.ends_with(".json") {
                continue;
            }

            // "drivers_20240101_1200.json" -> "drivers"
            let stem = name.trim_end_matches(".json");
            let prefix = match stem.rsplitn(3, '_').nth(2) {
                Some(p) => p.to_string(),
                None => continue,
            };

            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            docs.push(StoredDocument {
                path,
                prefix,
                size_bytes,
            });
        }

        docs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(docs)
    }

    /// 저장소 통계
    pub fn stats(&self) -> Result<StoreStats> {
        let docs = self.documents()?;
        Ok(StoreStats {
            document_count: docs.len(),
            total_bytes: docs.iter().map(|d| d.size_bytes).sum(),
            data_dir: self.dir.clone(),
        })
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn records() -> Vec<DriverRecord> {
        vec![
            DriverRecord {
                first_name: Some("Lando".to_string()),
                last_name: Some("Norris".to_string()),
                driver_number: Some(4),
                team_name: Some("McLaren".to_string()),
                country: Some("GBR".to_string()),
            },
            DriverRecord {
                first_name: Some("Шарль".to_string()),
                last_name: Some("Леклер".to_string()),
                driver_number: None,
                team_name: Some("Ferrari".to_string()),
                country: None,
            },
        ]
    }

    fn at(minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 26, 14, minute, 0)
            .single()
            .expect("valid local time")
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");

        let path = store
            .save(DRIVERS_PREFIX, &records())
            .expect("save")
            .expect("non-empty list is written");
        let loaded = store.load_records(&path).expect("load");

        assert_eq!(loaded, records());
    }

    #[test]
    fn test_utf8_written_unescaped() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");
        let path = store
            .save(DRIVERS_PREFIX, &records())
            .expect("save")
            .expect("written");

        let raw = std::fs::read_to_string(path).expect("read");
        assert!(raw.contains("Леклер"));
    }

    #[test]
    fn test_empty_list_not_saved() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");
        let empty: Vec<DriverRecord> = Vec::new();
        assert!(store.save(DRIVERS_PREFIX, &empty).expect("save").is_none());
        assert!(store.list(DRIVERS_PREFIX).expect("list").is_empty());
    }

    #[test]
    fn test_file_name_and_prefix_filtering() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");

        let first = store
            .save_at(DRIVERS_PREFIX, &records(), at(5))
            .expect("save")
            .expect("written");
        assert_eq!(file_name(&first), "drivers_20240526_1405.json");

        store
            .save_at(DRIVERS_PREFIX, &records(), at(30))
            .expect("save");
        store
            .save_at(SESSIONS_PREFIX, &[serde_json::json!({"session_name": "Race"})], at(10))
            .expect("save");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let drivers = store.list(DRIVERS_PREFIX).expect("list");
        assert_eq!(drivers.len(), 2);

        let latest = store.latest(DRIVERS_PREFIX).expect("latest").expect("exists");
        assert_eq!(file_name(&latest), "drivers_20240526_1430.json");

        let stats = store.stats().expect("stats");
        assert_eq!(stats.document_count, 3);
        assert!(stats.total_bytes > 0);

        let prefixes: Vec<String> = store
            .documents()
            .expect("documents")
            .into_iter()
            .map(|d| d.prefix)
            .collect();
        assert_eq!(prefixes, vec!["drivers", "drivers", "sessions"]);
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = DocumentStore::open(&nested).expect("open store");
        assert!(store.dir().exists());
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");
        let path = dir.path().join("drivers_20240101_0000.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(store.load_records(&path).is_err());
    }

    #[test]
    fn test_load_records_skips_malformed_entries() {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::open(dir.path()).expect("open store");
        let path = dir.path().join("drivers_20240101_0000.json");
        std::fs::write(
            &path,
            r#"[{"first_name": 5}, "not an object", {"first_name": "Lando", "last_name": "Norris"}]"#,
        )
        .expect("write");

        let records = store.load_records(&path).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name(), "Lando Norris");
    }
}
