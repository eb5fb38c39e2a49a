//! CLI 모듈
//!
//! pitwall CLI 명령어 정의 및 구현

mod chat;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::assistant::{Assistant, SAMPLE_QUESTIONS};
use crate::collector::{OpenF1Client, SessionInfo, Standing};
use crate::config::{AppConfig, EmbedderKind};
use crate::embedding::{create_embedder, has_api_key};
use crate::knowledge::{DocumentStore, DriverRecord, KnowledgeBase, DRIVERS_PREFIX, SESSIONS_PREFIX};

pub use chat::{is_stop_word, run_chat, STOP_WORDS};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "pitwall")]
#[command(version, about = "F1 statistics collector and question-answering assistant", long_about = None)]
pub struct Cli {
    /// 데이터 디렉토리 (기본: ~/.pitwall, PITWALL_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 임베딩 프로바이더: gemini, hash, local (PITWALL_EMBEDDER)
    #[arg(long, global = true, value_parser = parse_embedder)]
    pub embedder: Option<EmbedderKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OpenF1에서 드라이버/세션/순위 수집 후 저장
    Collect {
        /// 세션 조회 시즌 (기본: PITWALL_SESSION_YEAR 또는 2024)
        #[arg(short, long)]
        year: Option<i32>,

        /// 최신 세션 순위 조회 건너뛰기
        #[arg(long)]
        skip_standings: bool,
    },

    /// 질문 하나에 답변
    Ask {
        /// 질문
        question: String,
    },

    /// 대화형 채팅
    Chat,

    /// 예시 질문 실행 후 채팅 시작
    Demo,

    /// 상태 확인
    Status,
}

fn parse_embedder(value: &str) -> std::result::Result<EmbedderKind, String> {
    EmbedderKind::parse(value)
        .ok_or_else(|| format!("unknown embedder '{}' (expected gemini, hash or local)", value))
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?
        .with_data_dir(cli.data_dir)
        .with_embedder(cli.embedder);

    match cli.command {
        Commands::Collect {
            year,
            skip_standings,
        } => cmd_collect(&config, year, skip_standings).await,
        Commands::Ask { question } => cmd_ask(&config, &question).await,
        Commands::Chat => cmd_chat(&config).await,
        Commands::Demo => cmd_demo(&config).await,
        Commands::Status => cmd_status(&config),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 수집 명령어 (collect)
///
/// 드라이버와 세션은 파일로 저장하고, 순위는 출력만 합니다.
async fn cmd_collect(config: &AppConfig, year: Option<i32>, skip_standings: bool) -> Result<()> {
    let store = DocumentStore::open(&config.data_dir).context("DocumentStore 열기 실패")?;
    let client = OpenF1Client::new(config)?;

    println!("[*] Collecting F1 data from {}", config.api_url);

    match client.fetch_drivers().await {
        Some(drivers) => {
            print_drivers(&drivers);
            if let Some(path) = store.save(DRIVERS_PREFIX, &drivers)? {
                println!("[OK] Saved drivers to {}", path.display());
            }
        }
        None => println!("[!] Could not fetch drivers"),
    }

    let year = year.unwrap_or(config.session_year);
    match client.fetch_sessions(year).await {
        Some(sessions) => {
            print_sessions(&sessions);
            if let Some(path) = store.save(SESSIONS_PREFIX, &sessions)? {
                println!("[OK] Saved sessions to {}", path.display());
            }
        }
        None => println!("[!] Could not fetch sessions"),
    }

    if !skip_standings {
        match client.fetch_standings().await {
            Some(standings) => print_standings(&standings),
            None => println!("[!] Could not fetch standings"),
        }
    }

    Ok(())
}

/// 질문 명령어 (ask)
async fn cmd_ask(config: &AppConfig, question: &str) -> Result<()> {
    let assistant = load_assistant(config)?;
    println!("{}", assistant.answer(question).await);
    Ok(())
}

/// 채팅 명령어 (chat)
async fn cmd_chat(config: &AppConfig) -> Result<()> {
    let assistant = load_assistant(config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_chat(&assistant, stdin.lock(), &mut stdout).await
}

/// 데모 명령어 (demo)
///
/// 저장된 데이터가 없으면 수집 안내만 출력합니다.
async fn cmd_demo(config: &AppConfig) -> Result<()> {
    let assistant = load_assistant(config)?;
    if assistant.knowledge().records().is_empty() {
        return Ok(());
    }

    println!("\n[*] Sample questions:\n");
    for question in SAMPLE_QUESTIONS {
        println!("Q: {}", question);
        println!("A: {}\n", assistant.answer(question).await);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_chat(&assistant, stdin.lock(), &mut stdout).await
}

/// 상태 명령어 (status)
fn cmd_status(config: &AppConfig) -> Result<()> {
    println!("pitwall v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("[*] Data directory: {}", config.data_dir.display());
    println!("[*] API: {}", config.api_url);
    println!("[*] Embedder: {}", config.embedder.as_str());

    if config.embedder == EmbedderKind::Gemini {
        if has_api_key() {
            println!("[OK] API key: set");
        } else {
            println!("[!] API key: missing");
            println!("    export GEMINI_API_KEY=your-key");
        }
    }

    match DocumentStore::open(&config.data_dir).and_then(|store| {
        let stats = store.stats()?;
        let latest = store.latest(DRIVERS_PREFIX)?;
        Ok((stats, latest))
    }) {
        Ok((stats, latest)) => {
            println!(
                "[OK] Stored documents: {} ({})",
                stats.document_count,
                format_bytes(stats.total_bytes)
            );
            match latest {
                Some(path) => println!("     Latest drivers: {}", path.display()),
                None => println!("[!] No driver data yet. Run `pitwall collect`."),
            }
        }
        Err(e) => println!("[!] Failed to read data directory: {}", e),
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 최신 드라이버 문서로 지식 베이스를 만들고 어시스턴트 생성
fn load_assistant(config: &AppConfig) -> Result<Assistant> {
    let store = DocumentStore::open(&config.data_dir).context("DocumentStore 열기 실패")?;

    let mut builder = KnowledgeBase::builder();
    match store.latest(DRIVERS_PREFIX)? {
        Some(path) => match store.load_records(&path) {
            Ok(records) => {
                builder.ingest(records);
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable driver document: {:#}", e);
                println!("[!] Could not read {}. Run `pitwall collect` again.", path.display());
            }
        },
        None => println!("[!] No driver data found. Run `pitwall collect` first."),
    }

    let knowledge = builder.build();
    if !knowledge.records().is_empty() {
        println!(
            "[OK] Loaded {} drivers, built {} facts",
            knowledge.records().len(),
            knowledge.facts().len()
        );
    }

    Ok(Assistant::new(knowledge, create_embedder(config.embedder)))
}

fn print_drivers(drivers: &[Value]) {
    println!("\n=== F1 DRIVERS ===");
    for raw in drivers.iter().take(10) {
        let driver: DriverRecord = serde_json::from_value(raw.clone()).unwrap_or_default();
        println!(
            "{}. {} - {} ({})",
            driver.number_or_sentinel(),
            driver.display_name(),
            driver.team_or_sentinel(),
            driver.country().unwrap_or(crate::knowledge::NOT_AVAILABLE)
        );
    }
}

fn print_sessions(sessions: &[Value]) {
    println!("\n=== CURRENT SESSIONS ===");
    for raw in sessions.iter().take(5) {
        let session: SessionInfo = serde_json::from_value(raw.clone()).unwrap_or_default();
        println!(
            "{} - {} ({})",
            session
                .session_name
                .as_deref()
                .unwrap_or(crate::knowledge::NOT_AVAILABLE),
            session.meeting_label(),
            session.start_date()
        );
    }
}

fn print_standings(standings: &[Standing]) {
    println!("\n=== LATEST SESSION POSITIONS ===");
    for standing in standings.iter().take(10) {
        let position = standing
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "P{}. {} (#{})",
            position,
            standing.name.as_deref().unwrap_or("unknown driver"),
            standing.driver_number
        );
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
