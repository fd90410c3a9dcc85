#![allow(clippy::unwrap_used)]
//! End-to-end pipeline scenarios with a stand-in model backend.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use blogtl_cli::config::default_targets;
use blogtl_cli::metrics::{InferenceRecord, MetricsSink, SqliteSink, recent_logs};
use blogtl_cli::pipeline::{Pipeline, PipelineConfig};
use blogtl_cli::translation::{Inference, InferenceClient, InferenceRequest, PromptRules};
use tempfile::TempDir;

/// Replies with canned text keyed on the model, in call order.
struct CannedBackend {
    replies: RefCell<VecDeque<&'static str>>,
    models: RefCell<Vec<String>>,
}

impl CannedBackend {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().copied().collect()),
            models: RefCell::new(Vec::new()),
        }
    }
}

impl InferenceClient for CannedBackend {
    async fn infer(&self, request: &InferenceRequest<'_>) -> Result<Inference> {
        self.models.borrow_mut().push(request.model.to_string());
        let Some(text) = self.replies.borrow_mut().pop_front() else {
            bail!("backend unreachable");
        };
        Ok(Inference {
            text: text.to_string(),
            latency_ms: 120.0,
            tokens_per_sec: 42.5,
        })
    }
}

#[derive(Default)]
struct CountingSink {
    targets: Vec<String>,
}

impl MetricsSink for CountingSink {
    fn record(&mut self, record: &InferenceRecord<'_>) {
        self.targets.push(record.target_lang.to_string());
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        source_lang: "ko".to_string(),
        targets: default_targets(),
        prompts: PromptRules::default(),
    }
}

fn write_post(root: &Path, content: &str) -> std::path::PathBuf {
    let path = root.join("content/blog/ko/hello.mdx");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_post_translated_into_english_and_japanese() {
    let dir = TempDir::new().unwrap();
    let post = write_post(
        dir.path(),
        "---\ntitle: '로컬 LLM 시작하기'\ndescription: \"집에서 모델 돌리기\"\npubDate: 2025-03-01\ntags: ['LLM', '개발']\n---\n\n# 소개\n\n오늘은 Ollama를 설치했다.\n",
    );
    let backend = CannedBackend::new(&[
        "Getting Started with Local LLMs",
        "\"Running models at home\"",
        "```\n['LLM', 'Development']\n```",
        "# Intro\n\nToday I installed Ollama.",
        "ローカルLLM入門",
        "自宅でモデルを動かす",
        "['LLM', '開発']",
        "# はじめに\n\n今日はOllamaをインストールしました。",
    ]);
    let mut pipeline = Pipeline::new(config(), backend, CountingSink::default());

    let report = pipeline.process(&post).await.unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(dir.path().join("content/blog/en/hello.mdx")).unwrap(),
        "---\ntitle: 'Getting Started with Local LLMs'\ndescription: \"Running models at home\"\npubDate: 2025-03-01\ntags: ['LLM', 'Development']\n---\n\n# Intro\n\nToday I installed Ollama.\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("content/blog/jp/hello.mdx")).unwrap(),
        "---\ntitle: 'ローカルLLM入門'\ndescription: \"自宅でモデルを動かす\"\npubDate: 2025-03-01\ntags: ['LLM', '開発']\n---\n\n# はじめに\n\n今日はOllamaをインストールしました。\n"
    );

    let sink_targets = &pipeline.translator().sink().targets;
    assert_eq!(sink_targets.len(), 8);
    assert!(sink_targets[..4].iter().all(|t| t == "EN"));
    assert!(sink_targets[4..].iter().all(|t| t == "JP"));
}

#[tokio::test]
async fn test_models_follow_target_language() {
    let dir = TempDir::new().unwrap();
    let post = write_post(dir.path(), "본문\n");
    let backend = CannedBackend::new(&["Body", "本文"]);
    let mut pipeline = Pipeline::new(config(), backend, CountingSink::default());

    pipeline.process(&post).await.unwrap();

    let models = pipeline.translator().client().models.borrow().clone();
    assert_eq!(models, ["gemma2:9b", "qwen2.5:7b"]);
}

#[tokio::test]
async fn test_metrics_outage_still_writes_translation() {
    let dir = TempDir::new().unwrap();
    let post = write_post(dir.path(), "---\ntitle: '제목'\n---\n본문\n");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let sink = SqliteSink::open(blocker.join("metrics.db"));
    assert!(!sink.is_connected());

    let backend = CannedBackend::new(&["Title", "Body", "タイトル", "本文"]);
    let mut pipeline = Pipeline::new(config(), backend, sink);

    let report = pipeline.process(&post).await.unwrap();
    pipeline.close();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(dir.path().join("content/blog/en/hello.mdx")).unwrap(),
        "---\ntitle: 'Title'\n---\nBody\n"
    );
}

#[tokio::test]
async fn test_every_call_lands_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let post = write_post(dir.path(), "---\ntitle: '제목'\ntags: ['태그']\n---\n본문\n");
    let db = dir.path().join("data/metrics.db");

    let backend = CannedBackend::new(&["Title", "['Tag']", "Body", "タイトル", "['タグ']", "本文"]);
    let mut pipeline = Pipeline::new(config(), backend, SqliteSink::open(db.clone()));
    pipeline.process(&post).await.unwrap();
    pipeline.close();

    let rows = recent_logs(&db, 100).unwrap();
    assert_eq!(rows.len(), 6);
    // Newest first
    assert_eq!(rows[0].target_lang, "JP");
    assert_eq!(rows[5].target_lang, "EN");
    assert!(rows.iter().all(|r| r.source_lang == "KO"));
    assert!(rows.iter().all(|r| r.similarity_score.is_none()));
    assert!(rows.iter().all(|r| (r.tokens_per_sec - 42.5).abs() < f64::EPSILON));
}

#[tokio::test]
async fn test_unreachable_backend_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let post = write_post(dir.path(), "---\ntitle: '제목'\n---\n본문\n");
    let mut pipeline = Pipeline::new(config(), CannedBackend::new(&[]), CountingSink::default());

    let report = pipeline.process(&post).await.unwrap();

    assert_eq!(report.failed().count(), 2);
    assert!(!dir.path().join("content/blog/en/hello.mdx").exists());
    assert!(!dir.path().join("content/blog/jp/hello.mdx").exists());
    assert!(pipeline.translator().sink().targets.is_empty());
}
