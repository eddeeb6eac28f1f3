use crate::cli::Cli;
use crate::codec::standard::StandardImageCodec;
use crate::core::{ProcessingConfig, ProcessingResult, ProcessingSummary};
use crate::engine::ProcessingEngine;
use crate::fetcher::http::HttpImageFetcher;
use crate::image_source::dog_api::DogApiClient;
use crate::services::{ConsoleProgressReporter, DefaultProcessingConfig};
use crate::storage::local::LocalStorageBackend;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// CLI引数から処理設定を組み立てる
pub fn build_config(cli: &Cli) -> DefaultProcessingConfig {
    let mut config = DefaultProcessingConfig::new(num_cpus::get())
        .with_batch_size(cli.limit)
        .with_output_dir(&cli.output_dir)
        .with_output_format(cli.format)
        .with_detectors(cli.primary, cli.comparison)
        .with_progress_reporting(!cli.quiet);

    if let Some(concurrency) = cli.concurrency {
        config = config.with_max_concurrent(concurrency);
    }
    config
}

/// 共有HTTPクライアントを構築する
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Ctrl-C と任意の期限でキャンセルされるトークンを作る
pub fn spawn_cancellation(cancel_after: Option<Duration>) -> CancellationToken {
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, cancelling remaining items");
            token.cancel();
        }
    });

    if let Some(deadline) = cancel_after {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    log::warn!("Deadline of {}s reached, cancelling remaining items", deadline.as_secs());
                    token.cancel();
                }
            }
        });
    }

    cancel
}

/// 1バッチを実行する
pub async fn execute_run(cli: &Cli, cancel: CancellationToken) -> Result<ProcessingResult<ProcessingSummary>> {
    let client = build_http_client(Duration::from_secs(cli.timeout_secs))?;
    let reporter = if cli.quiet {
        ConsoleProgressReporter::quiet()
    } else {
        ConsoleProgressReporter::new()
    };

    let engine = ProcessingEngine::new(
        DogApiClient::new(client.clone(), &cli.api_url, cli.api_key.clone()),
        HttpImageFetcher::new(client),
        StandardImageCodec::new(),
        LocalStorageBackend::new(),
        build_config(cli),
        reporter,
    );

    log::info!(
        "Starting batch: limit={}, workers={}, output={}",
        cli.limit,
        engine.config().max_concurrent_tasks(),
        cli.output_dir.display()
    );

    Ok(engine.run_batch(cancel).await)
}

/// サマリーをJSONで書き出す
pub async fn write_report(path: &Path, summary: &ProcessingSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OutputFormat;
    use crate::detection::DetectorKind;
    use chrono::Utc;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_build_config_from_cli() {
        let cli = Cli::try_parse_from([
            "edge_pipeline", "-l", "4", "-c", "2", "-o", "edges", "-f", "jpeg", "-q",
        ])
        .unwrap();

        let config = build_config(&cli);

        assert_eq!(config.batch_size(), 4);
        assert_eq!(config.max_concurrent_tasks(), 2);
        assert_eq!(config.output_dir(), Path::new("edges"));
        assert_eq!(config.output_format(), OutputFormat::Jpeg);
        assert_eq!(config.primary_detector(), DetectorKind::Manual);
        assert!(!config.enable_progress_reporting());
    }

    #[test]
    fn test_build_config_default_concurrency() {
        let cli = Cli::try_parse_from(["edge_pipeline"]).unwrap();
        let config = build_config(&cli);

        assert!(config.max_concurrent_tasks() >= 1);
        assert!(config.max_concurrent_tasks() <= 16);
    }

    #[tokio::test]
    async fn test_deadline_cancels_token() {
        let cancel = spawn_cancellation(Some(Duration::from_millis(10)));

        tokio::time::timeout(Duration::from_secs(2), cancel.cancelled())
            .await
            .unwrap();
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_write_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/summary.json");
        let summary = ProcessingSummary::from_outcomes(3, 2, &[], Utc::now(), 10);

        write_report(&path, &summary).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["total_items"], 3);
        assert_eq!(json["cancelled_items"], 3);
        assert_eq!(json["worker_count"], 2);
    }
}
