use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use edge_pipeline::cli::{execute_run, spawn_cancellation, write_report, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cancel = spawn_cancellation(cli.cancel_after_secs.map(Duration::from_secs));

    match execute_run(&cli, cancel).await? {
        Ok(summary) => {
            if let Some(report_path) = &cli.report {
                write_report(report_path, &summary).await?;
                log::info!("Summary written to {}", report_path.display());
            }

            if summary.skipped_items > 0 || summary.artifact_failures > 0 {
                log::warn!(
                    "{} items skipped, {} artifacts failed",
                    summary.skipped_items,
                    summary.artifact_failures
                );
            }
        }
        Err(error) => {
            log::error!("[{}] {error}", error.category().as_str());
            eprintln!("❌ エラー: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}
