use std::process::ExitCode;

use anyhow::{Context, Result};
use unfollow_common::observability::{LogConfig, init_logging};
use unfollow_config::SettingsLoader;
use unfollow_deleter::run_all;

mod bootstrap;

#[tokio::main]
async fn main() -> ExitCode {
    let log_path = match init_logging(LogConfig::default()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("unfollow: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(log = %log_path.display(), "logging initialised");

    match run(SettingsLoader::new()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(loader: SettingsLoader) -> Result<()> {
    // 1) Load settings (env wins over the .env file)
    let settings = loader
        .load()
        .context("failed to load configuration")?;

    // 2) One authenticated handle, shared read-only by every collection
    let client = bootstrap::build_client(&settings).context("failed to build API client")?;

    let reports = run_all(&client, &bootstrap::sweep_options(&settings)).await?;

    let deleted: usize = reports.iter().map(|r| r.deleted).sum();
    tracing::info!(deleted, "unfollow.complete");
    Ok(())
}
