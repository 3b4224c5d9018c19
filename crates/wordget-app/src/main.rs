use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use wordget_config::Config;

pub mod controller;
pub mod events;
pub mod io;
pub mod platform;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;

/// Vocabulary capture coordinator, speaking newline-delimited JSON on stdio
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the word collection and settings
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log as JSON even when stderr is a terminal
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = Config::new();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    tracing::info!("Using storage at {}", config.storage_path().display());

    let controller = AppController::new(config).await?;
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Shutdown requested"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {e}"),
        },
        Some(result) = tasks.join_next() => match result {
            Ok(Ok(())) => tracing::info!("Host connection finished"),
            Ok(Err(e)) => tracing::error!("Task failed: {e}"),
            Err(e) => tracing::error!("Task panicked: {e}"),
        },
    }

    controller.shutdown();
    // stdin reads cannot be interrupted; don't wait on them forever
    let _ = tokio::time::timeout(Duration::from_secs(1), async {
        while tasks.join_next().await.is_some() {}
    })
    .await;

    Ok(())
}

/// stdout carries the protocol, so logs go to stderr
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json || !atty::is(atty::Stream::Stderr) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}
