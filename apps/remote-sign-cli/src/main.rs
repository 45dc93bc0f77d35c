use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use remote_sign_cli::CliConfig;
use remote_sign_cli::command::{self, Command};
use remote_sign_cli::console::ConsoleProofSource;
use remote_sign_core::RemoteSignCore;
use remote_sign_core::config::core_config::{self, AppConfig};
use remote_sign_core::model::algorithm::Provider;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<Vec<PathBuf>>,

    /// Overrides the configured provider
    #[arg(short, long, global = true)]
    provider: Option<Provider>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config_files = cli.config.unwrap_or_default();
    config_files.insert(0, "config/config.yml".into());

    let app_config: AppConfig<CliConfig> =
        core_config::AppConfig::from_files(&config_files).expect("Failed creating config");

    initialize_tracing(&app_config.app);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let cancellation = CancellationToken::new();
            tokio::spawn({
                let cancellation = cancellation.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::warn!("Interrupted, cancelling transaction");
                        cancellation.cancel();
                    }
                }
            });

            let core = RemoteSignCore::new(
                app_config.core,
                Arc::new(ConsoleProofSource::stdio()),
            )?;

            command::run(
                cli.command,
                cli.provider,
                &core,
                &app_config.app,
                &cancellation,
            )
            .await
        })
}

fn initialize_tracing(config: &CliConfig) {
    // Create a filter based on the log level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(
                config.trace_level.as_deref().unwrap_or("debug"),
            )
        })
        .expect("Failed to create env filter");

    let tracing_layer = tracing_subscriber::registry().with(filter);

    if config.trace_json.unwrap_or_default() {
        tracing_layer
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_layer
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    };
}
