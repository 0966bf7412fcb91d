//! txdesk main entry point

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use txdesk_client::HttpTransactionStore;
use txdesk_config::error::ConfigErrorSeverity;
use txdesk_config::{Config, ConfigError};
use txdesk_core::{PageController, StoreRef};
use txdesk_web::start_server;

#[derive(Parser, Debug)]
#[command(name = "txdesk")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight web front-end for managing transaction records", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Load the config file; a missing file falls back to the defaults
fn load_config(path: &Path) -> anyhow::Result<(Config, bool)> {
    match Config::load(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), false)),
        Err(e) => {
            let details = e.to_details();
            Err(e).with_context(|| format!("Failed to load {}\n{}", path.display(), details))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, from_file) = load_config(&args.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if from_file {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }
    for issue in config.warnings() {
        match issue.severity() {
            ConfigErrorSeverity::Warning => log::warn!("{}", issue.to_details()),
            ConfigErrorSeverity::Error => log::error!("{}", issue.to_details()),
        }
    }
    log::info!("Transaction store: {}", config.api.base_url);

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store: StoreRef = Arc::new(
            HttpTransactionStore::from_config(&config.api)
                .context("Failed to set up the transaction store client")?,
        );
        let mut page = PageController::from_config(store, &config)?;

        page.load_status_options().await;
        if let Err(e) = page.refresh().await {
            log::warn!("Initial fetch failed, the list starts empty: {}", e);
        }

        start_server(config, page)
            .await
            .context("HTTP server stopped")
    })
}
