use anyhow::Context;
use clap::Parser;
use spam_detector::api::{browser_url, spawn_browser_launch, ApiServer};
use spam_detector::classifier::SpamPipeline;
use spam_detector::config::{Config, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spam-detector")]
#[command(about = "Train a spam classifier and serve an interactive form", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration
    #[arg(short, long)]
    listen: Option<String>,

    /// Do not open a browser window
    #[arg(long)]
    no_browser: bool,
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "spam_detector={},tower_http={}",
            config.level, config.level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None if std::path::Path::new("config.toml").exists() => Config::from_file("config.toml")?,
        None => Config::default(),
    };

    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen.clone();
    }
    if cli.no_browser {
        config.server.open_browser = false;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(&config.logging);

    info!("Starting spam-detector");
    info!("  Category dataset: {}", config.datasets.category.path);
    info!("  Indicator dataset: {}", config.datasets.indicator.path);

    let training_config = config.clone();
    let pipeline = tokio::task::spawn_blocking(move || SpamPipeline::train(&training_config))
        .await
        .context("Training task panicked")?
        .context("Failed to train the classifier")?;

    let server = ApiServer::new(Arc::new(pipeline), config.listen_addr()?);
    let (local, listener) = server.bind().await?;

    if config.server.open_browser {
        spawn_browser_launch(
            browser_url(local),
            Duration::from_millis(config.server.browser_delay_ms),
        );
    }

    server.serve(local, listener).await?;

    Ok(())
}
