use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use logdrop_client::{LogSink, LokiClient};
use logdrop_server::api::{self, AppState};
use logdrop_server::config::{self, Config};
use logdrop_server::scheduler::SampleImportJob;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logdrop")]
#[command(about = "Web UI that forwards pasted or uploaded logs to Loki", long_about = None)]
struct Cli {
    /// Loki base URL
    #[arg(long, env = "LOKI_URL", default_value = config::DEFAULT_LOKI_URL)]
    loki_url: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Interface to bind to
    #[arg(long, env = "BIND_HOST", default_value = config::DEFAULT_BIND_HOST)]
    bind_host: String,

    /// Directory containing index.html and the UI assets
    #[arg(long, env = "STATIC_DIR", default_value = config::DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,

    /// Seconds before a push to Loki is abandoned
    #[arg(long, env = "PUSH_TIMEOUT_SECS", default_value_t = config::DEFAULT_PUSH_TIMEOUT_SECS)]
    push_timeout_secs: u64,

    /// Seconds after startup before the sample logs are pushed
    #[arg(long, env = "SAMPLE_IMPORT_DELAY_SECS", default_value_t = config::DEFAULT_SAMPLE_IMPORT_DELAY_SECS)]
    sample_import_delay_secs: u64,

    /// Skip pushing the sample logs after startup
    #[arg(long, env = "DISABLE_SAMPLE_IMPORT")]
    no_sample_import: bool,

    /// Maximum request body size in bytes (unlimited when unset)
    #[arg(long, env = "MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            loki_url: self.loki_url,
            bind_host: self.bind_host,
            port: self.port,
            static_dir: self.static_dir,
            push_timeout: Duration::from_secs(self.push_timeout_secs),
            sample_import_enabled: !self.no_sample_import,
            sample_import_delay: Duration::from_secs(self.sample_import_delay_secs),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "logdrop_server=info,logdrop_client=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config();
    config.validate()?;

    info!(
        "Loaded configuration: loki_url={}, push_timeout={:?}",
        config.loki_url, config.push_timeout
    );

    let client = LokiClient::with_timeout(config.loki_url.clone(), config.push_timeout)
        .context("Failed to build Loki client")?;
    let sink: Arc<dyn LogSink> = Arc::new(client);

    let sample_import = config.sample_import_enabled.then(|| {
        info!(
            "Sample logs will be imported in {:?}",
            config.sample_import_delay
        );
        SampleImportJob::new(config.sample_import_delay, Arc::clone(&sink)).spawn()
    });

    let app = api::create_router(AppState::new(sink), &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Log importer UI starting on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server");

    if let Some(handle) = sample_import {
        if !handle.is_finished() {
            info!("Cancelling pending sample import");
        }
        handle.abort();
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
