//! ToxGuard Server
//!
//! Loads the toxicity classifier once at startup and serves predictions over
//! HTTP. A missing or broken model does not stop the server; every text is
//! then reported as clean.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

use toxguard_server::{create_router, AppState, ConfigOverrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "toxguard-server")]
#[command(about = "ToxGuard toxicity analysis service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Directory holding tokenizer.json and model.onnx
    #[arg(short, long, env = "TOXGUARD_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Classifier configuration file, replacing the `classifier` section
    #[arg(long, env = "TOXGUARD_CLASSIFIER_CONFIG")]
    classifier_config: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "AI_SERVICE_PORT")]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting ToxGuard AI Service");

    let overrides = ConfigOverrides {
        listen: cli.listen,
        port: cli.port,
        model_dir: cli.model_dir,
        classifier_config: cli.classifier_config,
    };
    let config = ServerConfig::load(&cli.config, &overrides)?;
    info!("Configuration loaded successfully");
    info!("Model directory: {}", config.classifier.model_dir.display());

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let addr = config.socket_addr()?;
    let state = AppState::initialize(config, Some(metrics_handle)).await;
    let models = state.analyzer.model_status();
    info!("Models: toxic={}, emotion={}", models.toxic, models.emotion);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("AI Service listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("toxguard_server=debug,toxguard_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("toxguard_server=info,toxguard_classifiers=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "toxguard_requests_total",
        "Total number of analysis requests by endpoint"
    );
    metrics::describe_counter!(
        "toxguard_predictions_total",
        "Toxicity predictions by outcome (live or fallback)"
    );
    metrics::describe_histogram!(
        "toxguard_inference_latency_us",
        metrics::Unit::Microseconds,
        "Live toxicity inference latency in microseconds"
    );
    metrics::describe_counter!("toxguard_errors_total", "Total number of request errors by kind");
    metrics::describe_gauge!(
        "toxguard_models_ready",
        "1 when the toxicity model is loaded, 0 in fallback mode"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
