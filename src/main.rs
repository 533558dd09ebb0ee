//! Zingira web gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → logger → recovery → cors → timeout → route checker
//!                                                                          │
//!                         ┌────────────────────────────────────────────────┤
//!                         ▼                    ▼                           ▼
//!                   /static/* files     public pages        protected pages (bearer token
//!                   (extension check)   (templates)          verified by identity provider)
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use zingira_gateway::config::{load_config, validation::validate_config, ConfigError};
use zingira_gateway::lifecycle::{self, signals, Shutdown, StartupError};
use zingira_gateway::observability::{logging, metrics};
use zingira_gateway::templates::TemplateWatcher;
use zingira_gateway::GatewayConfig;

#[derive(Parser, Debug)]
#[command(name = "zingira-gateway", version, about = "Zingira web gateway")]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long, env = "GATEWAY_BIND")]
    bind: Option<String>,

    /// Validate configuration, templates and credentials, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("zingira-gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("zingira-gateway: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(config, cli.check).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed");
            eprintln!("zingira-gateway: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

async fn run(config: GatewayConfig, check_only: bool) -> Result<(), StartupError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.limits.request_timeout_secs,
        "zingira-gateway starting"
    );

    let metrics_address = config
        .observability
        .metrics_enabled
        .then(|| config.observability.metrics_address.parse::<SocketAddr>());
    let watch_templates = config.assets.watch_templates;

    let gateway = lifecycle::bootstrap(config)?;

    if check_only {
        let snapshot = gateway.templates.snapshot();
        tracing::info!(
            pages = ?snapshot.page_names().collect::<Vec<_>>(),
            "Configuration check passed"
        );
        return Ok(());
    }

    if let Some(addr) = metrics_address {
        let addr = addr.map_err(|e| StartupError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    // Dropping the watcher stops reloads, so it lives until shutdown.
    let _watcher = if watch_templates {
        Some(TemplateWatcher::new(gateway.templates.clone()).run()?)
    } else {
        None
    };

    let listener = lifecycle::bind(gateway.server.config()).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on(signals::shutdown_signal());

    gateway
        .server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
