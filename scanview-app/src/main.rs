mod dashboard_ui;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use scanview_core::config::ScanViewConfig;
use scanview_core::{DashboardState, ScannerClient};

#[derive(Parser, Debug)]
#[command(name = "scanview", version, about = "MCP ScanView — Security Scanner Dashboard")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "scanview.toml")]
    config: String,

    /// Dashboard bind address (overrides config file)
    #[arg(long)]
    bind: Option<String>,

    /// Base URL of the MCP scanner service (overrides config file)
    #[arg(long)]
    scanner_url: Option<String>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Generate a default config file and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        let config = ScanViewConfig::default();
        config.save(&cli.config).map_err(|e| anyhow::anyhow!(e))?;
        println!("Default configuration written to {}", cli.config);
        return Ok(());
    }

    let config = ScanViewConfig::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: {}, using defaults", e);
        ScanViewConfig::default()
    });

    let bind = cli.bind.as_deref().unwrap_or(&config.general.bind).to_string();
    let scanner_url = cli
        .scanner_url
        .as_deref()
        .unwrap_or(&config.scanner.base_url)
        .to_string();
    let log_level = cli.log_level.as_deref().unwrap_or(&config.general.log_level);

    // ── Tracing ──────────────────────────────────────────────────────
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("MCP ScanView v{}", env!("CARGO_PKG_VERSION"));
    info!(scanner = %scanner_url, "Scanner service endpoint");

    let client = Arc::new(
        ScannerClient::new(&scanner_url, config.scanner.timeout_secs)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?,
    );
    let state = Arc::new(DashboardState::new());

    // Reachability probe; the dashboard starts either way.
    match client.health().await {
        Ok(()) => info!("Scanner service is reachable"),
        Err(e) => warn!(error = %e, "Scanner service health check failed"),
    }

    // ── Dashboard ────────────────────────────────────────────────────
    let ctx = Arc::new(dashboard_ui::AppContext {
        client: client.clone(),
        state: state.clone(),
        presets: config.presets.clone(),
    });
    {
        let ctx = ctx.clone();
        let bind = bind.clone();
        tokio::spawn(async move {
            if let Err(e) = dashboard_ui::start_dashboard(ctx, &bind).await {
                error!(error = %e, "Dashboard failed");
            }
        });
    }
    info!(addr = %bind, "Dashboard available at http://{}", bind);

    info!("ScanView running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!(
        requests = state.requests_begun(),
        superseded = state.requests_superseded(),
        service_calls = client.total_requests(),
        service_failures = client.total_failures(),
        "Shutting down ScanView"
    );
    Ok(())
}
