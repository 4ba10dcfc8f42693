use anyhow::Context;
use clap::Parser;
use hotel_review_digest::app::{self, AppState};
use hotel_review_digest::config::cli::{Command, LogFormat};
use hotel_review_digest::utils::logger;
use hotel_review_digest::utils::monitor::ResourceMonitor;
use hotel_review_digest::{AppConfig, CliConfig};
use std::net::SocketAddr;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Pretty => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting hotel-review-digest v{}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    if let Some(host) = &cli.host {
        config.settings.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.settings.server.port = port;
    }

    let analyzer = app::build_analyzer(&config).context("Failed to build HTTP clients")?;

    match cli.command() {
        Command::Serve => {
            let addr: SocketAddr = format!(
                "{}:{}",
                config.settings.server.host, config.settings.server.port
            )
            .parse()
            .context("Invalid server address")?;

            let router = app::build_router(AppState::new(analyzer), &config.settings.cors)
                .context("Failed to build router")?;
            app::serve(router, addr, shutdown_signal())
                .await
                .context("HTTP server error")?;
        }
        Command::Analyze {
            hotel_name,
            monitor,
        } => {
            let monitor = ResourceMonitor::new(monitor);
            if monitor.is_enabled() {
                tracing::info!("🔍 System monitoring enabled");
            }
            monitor.log_phase("Start");

            let outcome = analyzer.analyze(&hotel_name).await;
            monitor.log_summary();

            match outcome {
                Ok(report) => {
                    println!("{}\n", report.result_markdown);
                    println!("{}", serde_json::to_string_pretty(&report.meta)?);
                }
                Err(e) => {
                    tracing::error!("❌ Analysis failed: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    let exit_code = match e.status_code().as_u16() {
                        400 => 2,
                        404 => 3,
                        _ => 1,
                    };
                    std::process::exit(exit_code);
                }
            }
        }
    }

    Ok(())
}
