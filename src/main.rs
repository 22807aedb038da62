use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::*;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

use repodrop::{
    cli::Args,
    forge::github::GithubConnector,
    http::{AppState, handler::create_router},
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("repodrop")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    let config = args.server_config();

    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .wrap_err_with(|| {
            format!(
                "failed to create staging dir: {}",
                config.staging_dir.display()
            )
        })?;

    let listen_addr = config.listen_addr();
    let state = AppState::new(config, Arc::new(GithubConnector));
    let app = create_router(Arc::new(state));

    let listener = TcpListener::bind(&listen_addr)
        .await
        .wrap_err_with(|| format!("failed to bind listener on {listen_addr}"))?;

    info!("Server running on {listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server error")?;

    info!("server shut down");

    Ok(())
}
