use clap::Parser;
use mirrorsync::commands::sync::run;
use mirrorsync::config::Cli;
use mirrorsync::logging::init_logging;
use mirrorsync::Config;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let _log_guard = init_logging(&config.log_file)?;

    info!(
        "mirrorsync v{} mirroring {} -> {} every {} seconds",
        mirrorsync::VERSION,
        config.source.display(),
        config.replica.display(),
        config.interval.as_secs()
    );

    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown requested, stopping after the current cycle");
            token.cancel();
        }
    });

    run(config, token).await?;

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
