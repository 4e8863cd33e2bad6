use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;
use page_analyzer::app::analyzer::Analyzer;
use page_analyzer::cli::AppArgs;
use page_analyzer::config::Config;
use page_analyzer::fetch::HttpFetcher;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let args = AppArgs::parse();
    page_analyzer::logging::init(args.log_format)?;
    tracing::info!(?args, "starting page-analyzer-app");

    let config = Config::from_args(&args.store, &args.fetch);
    let pool = page_analyzer::db::connect(&config.database_url, config.max_connections)
        .await
        .context("open database")?;
    let fetcher = HttpFetcher::new(&config.fetch).context("build page fetcher")?;
    let analyzer = Arc::new(Analyzer::with_pool(pool.clone(), Arc::new(fetcher)));

    let app = page_analyzer::http::router(analyzer);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    pool.close().await;
    tracing::info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "listen for ctrl-c failed");
    }
}
