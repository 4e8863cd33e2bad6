use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;
use page_analyzer::app::analyzer::Analyzer;
use page_analyzer::cli::{Cli, Command};
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
    let cli = Cli::parse();
    page_analyzer::logging::init(cli.log_format).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let config = Config::from_args(&cli.store, &cli.fetch);
    let pool = page_analyzer::db::connect(&config.database_url, config.max_connections)
        .await
        .context("open database")?;
    let fetcher = HttpFetcher::new(&config.fetch).context("build page fetcher")?;
    let analyzer = Analyzer::with_pool(pool.clone(), Arc::new(fetcher));

    let result = run(&analyzer, cli.command).await;
    pool.close().await;
    result
}

async fn run(analyzer: &Analyzer, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add(args) => {
            let url = analyzer.add_url(&args.url).await.context("add url")?;
            print_json(&url)?;
        }
        Command::List => {
            for summary in analyzer.list_urls().await.context("list urls")? {
                print_json(&summary)?;
            }
        }
        Command::Show(args) => {
            let details = analyzer.show_url(args.id).await.context("show url")?;
            print_json(&details)?;
        }
        Command::Check(args) => {
            let check = analyzer.run_check(args.id).await.context("check url")?;
            print_json(&check)?;
        }
        Command::Checks(args) => {
            analyzer.get_url(args.id).await.context("find url")?;
            for check in analyzer.list_checks(args.id).await.context("list checks")? {
                print_json(&check)?;
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value).context("write json")?;
    stdout.write_all(b"\n").context("write newline")?;
    Ok(())
}
