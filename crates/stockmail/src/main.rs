use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::time::Instant;
use stockmail_core::prelude::*;
use stockmail_core::reference::persist;

mod cli;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; stockmail/0.1)";

fn preprocess() {
    // grant access to .env
    dotenv::dotenv().ok();

    // initialise logger; progress is reported at `info`
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    preprocess();
    let cli = cli::Cli::parse();
    log::debug!("Command line input recorded: {cli:#?}");

    let watchlist = Watchlist::default();
    let store = JsonFileStore::new(&cli.reference_file);
    let references = store
        .load()
        .await
        .context("failed to load reference prices")?;
    log::info!(
        "Loaded {} reference prices from {}",
        references.len(),
        store.path().display()
    );

    // fetch & tabulate, one symbol at a time
    log::info!(
        "Generating multi-period stock report for {} symbols ...",
        watchlist.symbol_count()
    );
    let start = Instant::now();
    let user_agent =
        std::env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let source = YahooFinance::new(build_client(&user_agent)?, &watchlist);
    log::debug!("Requesting daily closes over range={}", source.range());
    let built = ReportBuilder::new(&watchlist, &source)
        .build(references)
        .await;
    log::info!(
        "Report generated in {:.2} seconds ({} of {} symbols priced)",
        start.elapsed().as_secs_f64(),
        built.report.row_count(),
        watchlist.symbol_count()
    );

    // references go to disk before the email is attempted
    persist(&store, &built.references, built.changed)
        .await
        .context("failed to save reference prices")?;

    let today = Local::now().date_naive();
    let document =
        render(&built.report, &watchlist.periods, today).context("failed to render report")?;

    if cli.dry_run {
        match &cli.output {
            Some(path) => {
                tokio::fs::write(path, &document).await?;
                log::info!("Report written to {}", path.display());
            }
            None => println!("{document}"),
        }
        return Ok(());
    }

    // delivery failures are logged, not turned into an exit code
    log::info!("Sending email report ...");
    match deliver(&document, &subject(today)).await {
        Ok(()) => log::info!("Stock report email sent successfully"),
        Err(e) => log::error!("Error sending email: {e}"),
    }

    log::info!("Process completed");
    Ok(())
}

async fn deliver(document: &str, subject: &str) -> stockmail_core::Result<()> {
    let credentials = Credentials::from_env()?;
    let relay = Relay::from_env()?;
    Notifier::new(&relay, &credentials)?
        .send(document, subject)
        .await
}
