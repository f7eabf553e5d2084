use clap::Parser;
use std::path::PathBuf;
use stockmail_core::reference::DEFAULT_REFERENCE_FILE;

/// Fetch the watch-list, compare against reference prices & email the report.
///
/// Run with no arguments from the scheduler; manual runs behave identically.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Flat JSON file holding the first-observed price of every symbol.
    #[arg(long, default_value = DEFAULT_REFERENCE_FILE)]
    pub reference_file: PathBuf,

    /// Build & render the report, but don't email it.
    #[arg(long)]
    pub dry_run: bool,

    /// Where `--dry-run` writes the HTML; stdout if omitted.
    #[arg(long, requires = "dry_run")]
    pub output: Option<PathBuf>,
}
