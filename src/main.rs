// History Quotes - CLI
// Runs one export and prints a JSON response envelope on stdout

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use history_quotes::{respond, ExportRequest, HistoryQuotesCriteria};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "history-quotes", version, about = "Filter historical quotes into a CSV export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export the quotes of one symbol within a date range
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Company symbol, e.g. AAPL
    #[arg(long)]
    symbol: String,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: String,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end_date: String,

    /// Report recipient
    #[arg(long)]
    email: Option<String>,

    /// Source file, overrides config and environment
    #[arg(long)]
    input: Option<PathBuf>,

    /// Destination CSV, overrides config and environment
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

impl From<ExportArgs> for ExportRequest {
    fn from(args: ExportArgs) -> Self {
        let mut criteria = HistoryQuotesCriteria::new(args.symbol, args.start_date, args.end_date);
        if let Some(email) = args.email {
            criteria = criteria.with_email(email);
        }

        ExportRequest {
            criteria,
            input: args.input,
            output: args.output,
            config: args.config,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("history_quotes=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Export(args) => {
            let pretty = args.pretty;
            let response = respond(args.into(), |key| std::env::var(key).ok());
            println!("{}", response.to_json(pretty)?);
            Ok(ExitCode::from(response.exit_code()))
        }
    }
}
