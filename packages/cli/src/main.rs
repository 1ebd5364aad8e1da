#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the bank statement parser.
//!
//! Parses statements locally (from a PDF or from an already-extracted text
//! dump) and prints the transactions as JSON, or starts the upload server.

use std::path::{Path, PathBuf};

use bank_statement_parser::{StatementExtractor, StatementLayout, Transaction};
use bank_statement_pdf::PdfTextSource;
use bank_statement_server::ServerConfig;
use bank_statement_server_models::ApiTransactions;
use bank_statement_transaction_models::TransactionSummary;
use clap::{Parser, Subcommand};

/// Page separator in plain-text dumps (`pdftotext` style).
const PAGE_BREAK: char = '\u{c}';

#[derive(Parser)]
#[command(name = "bank_statement", about = "Bank statement transaction extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a PDF statement and print its transactions as JSON
    Parse {
        /// Path to the PDF statement
        file: PathBuf,
        /// TOML statement layout replacing the built-in one
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Print totals and date range instead of the transactions
        #[arg(long)]
        summary: bool,
    },
    /// Parse a plain-text dump whose pages are separated by form feeds
    ParseText {
        /// Path to the text file
        file: PathBuf,
        /// TOML statement layout replacing the built-in one
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Print totals and date range instead of the transactions
        #[arg(long)]
        summary: bool,
    },
    /// Start the upload server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
        /// TOML statement layout (overrides `STATEMENT_LAYOUT`)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            file,
            layout,
            summary,
        } => {
            let extractor = load_extractor(layout.as_deref())?;
            let bytes = std::fs::read(&file)?;
            log::info!("Parsing {} ({} bytes)", file.display(), bytes.len());

            let transactions = extractor.extract_document(&PdfTextSource::new(), &bytes)?;
            print_transactions(transactions, summary)?;
        }
        Commands::ParseText {
            file,
            layout,
            summary,
        } => {
            let extractor = load_extractor(layout.as_deref())?;
            let text = std::fs::read_to_string(&file)?;
            let pages = split_pages(&text);
            log::info!("Parsing {} ({} page(s))", file.display(), pages.len());

            let transactions = extractor.extract_pages(&pages)?;
            print_transactions(transactions, summary)?;
        }
        Commands::Serve { bind, port, layout } => {
            let config = serve_config(ServerConfig::from_env(), bind, port, layout);
            actix_web::rt::System::new().block_on(bank_statement_server::run_server(config))?;
        }
    }

    Ok(())
}

fn load_extractor(layout: Option<&Path>) -> Result<StatementExtractor, Box<dyn std::error::Error>> {
    let layout = match layout {
        Some(path) => StatementLayout::load(path)?,
        None => StatementLayout::default(),
    };
    Ok(StatementExtractor::new(layout))
}

/// Splits a text dump into pages on form-feed characters.
fn split_pages(text: &str) -> Vec<&str> {
    text.split(PAGE_BREAK).collect()
}

/// Applies command-line overrides on top of the environment config.
fn serve_config(
    mut config: ServerConfig,
    bind: Option<String>,
    port: Option<u16>,
    layout: Option<PathBuf>,
) -> ServerConfig {
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if layout.is_some() {
        config.layout_path = layout;
    }
    config
}

fn print_transactions(
    transactions: Vec<Transaction>,
    summary: bool,
) -> Result<(), serde_json::Error> {
    let json = if summary {
        serde_json::to_string_pretty(&TransactionSummary::from_transactions(&transactions))?
    } else {
        serde_json::to_string_pretty(&ApiTransactions { transactions })?
    };
    println!("{json}");
    Ok(())
}
