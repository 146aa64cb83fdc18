//! bankstmt-extract - Extract transactions from a bank or credit-card PDF
//! statement.
//!
//! # Usage
//!
//! ```bash
//! bankstmt statement.pdf
//! bankstmt statement.pdf --password secret --format json
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use bankstmt::{extract, ExtractionConfig};
use bankstmt::types::TransactionType;

/// Extract normalized transactions from a PDF bank statement.
#[derive(Parser, Debug)]
#[command(name = "bankstmt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The PDF statement to extract transactions from.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Password to try against an encrypted PDF (may be passed more than once).
    #[arg(short, long = "password", value_name = "PASSWORD")]
    passwords: Vec<String>,

    /// Print transactions as JSON instead of a plain table.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let bytes = fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;

    let config = ExtractionConfig { passwords: args.passwords.clone(), ..ExtractionConfig::default() };

    let result = extract(&bytes, &config)?;

    for warning in &result.summary.warnings {
        eprintln!("warning: {warning}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.transactions)?);
    } else {
        for t in &result.transactions {
            let label = match t.transaction_type {
                TransactionType::Income => "income",
                TransactionType::Expense => "expense",
            };
            println!("{}\t{}\t{}\t{}", t.date_string(), t.amount, label, t.description);
        }
    }

    eprintln!(
        "Extracted {} transactions ({} debits, {} credits) from {}",
        result.summary.total,
        result.summary.debits,
        result.summary.credits,
        args.file.display()
    );

    Ok(())
}
