//! Sample Dataset Exporter
//!
//! Writes the seeded sample history as a JSON array of transaction records,
//! in the format the detector binary loads via `input.transactions_path`.
//!
//! Usage: sample_export [OUTPUT_PATH] [SEED]

use anyhow::{Context, Result};
use slush_fund_detector::{sample, TransactionRecord};
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_export=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .unwrap_or_else(|| "transactions.json".to_string());
    let seed: u64 = match args.next() {
        Some(raw) => raw.parse().context("SEED must be an unsigned integer")?,
        None => 42,
    };

    let records: Vec<TransactionRecord> = sample::sample_dataset(seed)
        .transactions()
        .iter()
        .map(|tx| TransactionRecord {
            date: tx.date.map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string().into()),
            amount: Some(tx.amount),
            description: tx.description.clone(),
            counterparty: tx.counterparty.clone(),
            transaction_type: tx.transaction_type.clone(),
        })
        .collect();

    let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
    fs::write(&output, json).with_context(|| format!("Failed to write {}", output))?;

    info!(path = %output, seed, rows = records.len(), "Sample dataset written");
    Ok(())
}
