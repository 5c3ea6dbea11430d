//! Slush Fund Detector - Main Entry Point
//!
//! Loads one account's transaction history, runs the detector battery and
//! prints the analyst report (and optionally the ordered alerts as JSON).

use anyhow::{Context, Result};
use slush_fund_detector::{
    config::{AppConfig, LoggingConfig},
    loader, sample, AccountMetadata, ReportGenerator, RiskLevel, SlushFundDetector,
    SystemClock,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging)?;
    info!("Starting Slush Fund Detector");
    match config_error {
        Some(e) => warn!(error = %e, "Configuration not loaded, using defaults"),
        None => info!("Configuration loaded successfully"),
    }

    let dataset = match &config.input.transactions_path {
        Some(path) => loader::load_transactions(path)
            .with_context(|| format!("Failed to load transactions from {}", path))?,
        None => {
            info!(
                seed = config.input.sample_seed,
                "No transaction file configured, generating sample data"
            );
            sample::sample_dataset(config.input.sample_seed)
        }
    };

    let account = match (&config.input.account_path, &config.input.account_id) {
        (Some(path), _) => loader::load_account_metadata(path)
            .with_context(|| format!("Failed to load account metadata from {}", path))?,
        (None, Some(id)) => AccountMetadata::with_account_id(id.clone()),
        (None, None) => sample::sample_account(),
    };
    let account_id = account.account_id().to_string();

    let clock = Arc::new(SystemClock);
    let engine = SlushFundDetector::with_clock(clock.clone())
        .with_detector_timeout(config.analysis.detector_timeout());
    info!(
        detectors = ?engine.detector_names(),
        parallel = config.analysis.parallel,
        "Detection engine initialized"
    );

    let outcome = if config.analysis.parallel {
        engine
            .analyze_account_concurrent(Arc::new(dataset.clone()), &account)
            .await
    } else {
        engine.analyze(&dataset, &account)
    };

    for failure in &outcome.failures {
        warn!(
            detector = failure.detector,
            error = %failure.error,
            "Detector results missing from report"
        );
    }

    let report = ReportGenerator::new(clock).generate_report(&outcome.alerts, &account_id);
    println!("{}", report);

    if config.output.emit_json {
        let json = serde_json::to_string_pretty(&outcome.alerts)
            .context("Failed to serialize alerts")?;
        println!("{}", json);
    }

    let count_level = |level: RiskLevel| {
        outcome
            .alerts
            .iter()
            .filter(|a| a.risk_level() == level)
            .count()
    };
    info!(
        transactions = dataset.len(),
        alerts = outcome.alerts.len(),
        high = count_level(RiskLevel::High),
        critical = count_level(RiskLevel::Critical),
        "Summary statistics"
    );
    engine.metrics().print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("slush_fund_detector={}", logging.level).parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
