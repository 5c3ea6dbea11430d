//! Slush Fund Detector Library
//!
//! Heuristic detection of slush-fund activity in a single account's
//! transaction history. Eight independent detectors produce evidence-backed
//! alerts, which are ranked by risk and confidence and rendered into an
//! analyst-facing text report.

pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod format;
pub mod loader;
pub mod metrics;
pub mod prioritizer;
pub mod report;
pub mod sample;
pub mod types;

pub use config::AppConfig;
pub use detectors::{default_detectors, DetectionContext, Detector};
pub use engine::{AnalysisOutcome, DetectorFailure, SlushFundDetector};
pub use error::{DetectionError, Result};
pub use prioritizer::prioritize_alerts;
pub use report::ReportGenerator;
pub use types::{
    AccountMetadata, Alert, Clock, Column, FixedClock, RiskLevel, SystemClock, Transaction,
    TransactionDataset, TransactionRecord,
};
