//! Type definitions for the detection engine

pub mod alert;
pub mod transaction;

pub use alert::{Alert, Clock, FixedClock, RiskLevel, SystemClock};
pub use transaction::{AccountMetadata, Column, Transaction, TransactionDataset, TransactionRecord};
