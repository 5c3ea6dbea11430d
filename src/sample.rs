//! Synthetic transaction history for demos and smoke runs.
//!
//! The generated account carries several slush-fund signals:
//! amounts parked just below reporting thresholds, large round amounts, vague
//! descriptions, one dominant counterparty and mixed deposits/withdrawals.

use crate::types::{AccountMetadata, Transaction, TransactionDataset};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const SAMPLE_SIZE: usize = 200;
pub const SAMPLE_ACCOUNT_ID: &str = "ACC-12345";

const THRESHOLD_AMOUNTS: [f64; 3] = [9999.0, 4999.0, 2999.0];
const ROUND_AMOUNTS: [f64; 3] = [5000.0, 10000.0, 15000.0];
const VAGUE_DESCRIPTIONS: [&str; 3] = [
    "Consulting services",
    "Miscellaneous expenses",
    "General services",
];
const ROUTINE_DESCRIPTIONS: [&str; 3] = [
    "Equipment purchase",
    "Office supplies",
    "Travel expenses",
];
const DOMINANT_COUNTERPARTY: &str = "ABC Consulting LLC";
const OTHER_COUNTERPARTIES: [&str; 3] = [
    "XYZ Services",
    "Quick Solutions Inc",
    "Business Partners",
];

/// Generator for a seeded sample account
pub struct SampleGenerator {
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build the sample history: 200 transactions across 2024.
    pub fn transactions(&mut self) -> Vec<Transaction> {
        let mut amounts: Vec<f64> = Vec::with_capacity(SAMPLE_SIZE);
        for _ in 0..10 {
            amounts.extend(THRESHOLD_AMOUNTS);
            amounts.extend(ROUND_AMOUNTS);
        }
        while amounts.len() < SAMPLE_SIZE {
            let amount: f64 = self.rng.gen_range(500.0..4500.0);
            amounts.push((amount * 100.0).round() / 100.0);
        }
        amounts.shuffle(&mut self.rng);

        let mut descriptions: Vec<&str> = Vec::with_capacity(SAMPLE_SIZE);
        for i in 0..SAMPLE_SIZE {
            let pool = if i < 60 {
                &VAGUE_DESCRIPTIONS
            } else {
                &ROUTINE_DESCRIPTIONS
            };
            descriptions.push(pool[i % pool.len()]);
        }
        descriptions.shuffle(&mut self.rng);

        let mut counterparties: Vec<&str> = vec![DOMINANT_COUNTERPARTY; 50];
        for i in 0..SAMPLE_SIZE - 50 {
            counterparties.push(OTHER_COUNTERPARTIES[i % OTHER_COUNTERPARTIES.len()]);
        }
        counterparties.shuffle(&mut self.rng);

        let mut types: Vec<&str> = (0..SAMPLE_SIZE)
            .map(|i| if i % 2 == 0 { "deposit" } else { "withdrawal" })
            .collect();
        types.shuffle(&mut self.rng);

        (0..SAMPLE_SIZE)
            .map(|i| {
                Transaction::new(amounts[i])
                    .with_date(self.random_day())
                    .with_description(descriptions[i])
                    .with_counterparty(counterparties[i])
                    .with_transaction_type(types[i])
            })
            .collect()
    }

    fn random_day(&mut self) -> NaiveDateTime {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        start + Duration::days(self.rng.gen_range(0..366))
    }
}

/// Seeded sample dataset
pub fn sample_dataset(seed: u64) -> TransactionDataset {
    let transactions = SampleGenerator::new(seed).transactions();
    // Generated rows are dated and non-negative, so validation cannot fail
    TransactionDataset::new(transactions).unwrap_or_default()
}

/// Metadata for the sample account
pub fn sample_account() -> AccountMetadata {
    let mut account = AccountMetadata::with_account_id(SAMPLE_ACCOUNT_ID);
    account.insert("account_type", "Business Checking");
    account.insert("customer_id", "CUST-67890");
    account
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use chrono::Datelike;

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample_dataset(7), sample_dataset(7));
        assert_ne!(sample_dataset(7), sample_dataset(8));
    }

    #[test]
    fn test_sample_shape() {
        let dataset = sample_dataset(42);

        assert_eq!(dataset.len(), SAMPLE_SIZE);
        assert!(dataset.has_columns(&[
            Column::Date,
            Column::Amount,
            Column::Description,
            Column::Counterparty,
            Column::TransactionType,
        ]));
        assert!(dataset
            .transactions()
            .iter()
            .all(|tx| tx.date.is_some_and(|d| d.year() == 2024)));
        let near_threshold = dataset
            .transactions()
            .iter()
            .filter(|tx| tx.amount == 9999.0)
            .count();
        assert_eq!(near_threshold, 10);
    }

    #[test]
    fn test_sample_account() {
        assert_eq!(sample_account().account_id(), SAMPLE_ACCOUNT_ID);
    }
}
