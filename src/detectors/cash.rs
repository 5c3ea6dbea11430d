//! Cash-intensive activity.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::format::{currency, percent};
use crate::types::{Alert, Column, RiskLevel};

/// Substrings marking a transaction type as cash-like.
pub const CASH_MARKERS: [&str; 3] = ["cash", "atm", "withdrawal"];

const COUNT_FRACTION_LIMIT: f64 = 0.3;
const AMOUNT_FRACTION_LIMIT: f64 = 0.4;
const HIGH_RISK_AMOUNT_FRACTION: f64 = 0.6;

/// Flags accounts dominated by cash, ATM or withdrawal activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashIntensityDetector;

fn is_cash_like(transaction_type: &str) -> bool {
    let lowered = transaction_type.to_lowercase();
    CASH_MARKERS.iter().any(|marker| lowered.contains(marker))
}

impl Detector for CashIntensityDetector {
    fn name(&self) -> &'static str {
        "cash_intensity"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Vec<Alert>> {
        let dataset = ctx.dataset;
        if !dataset.has_column(Column::TransactionType) {
            return Ok(Vec::new());
        }

        let (cash_count, cash_amount) = dataset
            .transactions()
            .iter()
            .filter(|tx| tx.transaction_type.as_deref().is_some_and(is_cash_like))
            .fold((0usize, 0.0f64), |(n, sum), tx| (n + 1, sum + tx.amount));

        if cash_count == 0 {
            return Ok(Vec::new());
        }

        let count_fraction = cash_count as f64 / dataset.len() as f64;
        let total_amount = dataset.total_amount();
        let amount_fraction = if total_amount > 0.0 {
            cash_amount / total_amount
        } else {
            0.0
        };

        if count_fraction <= COUNT_FRACTION_LIMIT && amount_fraction <= AMOUNT_FRACTION_LIMIT {
            return Ok(Vec::new());
        }

        let risk_level = if amount_fraction > HIGH_RISK_AMOUNT_FRACTION {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        };
        let amount_involved = if dataset.has_column(Column::Amount) {
            cash_amount
        } else {
            0.0
        };

        let alert = ctx
            .alert(
                "High Cash Activity",
                risk_level,
                75.0,
                "Unusually high level of cash transactions",
            )
            .with_evidence(vec![
                format!(
                    "Cash transactions: {} by count, {} by amount",
                    percent(count_fraction),
                    percent(amount_fraction)
                ),
                format!("Total cash amount: {}", currency(amount_involved, 2)),
            ])
            .with_amount_involved(amount_involved);

        Ok(vec![alert])
    }
}
